//! Catalog discovery.
//!
//! Expands the configured catalog definitions into concrete `Catalog`
//! instances: validates path templates, resolves `{name}` patterns
//! against the filesystem, and maps catalog files back to their locale.

use anyhow::{bail, Result};
use regex::Regex;

use lingua_catalog::config::{CatalogConfig, LinguaConfig};
use lingua_catalog::formats::get_format;
use lingua_catalog::CatalogError;

use crate::catalog::{normalize_relative_path, Catalog, LOCALE, NAME};

/// Build one `Catalog` per configured definition, expanding `{name}`
/// patterns into one catalog per matching directory.
pub fn get_catalogs(config: &LinguaConfig) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    for definition in &config.catalogs {
        // A trailing separator means a directory, not a file template.
        if definition.path.ends_with('/') {
            return Err(trailing_separator_error(definition, config).into());
        }

        let include: Vec<String> = definition
            .include
            .iter()
            .map(|path| normalize_relative_path(path))
            .collect();
        let exclude: Vec<String> = definition
            .exclude
            .iter()
            .map(|path| normalize_relative_path(path))
            .collect();

        // A path without {name} always refers to a single catalog.
        if !definition.path.contains(NAME) {
            if let Some(invalid) = include.iter().find(|path| path.contains(NAME)) {
                bail!(
                    "catalog path \"{}\" has no {NAME} pattern, but source \"{invalid}\" uses it",
                    definition.path
                );
            }
            catalogs.push(Catalog::new(
                single_catalog_name(&definition.path),
                normalize_relative_path(&definition.path),
                include,
                exclude,
                config.clone(),
            )?);
            continue;
        }

        // Expand {name} against the filesystem: every matching directory
        // becomes its own catalog.
        for pattern in include.iter().map(|path| path.replace(NAME, "*")) {
            for candidate in glob::glob(&pattern)? {
                let candidate = candidate?;
                if !candidate.is_dir() {
                    continue;
                }
                let Some(name) = candidate.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                catalogs.push(Catalog::new(
                    Some(name.to_string()),
                    normalize_relative_path(&definition.path.replace(NAME, name)),
                    include.iter().map(|path| path.replace(NAME, name)).collect(),
                    exclude.iter().map(|path| path.replace(NAME, name)).collect(),
                    config.clone(),
                )?);
            }
        }
    }

    Ok(catalogs)
}

// The catalog name is the last segment of its path, unless that segment
// is the locale placeholder.
fn single_catalog_name(path: &str) -> Option<String> {
    let last = path.rsplit('/').next().unwrap_or(path);
    if last == LOCALE {
        None
    } else {
        Some(last.to_string())
    }
}

fn trailing_separator_error(definition: &CatalogConfig, config: &LinguaConfig) -> CatalogError {
    let correct_path = definition.path.trim_end_matches('/');
    let extension = get_format(&config.format)
        .map(|format| format.catalog_extension().to_string())
        .unwrap_or_default();
    let example_locale = config.locales.first().map(String::as_str).unwrap_or("en");
    let example = format!("{}{extension}", correct_path.replace(LOCALE, example_locale));
    CatalogError::InvalidCatalogPath {
        path: definition.path.clone(),
        reason: format!(
            "remove the trailing slash; a catalog path is a translation file without extension, \
             e.g. \"{correct_path}\" resolves to \"{example}\""
        ),
    }
}

/// Map an on-disk catalog file back to the catalog and locale it belongs
/// to.
pub fn get_catalog_for_file<'a>(
    file: &str,
    catalogs: &'a [Catalog],
) -> Option<(String, &'a Catalog)> {
    let file = normalize_relative_path(file);
    for catalog in catalogs {
        let catalog_file = format!("{}{}", catalog.path, catalog.format.catalog_extension());
        let pattern = format!(
            "^{}$",
            regex::escape(&catalog_file).replace(r"\{locale\}", "([^/]+)")
        );
        let Ok(matcher) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(captures) = matcher.captures(&file) {
            if let Some(locale) = captures.get(1) {
                return Some((locale.as_str().to_string(), catalog));
            }
        }
    }
    None
}
