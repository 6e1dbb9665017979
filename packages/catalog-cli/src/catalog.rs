//! Per-catalog orchestration.
//!
//! A `Catalog` ties one configured path template to its source globs and
//! drives the collect → merge → clean → sort → write pipeline against
//! the engine.

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use lingua_catalog::config::LinguaConfig;
use lingua_catalog::formats::{get_format, CatalogFormat, FormatOptions};
use lingua_catalog::merge::{merge, MergeOptions};
use lingua_catalog::message::{
    promote_extracted, AllCatalogs, Catalog as MessageCatalog, ExtractedCatalog,
};
use lingua_catalog::order::{clean_obsolete, order};
use lingua_catalog::resolve::{get_translations, Resolved, TranslationOptions};
use lingua_catalog::util::write_file_if_changed;
use lingua_catalog::CatalogError;

use crate::extract::{collect_fragments, Extractor};

/// Locale placeholder in catalog path templates.
pub const LOCALE: &str = "{locale}";
/// Catalog-name placeholder in multi-catalog setups.
pub const NAME: &str = "{name}";

// Everything from the locale placeholder onward is replaced when
// deriving the template file name.
static LOCALE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{locale\}.*$").unwrap());

// Staging directories are unique per collect call so concurrent runs in
// one process never collide.
static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Options for one `make` run.
#[derive(Debug, Clone, Default)]
pub struct MakeOptions {
    /// Remove obsolete messages after the merge.
    pub clean: bool,
    /// Overwrite source-locale translations from the newest defaults.
    pub overwrite: bool,
    /// Only write the catalog for this locale.
    pub locale: Option<String>,
    /// Limit extraction to matching source files (partial merge).
    pub files: Option<Vec<String>>,
}

pub struct Catalog {
    pub name: Option<String>,
    /// Path template containing the locale placeholder, without the
    /// format extension.
    pub path: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub config: LinguaConfig,
    pub format: Box<dyn CatalogFormat>,
    locale_dir: String,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("config", &self.config)
            .field("locale_dir", &self.locale_dir)
            .finish()
    }
}

impl Catalog {
    pub fn new(
        name: Option<String>,
        path: String,
        include: Vec<String>,
        exclude: Vec<String>,
        config: LinguaConfig,
    ) -> Result<Self> {
        let format = get_format(&config.format)?;
        let locale_dir = match path.find(LOCALE) {
            Some(position) => path[..position].to_string(),
            None => {
                return Err(CatalogError::InvalidCatalogPath {
                    path,
                    reason: format!("the {LOCALE} placeholder is missing"),
                }
                .into())
            }
        };
        Ok(Catalog {
            name,
            path,
            include,
            exclude,
            config,
            format,
            locale_dir,
        })
    }

    pub fn locales(&self) -> &[String] {
        &self.config.locales
    }

    /// Directory prefix holding the per-locale files; always excluded
    /// from source scanning.
    pub fn locale_dir(&self) -> &str {
        &self.locale_dir
    }

    pub fn locale_file(&self, locale: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}{}",
            self.path.replace(LOCALE, locale),
            self.format.catalog_extension()
        ))
    }

    pub fn template_file(&self) -> PathBuf {
        PathBuf::from(LOCALE_SUFFIX.replace(&self.path, "messages.pot").into_owned())
    }

    pub fn compiled_file(&self, locale: &str) -> PathBuf {
        PathBuf::from(format!("{}.json", self.path.replace(LOCALE, locale)))
    }

    /// Source files feeding this catalog: include globs (directories
    /// expand recursively) minus the locale dir and the exclude globs.
    pub fn source_paths(&self) -> Result<Vec<String>> {
        let exclude: Vec<glob::Pattern> = self
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .with_context(|| format!("invalid exclude pattern {pattern:?}"))
            })
            .collect::<Result<_>>()?;

        let mut paths = Vec::new();
        for include in &self.include {
            let pattern = if Path::new(include).is_dir() {
                format!("{}/**/*.*", include.trim_end_matches('/'))
            } else {
                include.clone()
            };
            let entries = glob::glob(&pattern)
                .with_context(|| format!("invalid include pattern {pattern:?}"))?;
            for entry in entries {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }
                let path = normalize_path(&path);
                if !self.locale_dir.is_empty() && path.starts_with(&self.locale_dir) {
                    continue;
                }
                if exclude.iter().any(|pattern| pattern.matches(&path)) {
                    continue;
                }
                paths.push(path);
            }
        }
        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    /// Run extraction over the catalog's sources and fold the produced
    /// fragments into one extracted catalog.
    pub fn collect(
        &self,
        extractor: &dyn Extractor,
        files: Option<&[String]>,
    ) -> Result<ExtractedCatalog> {
        let staging = std::env::temp_dir().join(format!(
            "lingua-{}-{}",
            std::process::id(),
            STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let collected = self.collect_into(&staging, extractor, files);
        let _ = fs::remove_dir_all(&staging);
        collected
    }

    fn collect_into(
        &self,
        staging: &Path,
        extractor: &dyn Extractor,
        files: Option<&[String]>,
    ) -> Result<ExtractedCatalog> {
        let mut paths = self.source_paths()?;
        if let Some(files) = files {
            let filter = file_subset_filter(files)?;
            paths.retain(|path| filter.is_match(path));
        }

        // Extraction is per file and independent of merge correctness,
        // so dispatch in parallel and collect afterwards.
        paths
            .par_iter()
            .map(|path| extractor.extract(Path::new(path), staging))
            .collect::<Result<Vec<_>>>()?;

        collect_fragments(staging)
    }

    pub fn read(&self, locale: &str) -> Result<Option<MessageCatalog>> {
        let filename = self.locale_file(locale);
        if !filename.exists() {
            return Ok(None);
        }
        let catalog = self
            .format
            .read(&filename)
            .with_context(|| format!("cannot read catalog {}", filename.display()))?;
        Ok(Some(catalog))
    }

    /// One entry per configured locale; locales without a stored file
    /// map to an empty catalog.
    pub fn read_all(&self) -> Result<AllCatalogs> {
        let mut catalogs = AllCatalogs::new();
        for locale in self.locales() {
            catalogs.insert(locale.clone(), self.read(locale)?.unwrap_or_default());
        }
        Ok(catalogs)
    }

    /// Returns whether the file was newly created, and its path.
    pub fn write(&self, locale: &str, messages: &MessageCatalog) -> Result<(bool, PathBuf)> {
        let filename = self.locale_file(locale);
        let created = !filename.exists();
        if let Some(directory) = filename.parent() {
            fs::create_dir_all(directory)?;
        }
        let options = FormatOptions {
            locale: Some(locale.to_string()),
            ..self.config.format_options.clone()
        };
        self.format
            .write(&filename, messages, &options)
            .with_context(|| format!("cannot write catalog {}", filename.display()))?;
        Ok((created, filename))
    }

    pub fn write_all(&self, catalogs: &AllCatalogs) -> Result<()> {
        for locale in self.locales() {
            if let Some(catalog) = catalogs.get(locale) {
                self.write(locale, catalog)?;
            }
        }
        Ok(())
    }

    pub fn write_template(&self, messages: &MessageCatalog) -> Result<PathBuf> {
        let filename = self.template_file();
        if let Some(directory) = filename.parent() {
            fs::create_dir_all(directory)?;
        }
        let options = FormatOptions {
            locale: None,
            ..self.config.format_options.clone()
        };
        self.format
            .write(&filename, messages, &options)
            .with_context(|| format!("cannot write template {}", filename.display()))?;
        Ok(filename)
    }

    pub fn write_compiled(&self, locale: &str, contents: &str) -> Result<PathBuf> {
        let filename = self.compiled_file(locale);
        if let Some(directory) = filename.parent() {
            fs::create_dir_all(directory)?;
        }
        write_file_if_changed(&filename, contents)?;
        Ok(filename)
    }

    /// Collect, merge against the stored catalogs, post-process, write.
    pub fn make(&self, extractor: &dyn Extractor, options: &MakeOptions) -> Result<AllCatalogs> {
        let next_catalog = self.collect(extractor, options.files.as_deref())?;
        self.make_from(next_catalog, options)
    }

    /// The merge pipeline over already-collected extraction output.
    pub fn make_from(
        &self,
        next_catalog: ExtractedCatalog,
        options: &MakeOptions,
    ) -> Result<AllCatalogs> {
        let prev_catalogs = self.read_all()?;

        let merge_options = MergeOptions {
            overwrite: options.overwrite,
            files: options.files.clone(),
        };
        let merged = merge(
            &prev_catalogs,
            &next_catalog,
            self.config.source_locale.as_deref(),
            &merge_options,
        );

        let mut processed = AllCatalogs::new();
        for (locale, catalog) in merged {
            let catalog = if options.clean {
                clean_obsolete(catalog)
            } else {
                catalog
            };
            processed.insert(locale, order(self.config.order_by, catalog)?);
        }

        match &options.locale {
            Some(locale) => {
                if let Some(catalog) = processed.get(locale) {
                    self.write(locale, catalog)?;
                }
            }
            None => self.write_all(&processed)?,
        }
        Ok(processed)
    }

    pub fn make_template(&self, extractor: &dyn Extractor) -> Result<PathBuf> {
        let collected = self.collect(extractor, None)?;
        self.make_template_from(collected)
    }

    pub fn make_template_from(&self, collected: ExtractedCatalog) -> Result<PathBuf> {
        let catalog = order(self.config.order_by, promote_extracted(collected))?;
        self.write_template(&catalog)
    }

    /// Materialize every key of `locale` through the fallback chain.
    pub fn get_translations(&self, locale: &str) -> Result<IndexMap<String, Resolved>> {
        let catalogs = self.read_all()?;
        let options = TranslationOptions {
            source_locale: self.config.source_locale.as_deref(),
            fallback_locales: &self.config.fallback_locales,
        };
        Ok(get_translations(&catalogs, locale, &options))
    }
}

/// Strip a leading `./`; keep everything else as-is.
pub fn normalize_relative_path(path: &str) -> String {
    path.strip_prefix("./").unwrap_or(path).to_string()
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// Case-insensitive alternation over the requested files, each entry
// escaped so path metacharacters match literally.
fn file_subset_filter(files: &[String]) -> Result<Regex> {
    let alternation = files
        .iter()
        .map(|file| regex::escape(normalize_relative_path(file).as_str()))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .context("invalid file filter")
}
