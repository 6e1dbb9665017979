//! Catalog merge engine.
//!
//! Three-way merges previously translated catalogs against freshly
//! extracted messages, per locale and per context bucket. Keys never
//! vanish in a merge: messages that dropped out of the extraction are
//! carried forward flagged obsolete until cleanup prunes them.

use indexmap::IndexMap;

use crate::context::{compose, split, ContextSplit};
use crate::message::{
    AllCatalogs, Catalog, CatalogMessage, Entry, ExtractedCatalog, ExtractedMessage,
};

/// Options controlling one merge pass.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Force source-locale translations back to the extracted default
    /// text even when a human edit is detected.
    pub overwrite: bool,
    /// Set when the extraction only scanned a subset of source files.
    /// Keys missing from such a pass cannot be judged absent, so nothing
    /// is marked obsolete.
    pub files: Option<Vec<String>>,
}

impl MergeOptions {
    fn keeps_stale_alive(&self) -> bool {
        self.files.is_some()
    }
}

/// Merge `next` into every locale of `prev`. The locale set is fixed by
/// `prev` (one entry per configured locale) and does not change here.
pub fn merge(
    prev: &AllCatalogs,
    next: &ExtractedCatalog,
    source_locale: Option<&str>,
    options: &MergeOptions,
) -> AllCatalogs {
    let next_split = split(next);
    prev.iter()
        .map(|(locale, prev_catalog)| {
            let is_source = source_locale == Some(locale.as_str());
            (
                locale.clone(),
                merge_locale(prev_catalog, &next_split, is_source, options),
            )
        })
        .collect()
}

fn merge_locale(
    prev_catalog: &Catalog,
    next_split: &ContextSplit<ExtractedMessage>,
    is_source_locale: bool,
    options: &MergeOptions,
) -> Catalog {
    let prev_split = split(prev_catalog);
    let empty = IndexMap::new();

    let mut merged = ContextSplit {
        default_messages: merge_bucket(
            &prev_split.default_messages,
            &next_split.default_messages,
            is_source_locale,
            options,
        ),
        named_contexts: IndexMap::new(),
    };
    for (name, next_bucket) in &next_split.named_contexts {
        let prev_bucket = prev_split.named_contexts.get(name).unwrap_or(&empty);
        merged.named_contexts.insert(
            name.clone(),
            merge_bucket(prev_bucket, next_bucket, is_source_locale, options),
        );
    }

    // Contexts that disappeared from the extraction go stale wholesale.
    let mut stale_contexts: IndexMap<String, IndexMap<String, CatalogMessage>> = IndexMap::new();
    for (name, prev_bucket) in &prev_split.named_contexts {
        if next_split.named_contexts.contains_key(name) {
            continue;
        }
        let bucket = prev_bucket
            .iter()
            .map(|(key, message)| {
                let mut message = message.clone();
                message.obsolete = !options.keeps_stale_alive();
                (key.clone(), message)
            })
            .collect();
        stale_contexts.insert(name.clone(), bucket);
    }

    // Recompose. Stale contexts are layered in last and never shadow a
    // live entry that took the same key.
    let mut catalog = compose(merged);
    for (name, bucket) in stale_contexts {
        catalog.entry(name).or_insert(Entry::Context(bucket));
    }
    catalog
}

fn merge_bucket(
    prev: &IndexMap<String, CatalogMessage>,
    next: &IndexMap<String, ExtractedMessage>,
    is_source_locale: bool,
    options: &MergeOptions,
) -> IndexMap<String, CatalogMessage> {
    let mut result = IndexMap::new();

    for (key, message) in next {
        let merged = match prev.get(key) {
            None => seed_message(key, message, is_source_locale),
            Some(previous) => merge_message(
                key,
                previous,
                message,
                is_source_locale,
                options.overwrite,
            ),
        };
        result.insert(key.clone(), merged);
    }

    // Keys gone from the extraction survive, flagged obsolete unless the
    // pass was scoped to a file subset.
    for (key, previous) in prev {
        if next.contains_key(key) {
            continue;
        }
        let mut message = previous.clone();
        message.obsolete = !options.keeps_stale_alive();
        result.insert(key.clone(), message);
    }

    result
}

/// A brand-new key: the source locale is seeded with the default text (or
/// the key itself), every other locale starts untranslated.
fn seed_message(key: &str, next: &ExtractedMessage, is_source_locale: bool) -> CatalogMessage {
    let translation = if is_source_locale {
        next.defaults.clone().unwrap_or_else(|| key.to_string())
    } else {
        String::new()
    };
    from_extraction(translation, next)
}

/// A key present on both sides. The stored translation is kept unless it
/// still matches the previously stored default text (or an overwrite is
/// forced), in which case it tracks the new default; every other field
/// follows the extraction, and the result is never obsolete.
fn merge_message(
    key: &str,
    prev: &CatalogMessage,
    next: &ExtractedMessage,
    is_source_locale: bool,
    overwrite: bool,
) -> CatalogMessage {
    let still_seeded = matches!(
        prev.defaults.as_deref(),
        Some(defaults) if defaults == prev.translation
    );
    let update_from_defaults = is_source_locale && (still_seeded || overwrite);

    let translation = if update_from_defaults {
        next.defaults.clone().unwrap_or_else(|| key.to_string())
    } else {
        prev.translation.clone()
    };
    from_extraction(translation, next)
}

// Explicit per-field construction; the obsolete flag is never taken from
// either input here.
fn from_extraction(translation: String, next: &ExtractedMessage) -> CatalogMessage {
    CatalogMessage {
        translation,
        defaults: next.defaults.clone(),
        origin: next.origin.clone(),
        extracted_comments: next.extracted_comments.clone(),
        comments: next.comments.clone(),
        obsolete: false,
        flags: next.flags.clone(),
        context: next.context.clone(),
    }
}
