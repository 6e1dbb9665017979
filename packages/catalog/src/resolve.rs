//! Translation resolution with locale fallback.
//!
//! Materializes the effective translation for a key through a fixed
//! precedence chain, first non-empty result wins:
//!
//! 1. the locale's own stored translation,
//! 2. the locale's configured fallback chain, in order,
//! 3. the default fallback locale,
//! 4. default text baked into the catalog entry,
//! 5. the key itself when the locale is the source locale (or the default
//!    fallback locale),
//! 6. nothing — reported as a warning, never an error.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::config::FallbackLocales;
use crate::message::{AllCatalogs, CatalogMessage, Entry};

/// Resolver inputs shared across a lookup pass.
#[derive(Debug, Clone, Copy)]
pub struct TranslationOptions<'a> {
    pub source_locale: Option<&'a str>,
    pub fallback_locales: &'a FallbackLocales,
}

/// The materialized form of one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Message(Option<String>),
    Context(IndexMap<String, Option<String>>),
}

/// Resolve every key of `locale`, recursing into context buckets.
pub fn get_translations(
    catalogs: &AllCatalogs,
    locale: &str,
    options: &TranslationOptions<'_>,
) -> IndexMap<String, Resolved> {
    let mut resolved = IndexMap::new();
    let Some(catalog) = catalogs.get(locale) else {
        warn_unknown_locale(catalogs, locale);
        return resolved;
    };
    for (key, entry) in catalog {
        match entry {
            Entry::Message(_) => {
                resolved.insert(
                    key.clone(),
                    Resolved::Message(get_translation(catalogs, locale, key, None, options)),
                );
            }
            Entry::Context(bucket) => {
                let translations = bucket
                    .keys()
                    .map(|message_key| {
                        (
                            message_key.clone(),
                            get_translation(catalogs, locale, message_key, Some(key), options),
                        )
                    })
                    .collect();
                resolved.insert(key.clone(), Resolved::Context(translations));
            }
        }
    }
    resolved
}

/// Resolve one key through the fallback chain. `None` means no
/// translation could be found anywhere; callers tolerate it and
/// typically render nothing or the key.
pub fn get_translation(
    catalogs: &AllCatalogs,
    locale: &str,
    key: &str,
    context: Option<&str>,
    options: &TranslationOptions<'_>,
) -> Option<String> {
    if lookup_message(catalogs, locale, key, context).is_none() {
        match context {
            Some(context) => warn!(key, context, locale, "message is missing from the catalog"),
            None => warn!(key, locale, "message is missing from the catalog"),
        }
    }

    // 1. Direct translation in the requested locale.
    if let Some(translation) = direct_translation(catalogs, locale, key, context) {
        return Some(translation);
    }

    // 2. The locale's configured fallback chain, scanning past
    //    candidates without a usable translation.
    if let Some(fallbacks) = options.fallback_locales.get(locale) {
        for fallback in fallbacks.iter() {
            if let Some(translation) = fallback_translation(catalogs, fallback, key, context) {
                return Some(translation);
            }
        }
    }

    // 3. The default fallback locale.
    if let Some(default) = options.fallback_locales.default.as_deref() {
        if let Some(translation) = fallback_translation(catalogs, default, key, context) {
            return Some(translation);
        }
    }

    // 4. Default text baked into the catalog entry.
    if let Some(message) = lookup_message(catalogs, locale, key, context) {
        if let Some(defaults) = message.defaults.as_ref().filter(|d| !d.is_empty()) {
            return Some(defaults.clone());
        }
    }

    // 5. The key itself stands in for the source locale and for the
    //    default fallback locale.
    if options.source_locale == Some(locale)
        || options.fallback_locales.default.as_deref() == Some(locale)
    {
        return Some(key.to_string());
    }

    // 6. Nothing found.
    warn!(key, locale, "no translation found through the fallback chain");
    None
}

fn fallback_translation(
    catalogs: &AllCatalogs,
    locale: &str,
    key: &str,
    context: Option<&str>,
) -> Option<String> {
    if !catalogs.contains_key(locale) {
        warn_unknown_locale(catalogs, locale);
        return None;
    }
    direct_translation(catalogs, locale, key, context)
}

fn direct_translation(
    catalogs: &AllCatalogs,
    locale: &str,
    key: &str,
    context: Option<&str>,
) -> Option<String> {
    let message = lookup_message(catalogs, locale, key, context)?;
    if message.translation.is_empty() {
        None
    } else {
        Some(message.translation.clone())
    }
}

/// Look a key up in a locale's catalog. With a context, the named bucket
/// is preferred; a locale that stores the key flat still resolves.
fn lookup_message<'a>(
    catalogs: &'a AllCatalogs,
    locale: &str,
    key: &str,
    context: Option<&str>,
) -> Option<&'a CatalogMessage> {
    let catalog = catalogs.get(locale)?;
    if let Some(context) = context {
        if let Some(Entry::Context(bucket)) = catalog.get(context) {
            return bucket.get(key);
        }
    }
    match catalog.get(key)? {
        Entry::Message(message) => Some(message),
        Entry::Context(_) => None,
    }
}

fn warn_unknown_locale(catalogs: &AllCatalogs, locale: &str) {
    let configured = catalogs
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    warn!(
        locale,
        configured = %configured,
        "locale is not part of the configured locale set"
    );
}
