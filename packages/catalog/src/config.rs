//! Project configuration.
//!
//! Deserialized from `lingua.config.json`. Field names are camelCase on
//! the wire and everything has a sensible default, so a minimal config
//! only declares locales and catalogs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::formats::FormatOptions;
use crate::order::OrderBy;

/// Accepts `"src"` or `["src", "lib"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OneOrMany::Many(values) if values.is_empty())
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// One configured catalog: where its per-locale files live and which
/// sources feed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Path template containing the `{locale}` placeholder, without the
    /// format extension. May also contain `{name}` for multi-catalog
    /// setups.
    pub path: String,
    pub include: OneOrMany<String>,
    #[serde(default)]
    pub exclude: OneOrMany<String>,
}

/// Fallback locale configuration: per-locale chains plus an optional
/// default used when no specific mapping applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackLocales {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Maps a target locale to one fallback locale or an ordered list.
    #[serde(flatten)]
    pub locales: IndexMap<String, OneOrMany<String>>,
}

impl FallbackLocales {
    pub fn get(&self, locale: &str) -> Option<&OneOrMany<String>> {
        self.locales.get(locale)
    }
}

/// Top-level project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinguaConfig {
    /// The fixed locale set; one catalog file exists per entry.
    pub locales: Vec<String>,
    /// Locale the default texts are authored in.
    pub source_locale: Option<String>,
    pub fallback_locales: FallbackLocales,
    pub catalogs: Vec<CatalogConfig>,
    pub format: String,
    pub format_options: FormatOptions,
    pub order_by: OrderBy,
    pub root_dir: String,
}

impl Default for LinguaConfig {
    fn default() -> Self {
        LinguaConfig {
            locales: Vec::new(),
            source_locale: None,
            fallback_locales: FallbackLocales::default(),
            catalogs: Vec::new(),
            format: "po".to_string(),
            format_options: FormatOptions::default(),
            order_by: OrderBy::default(),
            root_dir: ".".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: LinguaConfig = serde_json::from_str(
            r#"{
                "locales": ["en", "cs"],
                "sourceLocale": "en",
                "catalogs": [{"path": "locales/{locale}/messages", "include": "src"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.format, "po");
        assert_eq!(config.order_by, OrderBy::MessageId);
        assert!(config.format_options.origins);
        assert!(config.format_options.line_numbers);
        assert_eq!(config.catalogs[0].include.to_vec(), vec!["src"]);
    }

    #[test]
    fn fallback_locales_accept_single_and_list() {
        let fallbacks: FallbackLocales = serde_json::from_str(
            r#"{"default": "en", "cs": "sk", "pt-BR": ["pt-PT", "pt"]}"#,
        )
        .unwrap();
        assert_eq!(fallbacks.default.as_deref(), Some("en"));
        assert_eq!(
            fallbacks.get("cs").map(OneOrMany::to_vec),
            Some(vec!["sk".to_string()])
        );
        assert_eq!(
            fallbacks.get("pt-BR").map(OneOrMany::to_vec),
            Some(vec!["pt-PT".to_string(), "pt".to_string()])
        );
    }
}
