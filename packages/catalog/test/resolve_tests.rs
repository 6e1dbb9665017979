//! Translation Resolver Tests

use indexmap::IndexMap;
use lingua_catalog::config::FallbackLocales;
use lingua_catalog::message::{AllCatalogs, Catalog, CatalogMessage, Entry};
use lingua_catalog::resolve::{get_translation, get_translations, Resolved, TranslationOptions};

fn message(translation: &str) -> CatalogMessage {
    CatalogMessage {
        translation: translation.to_string(),
        ..Default::default()
    }
}

fn locale_catalog(entries: Vec<(&str, CatalogMessage)>) -> Catalog {
    entries
        .into_iter()
        .map(|(key, message)| (key.to_string(), Entry::Message(message)))
        .collect()
}

fn catalogs(locales: Vec<(&str, Catalog)>) -> AllCatalogs {
    locales
        .into_iter()
        .map(|(locale, catalog)| (locale.to_string(), catalog))
        .collect()
}

fn fallbacks(json: &str) -> FallbackLocales {
    serde_json::from_str(json).unwrap()
}

#[test]
fn should_return_the_direct_translation() {
    let catalogs = catalogs(vec![("cs", locale_catalog(vec![("greeting", message("Ahoj"))]))]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "greeting", None, &options),
        Some("Ahoj".to_string())
    );
}

#[test]
fn should_use_a_single_fallback_locale_when_the_translation_is_empty() {
    let catalogs = catalogs(vec![
        ("cs", locale_catalog(vec![("greeting", message(""))])),
        ("sk", locale_catalog(vec![("greeting", message("Ahoj!"))])),
    ]);
    let fallback_locales = fallbacks(r#"{"cs": "sk"}"#);
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "greeting", None, &options),
        Some("Ahoj!".to_string())
    );
}

#[test]
fn should_walk_an_ordered_fallback_list() {
    let catalogs = catalogs(vec![
        ("pt-BR", locale_catalog(vec![("greeting", message(""))])),
        ("pt-PT", locale_catalog(vec![("greeting", message(""))])),
        ("pt", locale_catalog(vec![("greeting", message("Olá"))])),
    ]);
    let fallback_locales = fallbacks(r#"{"pt-BR": ["pt-PT", "pt"]}"#);
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    // pt-PT is empty and must not end the scan.
    assert_eq!(
        get_translation(&catalogs, "pt-BR", "greeting", None, &options),
        Some("Olá".to_string())
    );
}

#[test]
fn should_use_the_default_fallback_locale_after_the_chain() {
    let catalogs = catalogs(vec![
        ("cs", locale_catalog(vec![("greeting", message(""))])),
        ("sk", locale_catalog(vec![("greeting", message(""))])),
        ("en", locale_catalog(vec![("greeting", message("Hello"))])),
    ]);
    let fallback_locales = fallbacks(r#"{"default": "en", "cs": "sk"}"#);
    let options = TranslationOptions {
        source_locale: None,
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "greeting", None, &options),
        Some("Hello".to_string())
    );
}

#[test]
fn should_use_defaults_baked_into_the_catalog() {
    let mut with_defaults = message("");
    with_defaults.defaults = Some("Hello".to_string());
    let catalogs = catalogs(vec![("cs", locale_catalog(vec![("greeting", with_defaults)]))]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: None,
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "greeting", None, &options),
        Some("Hello".to_string())
    );
}

#[test]
fn should_fall_back_to_the_key_for_the_source_locale() {
    let catalogs = catalogs(vec![("en", locale_catalog(vec![("Sign in", message(""))]))]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "en", "Sign in", None, &options),
        Some("Sign in".to_string())
    );
}

#[test]
fn should_fall_back_to_the_key_for_the_default_fallback_locale() {
    let catalogs = catalogs(vec![("en", locale_catalog(vec![("Sign in", message(""))]))]);
    let fallback_locales = fallbacks(r#"{"default": "en"}"#);
    let options = TranslationOptions {
        source_locale: None,
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "en", "Sign in", None, &options),
        Some("Sign in".to_string())
    );
}

#[test]
fn should_report_nothing_when_the_chain_is_exhausted() {
    let catalogs = catalogs(vec![
        ("cs", locale_catalog(vec![("greeting", message(""))])),
        ("en", locale_catalog(vec![("greeting", message("Hello"))])),
    ]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(get_translation(&catalogs, "cs", "greeting", None, &options), None);
}

#[test]
fn should_tolerate_an_unknown_fallback_locale() {
    let catalogs = catalogs(vec![("cs", locale_catalog(vec![("greeting", message(""))]))]);
    let fallback_locales = fallbacks(r#"{"cs": "xx"}"#);
    let options = TranslationOptions {
        source_locale: None,
        fallback_locales: &fallback_locales,
    };

    assert_eq!(get_translation(&catalogs, "cs", "greeting", None, &options), None);
}

#[test]
fn should_resolve_keys_inside_a_context_bucket() {
    let mut bucket = IndexMap::new();
    bucket.insert("Open".to_string(), message("Otevřít"));
    let mut catalog = Catalog::new();
    catalog.insert("menu".to_string(), Entry::Context(bucket));
    let catalogs = catalogs(vec![("cs", catalog)]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "Open", Some("menu"), &options),
        Some("Otevřít".to_string())
    );
}

#[test]
fn should_fall_back_to_the_flat_catalog_when_the_context_is_missing() {
    let catalogs = catalogs(vec![("cs", locale_catalog(vec![("Open", message("Otevřít"))]))]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    assert_eq!(
        get_translation(&catalogs, "cs", "Open", Some("menu"), &options),
        Some("Otevřít".to_string())
    );
}

#[test]
fn should_materialize_a_whole_locale() {
    let mut bucket = IndexMap::new();
    bucket.insert("Open".to_string(), message("Otevřít"));
    let mut catalog = locale_catalog(vec![("greeting", message("Ahoj"))]);
    catalog.insert("menu".to_string(), Entry::Context(bucket));
    let catalogs = catalogs(vec![("cs", catalog)]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: Some("en"),
        fallback_locales: &fallback_locales,
    };

    let resolved = get_translations(&catalogs, "cs", &options);

    assert_eq!(
        resolved["greeting"],
        Resolved::Message(Some("Ahoj".to_string()))
    );
    match &resolved["menu"] {
        Resolved::Context(translations) => {
            assert_eq!(translations["Open"], Some("Otevřít".to_string()));
        }
        other => panic!("expected a context, got {other:?}"),
    }
}

#[test]
fn should_return_nothing_for_an_unknown_locale() {
    let catalogs = catalogs(vec![("cs", locale_catalog(vec![]))]);
    let fallback_locales = FallbackLocales::default();
    let options = TranslationOptions {
        source_locale: None,
        fallback_locales: &fallback_locales,
    };

    assert!(get_translations(&catalogs, "xx", &options).is_empty());
}
