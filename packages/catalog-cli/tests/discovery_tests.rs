//! Catalog discovery tests: path-template validation and `{name}`
//! expansion.

use std::fs;

use tempfile::TempDir;

use lingua_catalog::config::LinguaConfig;
use lingua_catalog_cli::discovery::{get_catalog_for_file, get_catalogs};

fn config(json: &str) -> LinguaConfig {
    serde_json::from_str(json).unwrap()
}

#[test]
fn should_build_one_catalog_per_definition() {
    let config = config(
        r#"{
            "locales": ["en", "cs"],
            "catalogs": [{"path": "locales/{locale}/messages", "include": "src"}]
        }"#,
    );

    let catalogs = get_catalogs(&config).unwrap();

    assert_eq!(catalogs.len(), 1);
    assert_eq!(catalogs[0].path, "locales/{locale}/messages");
    assert_eq!(catalogs[0].name.as_deref(), Some("messages"));
}

#[test]
fn should_leave_a_trailing_locale_placeholder_unnamed() {
    let config = config(
        r#"{
            "locales": ["en"],
            "catalogs": [{"path": "locales/{locale}", "include": "src"}]
        }"#,
    );

    let catalogs = get_catalogs(&config).unwrap();

    assert!(catalogs[0].name.is_none());
}

#[test]
fn should_reject_a_trailing_path_separator() {
    let config = config(
        r#"{
            "locales": ["en"],
            "catalogs": [{"path": "locales/{locale}/", "include": "src"}]
        }"#,
    );

    let error = get_catalogs(&config).unwrap_err();

    assert!(error.to_string().contains("remove the trailing slash"));
}

#[test]
fn should_reject_a_path_without_the_locale_placeholder() {
    let config = config(
        r#"{
            "locales": ["en"],
            "catalogs": [{"path": "locales/messages", "include": "src"}]
        }"#,
    );

    assert!(get_catalogs(&config).is_err());
}

#[test]
fn should_reject_name_sources_without_a_name_path() {
    let config = config(
        r#"{
            "locales": ["en"],
            "catalogs": [{
                "path": "locales/{locale}/messages",
                "include": "components/{name}"
            }]
        }"#,
    );

    let error = get_catalogs(&config).unwrap_err();

    assert!(error.to_string().contains("{name}"));
}

#[test]
fn should_expand_name_patterns_into_one_catalog_per_directory() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().to_string_lossy().replace('\\', "/");
    fs::create_dir_all(dir.path().join("components/header")).unwrap();
    fs::create_dir_all(dir.path().join("components/footer")).unwrap();
    fs::write(dir.path().join("components/stray.js"), "// not a dir").unwrap();

    let config = config(&format!(
        r#"{{
            "locales": ["en"],
            "catalogs": [{{
                "path": "{base}/components/{{name}}/locales/{{locale}}",
                "include": "{base}/components/{{name}}"
            }}]
        }}"#
    ));

    let mut catalogs = get_catalogs(&config).unwrap();
    catalogs.sort_by(|a, b| a.name.cmp(&b.name));

    let names: Vec<_> = catalogs
        .iter()
        .map(|catalog| catalog.name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["footer", "header"]);
    assert_eq!(
        catalogs[1].path,
        format!("{base}/components/header/locales/{{locale}}")
    );
    assert_eq!(
        catalogs[1].include,
        vec![format!("{base}/components/header")]
    );
}

#[test]
fn should_map_a_catalog_file_back_to_its_locale() {
    let config = config(
        r#"{
            "locales": ["en", "cs"],
            "catalogs": [{"path": "locales/{locale}/messages", "include": "src"}]
        }"#,
    );
    let catalogs = get_catalogs(&config).unwrap();

    let (locale, catalog) =
        get_catalog_for_file("./locales/cs/messages.po", &catalogs).expect("file should match");

    assert_eq!(locale, "cs");
    assert_eq!(catalog.path, "locales/{locale}/messages");

    assert!(get_catalog_for_file("locales/cs/other.po", &catalogs).is_none());
}
