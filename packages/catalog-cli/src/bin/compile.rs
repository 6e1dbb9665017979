/**
 * lingua-compile
 *
 * Resolves every locale through the fallback chain and writes compiled
 * JSON message maps next to the catalogs.
 */
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use lingua_catalog::resolve::Resolved;
use lingua_catalog_cli::config::{load_config, DEFAULT_CONFIG_FILE};
use lingua_catalog_cli::discovery::get_catalogs;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Command::new("lingua-compile")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve translations and write compiled message maps")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to lingua.config.json"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail when any message resolves to no translation"),
        )
        .get_matches();

    if let Err(error) = run(&matches) {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_FILE);
    let config = load_config(Path::new(config_path))?;
    let catalogs = get_catalogs(&config)?;
    let strict = matches.get_flag("strict");

    for catalog in &catalogs {
        for locale in catalog.locales() {
            let translations = catalog.get_translations(locale)?;

            if strict {
                let missing = missing_keys(&translations);
                if !missing.is_empty() {
                    anyhow::bail!(
                        "missing translations for locale \"{locale}\": {}",
                        missing.join(", ")
                    );
                }
            }

            let json = serde_json::to_string_pretty(&translations)?;
            let path = catalog.write_compiled(locale, &json)?;
            println!("Compiled {}", path.display());
        }
    }

    Ok(())
}

fn missing_keys(translations: &indexmap::IndexMap<String, Resolved>) -> Vec<String> {
    let mut missing = Vec::new();
    for (key, resolved) in translations {
        match resolved {
            Resolved::Message(None) => missing.push(key.clone()),
            Resolved::Message(Some(_)) => {}
            Resolved::Context(bucket) => {
                for (message_key, translation) in bucket {
                    if translation.is_none() {
                        missing.push(format!("{key}/{message_key}"));
                    }
                }
            }
        }
    }
    missing
}
