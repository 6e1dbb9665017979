/**
 * lingua-extract
 *
 * Extracts messages from the configured sources and merges them into the
 * per-locale translation catalogs.
 */
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use lingua_catalog_cli::catalog::MakeOptions;
use lingua_catalog_cli::config::{load_config, DEFAULT_CONFIG_FILE};
use lingua_catalog_cli::discovery::get_catalogs;
use lingua_catalog_cli::extract::{collect_fragments, CommandExtractor};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Command::new("lingua-extract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract messages and update translation catalogs")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to lingua.config.json"),
        )
        .arg(
            Arg::new("extractor")
                .long("extractor")
                .value_name("COMMAND")
                .help("External extractor, run as `COMMAND <source-file> <out-dir>` per file"),
        )
        .arg(
            Arg::new("fragments")
                .long("fragments")
                .value_name("DIR")
                .conflicts_with("extractor")
                .help("Use pre-staged extraction fragments instead of running an extractor"),
        )
        .arg(
            Arg::new("clean")
                .long("clean")
                .action(ArgAction::SetTrue)
                .help("Remove obsolete messages after the merge"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Overwrite source-locale translations from the newest defaults"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("LOCALE")
                .help("Only write the catalog for one locale"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .action(ArgAction::SetTrue)
                .help("Write the .pot template instead of locale catalogs"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(0..)
                .help("Limit extraction to matching source files (partial merge)"),
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

    let files: Option<Vec<String>> = matches
        .get_many::<String>("files")
        .map(|files| files.cloned().collect::<Vec<_>>())
        .filter(|files| !files.is_empty());

    let options = MakeOptions {
        clean: matches.get_flag("clean"),
        overwrite: matches.get_flag("overwrite"),
        locale: matches.get_one::<String>("locale").cloned(),
        files,
    };

    for catalog in &catalogs {
        let collected = match (
            matches.get_one::<String>("fragments"),
            matches.get_one::<String>("extractor"),
        ) {
            (Some(fragments), _) => collect_fragments(Path::new(fragments))?,
            (None, Some(command)) => {
                let extractor = CommandExtractor::from_command_line(command)?;
                catalog.collect(&extractor, options.files.as_deref())?
            }
            (None, None) => anyhow::bail!("either --extractor or --fragments is required"),
        };

        if matches.get_flag("template") {
            let path = catalog.make_template_from(collected)?;
            println!("Wrote {}", path.display());
        } else {
            catalog.make_from(collected, &options)?;
            for locale in catalog.locales() {
                println!("Updated {}", catalog.locale_file(locale).display());
            }
        }
    }

    Ok(())
}
