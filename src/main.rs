use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use vscode_snippets::config::{Config, Overrides};

fn main() -> Result<ExitCode> {
    let matches = Command::new("vscode-snippets")
        .version(env!("CARGO_PKG_VERSION"))
        .about("vscode-snippets: converts a folder tree of snippet files into VS Code .code-snippets bundles, one per folder.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file to use instead of searching for vscode-snippets.yaml in $HOME and the current directory"),
        )
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Snippet source directory (overrides source_path)"),
        )
        .arg(
            Arg::new("dest")
                .short('d')
                .long("dest")
                .value_name("DIR")
                .help("Directory the .code-snippets files are written to (overrides dest_path)"),
        )
        .arg(
            Arg::new("extension")
                .short('e')
                .long("extension")
                .value_name("EXT")
                .help("Only convert files with this extension instead of every non-hidden file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(&matches);

    let overrides = Overrides {
        config_file: matches.get_one::<String>("config").map(PathBuf::from),
        source: matches.get_one::<String>("source").map(PathBuf::from),
        dest: matches.get_one::<String>("dest").map(PathBuf::from),
        extension: matches.get_one::<String>("extension").cloned(),
    };
    let config = Config::load(&overrides).context("invalid configuration")?;
    log::debug!("Using {:?}", config);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let report = vscode_snippets::run(&config, &mut handle);
    handle.flush()?;

    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }

    for failure in &report.file_failures {
        log::error!("{}: {}", failure.path.display(), failure.error);
    }
    for failure in &report.folder_failures {
        log::error!("{}: {}", failure.dir_name, failure.error);
    }
    log::error!(
        "{} files and {} folders failed; {} bundles written",
        report.file_failures.len(),
        report.folder_failures.len(),
        report.written.len()
    );
    Ok(ExitCode::FAILURE)
}

fn init_logging(matches: &ArgMatches) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if matches.get_flag("quiet") {
        builder.filter_level(log::LevelFilter::Warn);
    } else if matches.get_flag("verbose") {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}
