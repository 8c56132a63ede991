use anyhow::Result;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use lsfs::{ConfigFile, Error, ImageBuilder, Notifier};

/// Exit status for configuration and working-directory problems.
const EXIT_STARTUP: u8 = 255;
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Creates a LocalStorageFS image of a directory, as configured by ./lsfs.json",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace). Also switches to text-based progress"
    )]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            match err.downcast_ref::<Error>() {
                Some(e) if e.is_startup() => ExitCode::from(EXIT_STARTUP),
                _ => ExitCode::from(EXIT_FAILURE),
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // All diagnostics go through the notifier's logger; no global logger is installed.
    let notifier = Notifier::new(cli.verbose);

    let working_dir = env::current_dir().map_err(|_| Error::MissingWorkingDirectory {
        path: PathBuf::from("."),
    })?;
    notifier.debug(&format!("Working directory: {}", working_dir.display()));

    // Echo what was read before the mandatory fields are checked.
    let config = ConfigFile::load(&working_dir)?;
    notifier.status(&format!("conf: {}", config));
    let options = config.validate()?;

    let builder = ImageBuilder::new(&options, &notifier)?;
    let summary = builder.build(&working_dir)?;
    notifier.debug(&format!(
        "Wrote {} ({} directories, {} files, {} unreadable)",
        summary.image_path.display(),
        summary.directories,
        summary.files,
        summary.failed
    ));

    Ok(())
}
