use clap::Parser;
use debops_update::config::{Config, Conventions, Verbosity};
use debops_update::constants::INTERRUPT_EXIT_CODE;
use debops_update::error::Error;
use debops_update::git::GitCli;
use debops_update::locator::ProjectLocator;
use debops_update::update::Updater;
use debops_update::{interrupt, output};
use std::path::PathBuf;

/// Install or update the DebOps playbooks and roles
#[derive(Parser, Debug)]
#[command(name = "debops-update", version, about, long_about = None)]
struct Cli {
    /// Project directory to install into (created if missing)
    project_dir: Option<PathBuf>,

    /// Only print errors and a final count
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show every git command and step
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config {
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
    };
    interrupt::install()?;

    match run(&cli, config) {
        Err(Error::Interrupted) => {
            output::print_aborted();
            std::process::exit(INTERRUPT_EXIT_CODE);
        }
        result => Ok(result?),
    }
}

fn run(cli: &Cli, config: Config) -> Result<(), Error> {
    let conventions = Conventions::default();
    let cwd = std::env::current_dir()?;
    let locator = ProjectLocator::discover(&conventions, &cwd);
    let location = locator.locate(cli.project_dir.as_deref())?;
    output::print_install_path(&config, &location.install_path);

    let updater = Updater::new(&conventions, GitCli::new(config.git_logger()), config);
    let report = updater.run(&location)?;
    output::print_summary(&report, &config);
    Ok(())
}
