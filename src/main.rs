mod assemble;
mod catalog;
mod commands;
mod config;
mod doctor;
mod git;
mod manifest;
mod reconcile;
mod splitter;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hordesplit",
    version,
    about = "Split the monolithic Horde repository and assemble subtree composites",
    long_about = "hordesplit drives the external horde-git-split tool over every module of\n\
                  the legacy monolithic repository, moves the split output to canonical\n\
                  per-module repositories, and can assemble a new composite repository\n\
                  from them with git subtree merges."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the legacy monolithic repository into per-module repositories
    Split {
        /// Path to the external split tool (horde-git-split)
        #[arg(short, long)]
        command: PathBuf,

        /// Path to the legacy monolithic repository
        #[arg(short, long)]
        original: PathBuf,

        /// Directory that will hold the split module repositories
        #[arg(long)]
        split_repo: PathBuf,

        /// Temporary directory for split output (default: system temp dir)
        #[arg(short, long)]
        tmp: Option<PathBuf>,

        /// Overwrite split repositories that already exist
        #[arg(long)]
        force: bool,
    },

    /// Create a composite repository from split modules using git subtree
    Create {
        /// Location of the new composite repository
        #[arg(short, long)]
        monolithic: PathBuf,

        /// Directory containing the split module repositories
        #[arg(long)]
        split_repo: PathBuf,

        /// Module(s) to merge in (default: Horde_ActiveSync)
        #[arg(long = "module", value_name = "NAME")]
        modules: Vec<String>,

        /// Branch to merge from each module repository
        #[arg(long, default_value = "master")]
        branch: String,

        /// Skip the confirmation prompt when the destination exists
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the split manifest as a table
    Status {
        /// Directory containing the split module repositories
        #[arg(long)]
        split_repo: PathBuf,
    },

    /// Check the split manifest against what is on disk
    Doctor {
        /// Directory containing the split module repositories
        #[arg(long)]
        split_repo: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split { command, original, split_repo, tmp, force } => {
            let opts = config::SplitOptions::new(command, original, split_repo, tmp, force);
            commands::split::run(&opts)?;
        }
        Commands::Create { monolithic, split_repo, modules, branch, yes } => {
            let opts = config::CreateOptions::new(monolithic, split_repo, modules, branch);
            commands::create::run(&opts, yes)?;
        }
        Commands::Status { split_repo } => commands::status::run(&split_repo)?,
        Commands::Doctor { split_repo } => commands::doctor::run(&split_repo)?,
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "hordesplit", &mut std::io::stdout());
        }
    }

    Ok(())
}
