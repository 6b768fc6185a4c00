use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

use dvk::{
    commands,
    installer::InstallMode,
    paths::Paths,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "dvk")]
#[command(about = "Developer workflow toolkit - scaffold projects, install tools, snapshot directories")]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print debug output, including the external commands run
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new C/C++/Assembly project interactively
    Create,

    /// Install an executable into a bin directory
    Install {
        /// File to install
        file: PathBuf,

        /// Symlink to the file instead of copying it
        #[arg(long, conflicts_with = "auto")]
        link: bool,

        /// Detect the system bin directory and copy there
        #[arg(long, conflicts_with = "target_dir")]
        auto: bool,

        /// Install into this directory
        #[arg(long, value_name = "DIR")]
        target_dir: Option<PathBuf>,
    },

    /// Make a clean copy of the current directory next to it
    Clone {
        /// Write a .tar.gz archive instead of a directory
        #[arg(short, long)]
        compress: bool,

        /// Name suffix (default: clean_YYYYMMDD_HHMMSS)
        suffix: Option<String>,
    },

    /// Install dvk itself
    Bootstrap,

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version go to stdout and are not failures
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let ui = Ui::new(cli.color, cli.no_color).with_verbose(cli.verbose);
    match run(cli.command, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui.err(format!("A critical error has occurred: {:#}", err));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<Commands>, ui: &Ui) -> Result<()> {
    let Some(command) = command else {
        commands::overview(ui);
        return Ok(());
    };

    match command {
        Commands::Create => commands::create(&Paths::new()?, ui),
        Commands::Install {
            file,
            link,
            auto,
            target_dir,
        } => {
            let mode = if link {
                InstallMode::Link
            } else if auto {
                InstallMode::Auto
            } else {
                InstallMode::Copy
            };
            commands::install(&Paths::new()?, ui, &file, mode, target_dir)
        }
        Commands::Clone { compress, suffix } => {
            commands::clone(&Paths::new()?, ui, suffix, compress)
        }
        Commands::Bootstrap => commands::bootstrap(&Paths::new()?, ui),
        Commands::Completions { shell } => {
            commands::completions(&mut Cli::command(), shell);
            Ok(())
        }
    }
}
