use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use changedir::commands::{self, CommandError};
use changedir::core::config::{self, LogLevel, ResolvedConfig};
use changedir::core::history::History;
use changedir::prompt::CrosstermTerminal;
use changedir::shells::Shell;
use clap::{CommandFactory, Parser, Subcommand};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(
    name = "changedir",
    about = "Maintain a history of visited directories",
    long_about = "Utility that helps you maintain visited directories history. \
                  You can get help for any command using -h, e.g.: `changedir ignore apply -h`."
)]
struct Args {
    /// History file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List all directories, most recently stored first
    List {
        /// Prefix each line with its timestamp (tab separated)
        #[arg(long)]
        time: bool,
    },
    /// Put a directory to history unless the ignore list matches it
    Put { directory: Option<String> },
    /// Remove a directory from history
    Remove { directory: Option<String> },
    /// Remove non-existent directories (and non-directories) from history
    Prune {
        /// Only print what would be removed
        #[arg(long)]
        dry: bool,
    },
    /// Manage the ignore list of regular expressions
    Ignore {
        #[command(subcommand)]
        command: IgnoreCommand,
    },
    /// Install shell integration (interactive)
    ///
    /// Before writing anything to any file it prints what will happen and
    /// asks for confirmation.
    Install {
        /// Skip the shell menu
        #[arg(long, value_enum)]
        shell: Option<Shell>,
    },
}

#[derive(Subcommand)]
enum IgnoreCommand {
    /// List all regexps, each enclosed in '' quotes
    List,
    /// Add a regexp; matching directories will not be stored
    Put { regexp: Option<String> },
    /// Remove a regexp from the list
    Remove { regexp: Option<String> },
    /// Apply the ignore list to existing entries, printing removed ones
    Apply {
        /// Only print what would be removed
        #[arg(long)]
        dry: bool,
    },
}

fn init_logging(config: &ResolvedConfig) {
    if config.log_level == LogLevel::Off {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Some(parent) = config.log_file.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        let _ = WriteLogger::init(config.log_level.into(), log_config, log_file);
    }
}

fn run(args: Args, config: &ResolvedConfig) -> Result<(), CommandError> {
    let Some(command) = args.command else {
        Args::command().print_help()?;
        println!("\nHistory file:\n  {}", config.history_file.display());
        return Ok(());
    };

    let open = || History::open(&config.history_file);
    let mut out = io::stdout().lock();
    match command {
        Command::List { time } => commands::list(&open()?, time, &mut out)?,
        Command::Put { directory } => {
            commands::put(&mut open()?, directory.as_deref().unwrap_or_default())?
        }
        Command::Remove { directory } => {
            commands::remove(&mut open()?, directory.as_deref().unwrap_or_default())?
        }
        Command::Prune { dry } => commands::prune(&mut open()?, dry, &mut out)?,
        Command::Ignore { command } => match command {
            IgnoreCommand::List => commands::ignore_list(&open()?, &mut out)?,
            IgnoreCommand::Put { regexp } => commands::ignore_put(
                &mut open()?,
                regexp.as_deref().unwrap_or_default(),
                &mut out,
            )?,
            IgnoreCommand::Remove { regexp } => {
                commands::ignore_remove(&mut open()?, regexp.as_deref().unwrap_or_default())?
            }
            IgnoreCommand::Apply { dry } => commands::ignore_apply(&mut open()?, dry, &mut out)?,
        },
        Command::Install { shell } => {
            let mut term = CrosstermTerminal::new(config.color);
            commands::install(&mut term, shell, config)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match config::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", CommandError::from(e));
            return ExitCode::from(1);
        }
    };
    let resolved = config::resolve(&loaded, args.history.as_deref());
    init_logging(&resolved);

    log::debug!("changedir starting, history at {}", resolved.history_file.display());

    match run(args, &resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
