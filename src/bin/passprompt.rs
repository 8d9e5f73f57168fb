//! passprompt CLI - masked password entry
//!
//! Prompts for a password on the terminal, or reads one line from stdin
//! when it is not a terminal, and writes the result to stdout for use by
//! scripts (askpass style). Prompts and logs go to stderr.

use std::error::Error as StdError;
use std::io::{self, Write};
use std::process;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use passprompt::error::{ErrorCategory, ErrorKind, PromptError, Result};
use passprompt::{MAX_PASSWORD_SIZE, PromptConfig, Prompter, SecretBuffer, login};

/// Upper bound for `--max-length`.
const MAX_LENGTH_LIMIT: u64 = 1 << 20;

#[derive(Parser)]
#[command(name = "passprompt")]
#[command(version)]
#[command(about = "Masked password entry for scripts.", long_about = None)]
struct Cli {
    /// Maximum number of bytes accepted per entry; further input is ignored
    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        default_value_t = MAX_PASSWORD_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_LENGTH_LIMIT),
    )]
    max_length: usize,

    /// Character shown for every byte typed on a terminal
    #[arg(long, global = true, default_value_t = '*')]
    mask: char,

    /// Increase log verbosity (-v = debug, -vv = trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a password and print it to stdout
    #[command(alias = "p")]
    Prompt {
        /// On a terminal, ask twice and repeat until both entries match
        #[arg(long)]
        verify: bool,

        /// Text shown before the password is typed
        #[arg(short, long, value_name = "TEXT")]
        message: Option<String>,
    },

    /// Split USER:PASSWORD and print the username and password on separate
    /// lines, prompting for the password when no `:` is given
    #[command(alias = "l")]
    Login {
        /// Username, optionally followed by `:` and the password
        userpass: String,

        /// On a terminal, ask twice and repeat until both entries match
        #[arg(long)]
        verify: bool,

        /// Text shown before the password is typed
        #[arg(short, long, value_name = "TEXT")]
        message: Option<String>,
    },
}

fn setup_logging(level: &str) {
    // RUST_LOG takes precedence over the command line flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    setup_logging(log_level);

    let config = PromptConfig::new().max_length(cli.max_length).mask(cli.mask);
    let mut prompter = Prompter::stdio(config);

    let result = match cli.command {
        Commands::Prompt { verify, message } => prompter
            .try_prompt(verify, message.as_deref())
            .and_then(|password| print_lines(None, &password)),
        Commands::Login {
            userpass,
            verify,
            message,
        } => login::try_parse_with(userpass, verify, message.as_deref(), &mut prompter)
            .and_then(|login| print_lines(Some(&login.username), &login.password)),
    };

    if let Err(e) = result {
        debug!(kind = ?e.kind, category = ?e.category, "exiting with error");
        eprintln!("Error: {}", e);
        let mut cause = e.source_error().map(|s| s as &dyn StdError);
        while let Some(err) = cause {
            eprintln!("  caused by: {}", err);
            cause = err.source();
        }
        process::exit(1);
    }
}

fn print_lines(username: Option<&str>, password: &SecretBuffer) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let written = username
        .map_or(Ok(()), |name| writeln!(stdout, "{}", name))
        .and_then(|()| stdout.write_all(password.expose()))
        .and_then(|()| stdout.write_all(b"\n"))
        .and_then(|()| stdout.flush());
    written.map_err(|e| {
        PromptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to write to stdout: {}", e),
            e,
        )
    })
}
