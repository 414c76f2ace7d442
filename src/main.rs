use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser, Subcommand};
use pkgwire::cli::{self, Context};
use pkgwire::error::codes::{exit_code, GENERIC};
use pkgwire::error::Error;
use pkgwire::i18n::Messages;
use pkgwire::project::user_config::{load_user_config, resolve_store_dir};
use pkgwire::utils::output::{print_error, print_warning};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PKGWIRE_LOG";

#[derive(Parser)]
#[command(name = "pkgwire")]
#[command(version)]
#[command(about = "Install packaged native extensions into game projects")]
#[command(
    long_about = "pkgwire unpacks a package from the local store into a project and wires it \
into every platform's build: it copies sources, patches build descriptors and edits \
source files, all idempotently."
)]
#[command(after_help = "\
Getting started:
  pkgwire project                 Show how the current project is detected
  pkgwire list                    Packages available in the store
  pkgwire add spine               Install a package into the current project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package store directory (overrides PKGWIRE_STORE and config)
    #[arg(long, global = true, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Message language: en, zh, zh_tw
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,

    /// Log more (-v debug, -vv trace); PKGWIRE_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package into the project
    #[command(display_order = 1)]
    Add(cli::add::AddArgs),
    /// Show the resolved project layout
    #[command(display_order = 2)]
    Project(cli::project::ProjectArgs),
    /// List packages in the store
    #[command(display_order = 3)]
    List(cli::list::ListArgs),
    /// Show configuration sources
    #[command(display_order = 10)]
    Config(cli::config::ConfigArgs),
}

/// Handle clap parse errors with suggestions for common mistakes
fn handle_parse_error(mut err: clap::Error) -> ! {
    if err.kind() == ErrorKind::InvalidSubcommand {
        if let Some(ContextValue::String(cmd)) = err.get(ContextKind::InvalidSubcommand) {
            let suggestion = match cmd.as_str() {
                "install" | "add-framework" | "i" => {
                    Some("use 'pkgwire add <PACKAGE>' to install a package")
                }
                "info" | "show" => Some("use 'pkgwire project' to inspect the project"),
                _ => None,
            };
            if let Some(suggestion) = suggestion {
                err.insert(
                    ContextKind::Suggested,
                    ContextValue::StyledStrs(vec![suggestion.into()]),
                );
            }
        }
    }
    err.exit()
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.is_empty() => EnvFilter::try_new(directive)?,
        _ => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {}", e))
}

fn run(cli: &Cli, messages: &mut Messages) -> anyhow::Result<()> {
    let config = load_user_config()?;
    if cli.lang.is_none() {
        if let Some(lang) = &config.language {
            messages.set_language(lang);
        }
    }

    let ctx = Context {
        messages: messages.clone(),
        store: resolve_store_dir(cli.store.clone(), &config)?,
    };
    tracing::debug!("Using package store {}", ctx.store.display());

    match &cli.command {
        Commands::Add(args) => cli::add::execute(args, &ctx)?,
        Commands::Project(args) => cli::project::execute(args, &ctx)?,
        Commands::List(args) => cli::list::execute(args, &ctx)?,
        Commands::Config(args) => cli::config::execute(args, &ctx)?,
    }
    Ok(())
}

/// Print a failure in the user's language and pick the exit code.
fn report_failure(messages: &Messages, err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(e) => {
            print_error(&messages.format(e.message_key(), &e.message_args()));
            if matches!(e, Error::InstallAborted { .. }) {
                print_warning(messages.get("INSTALL_RESUME_HINT"));
            }
            exit_code(e)
        }
        None => {
            print_error(&format!("{:#}", err));
            GENERIC
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => handle_parse_error(e),
    };

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{:#}", e);
    }

    let mut messages = Messages::new(cli.lang.as_deref());
    if let Err(err) = run(&cli, &mut messages) {
        process::exit(report_failure(&messages, &err));
    }
}
