use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use genie::cli::Cli;
use genie::config::ModelConfig;
use genie::exec::detect_os;
use genie::history::History;
use genie::output::display_error;
use genie::prompt::{script_language, Mode};
use genie::providers;
use genie::session::{Session, SessionFlags};

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "genie", &mut io::stdout());
}

/// Log to logs/genie.log; the terminal stays reserved for the session.
fn init_logging() -> Result<()> {
    let log_dir = Path::new("logs");
    std::fs::create_dir_all(log_dir).context("failed to create logs directory")?;
    let log_file = std::fs::File::options()
        .create(true)
        .append(true)
        .open(log_dir.join("genie.log"))
        .context("failed to open log file")?;

    let filter = EnvFilter::try_from_env("GENIE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let os_name = detect_os().to_string();
    let language = match cli.mode {
        Mode::Script => script_language(&os_name),
        _ => cli.lang,
    };

    let config = ModelConfig::load(&cli.model);
    let model = config.resolved_model(&cli.model);
    info!(%model, mode = %cli.mode, %language, %os_name, "starting session");

    let system_message = std::fs::read_to_string(&cli.system_message).with_context(|| {
        format!(
            "failed to read system message file {}",
            cli.system_message.display()
        )
    })?;

    let provider = providers::for_model(&model, &config)?;
    let history = History::new(&cli.history_dir)?;
    let flags = SessionFlags {
        save_code: cli.save_code,
        auto_execute: cli.exec,
        display_code: cli.display_code,
    };

    let mut session = Session::new(
        cli.mode,
        language,
        os_name,
        model,
        config,
        system_message,
        flags,
        provider,
        history,
    )?;
    session.run()
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return;
    }

    if let Err(err) = init_logging() {
        display_error(&format!("{err:#}"));
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        tracing::error!(error = ?err, "fatal error");
        display_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}
