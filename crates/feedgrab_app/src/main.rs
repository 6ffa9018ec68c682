mod cli;
mod config;
mod console;
mod logging;
mod prompts;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use feedgrab_engine::{DownloadEngine, ReqwestTransport, RunError, RunReport, SessionStore, SignIn};
use feedgrab_logging::{grab_error, grab_info};
use log::LevelFilter;
use tokio::runtime::Runtime;

use crate::cli::Args;
use crate::config::AppConfig;
use crate::console::ConsoleSink;
use crate::prompts::TerminalDecisions;

const EXIT_FAILURE: u8 = 1;
const EXIT_START_NOT_FOUND: u8 = 2;
const EXIT_ABORTED: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log, level);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            grab_error!("{:#}", err);
            eprintln!("❌ {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(base_dir) = args.base_dir {
        config.base_dir = base_dir;
    }
    if let Some(api_url) = args.api_url {
        config.api_base_url = api_url;
    }

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let transport = ReqwestTransport::new(config.transport_settings())
        .context("Failed to build HTTP client")?;
    let transport = authenticate(&runtime, transport, &SessionStore::new(&config.session_file))?;
    println!("✅ Logged in");

    let channel = match args.channel {
        Some(channel) => channel,
        None => prompts::channel()?,
    };
    let limit = match args.limit {
        Some(limit) => limit,
        None => prompts::message_limit()?,
    };

    let engine = DownloadEngine::new(
        config.engine_config(),
        Arc::new(transport),
        Arc::new(TerminalDecisions),
        Arc::new(ConsoleSink),
    );
    println!("📥 Fetching {limit} messages from {channel}...");
    let result = runtime.block_on(engine.run(&channel, limit));
    Ok(report(result))
}

/// Reuse the stored session or sign in interactively and store the new one.
fn authenticate(
    runtime: &Runtime,
    transport: ReqwestTransport,
    store: &SessionStore,
) -> anyhow::Result<ReqwestTransport> {
    let stored = store
        .load()
        .with_context(|| format!("Failed to read session file {}", store.path().display()))?;
    if let Some(token) = stored {
        grab_info!("Using stored session from {:?}", store.path());
        return Ok(transport.with_session(token));
    }

    let phone = prompts::phone_number()?;
    runtime
        .block_on(transport.send_code(&phone))
        .context("Failed to request verification code")?;
    let password = prompts::two_factor_password()?;
    let code = prompts::verification_code()?;
    let token = runtime
        .block_on(transport.sign_in(&SignIn {
            phone,
            code,
            password,
        }))
        .context("Sign-in failed")?;
    store
        .save(&token)
        .with_context(|| format!("Failed to save session to {}", store.path().display()))?;
    println!("✅ Session saved to {}", store.path().display());
    Ok(transport.with_session(token))
}

fn report(result: Result<RunReport, RunError>) -> ExitCode {
    match result {
        Ok(report) => {
            println!(
                "{}",
                console::summary(&report.stats, &absolute(&report.destination))
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            grab_error!("{}", err);
            eprintln!("❌ {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &RunError) -> u8 {
    match err {
        RunError::StartPhraseNotFound { .. } => EXIT_START_NOT_FOUND,
        RunError::OperatorAbort { .. } => EXIT_ABORTED,
        RunError::FetchMessages(_) | RunError::Filesystem(_) => EXIT_FAILURE,
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
