use anyhow::{Context, Result};
use clap::Parser;
use lookout_accounts::{Session, SessionProvider, compute_remaining};
use lookout_common::observability::init_logging;
use lookout_config::LookoutConfig;
use lookout_render::{TextLayout, View, render};
use lookout_workflow::{
    CreditStatus, SearchContext, SearchOrchestrator, SearchPhase, SearchReport, WorkflowError,
};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use cli::{Cli, Command, SearchArgs};

mod cli;
mod wiring;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config first (env wins), then logging from its `logging` section.
    let cfg = wiring::load_config(cli.config.as_deref())?;
    let log_path = init_logging(wiring::log_config(&cfg.logging))?;
    tracing::debug!(log_path = ?log_path, "lookout.start");

    match cli.command {
        Command::Search(args) => cmd_search(&cfg, args).await,
        Command::Remaining { user } => cmd_remaining(&cfg, user).await,
        Command::Render { file, json } => cmd_render(&cfg, file.as_deref(), json),
    }
}

async fn cmd_search(cfg: &LookoutConfig, args: SearchArgs) -> Result<ExitCode> {
    let session = wiring::session_provider(&cfg.session, args.user)
        .authenticate()
        .await;
    let report = search_report(cfg, session.as_ref(), &args.query).await?;

    if args.json {
        print_json(&SearchOutput::from_report(&report))?;
    } else {
        print_report(&wiring::text_layout(&cfg.render), &report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Signed-out searches are refused before any collaborator is built, so a
/// missing search or accounts setup cannot mask the sign-in message.
async fn search_report(
    cfg: &LookoutConfig,
    session: Option<&Session>,
    query: &str,
) -> Result<SearchReport> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchReport::idle(query));
    }
    let Some(session) = session else {
        tracing::info!("search.blocked.unauthenticated");
        return Ok(SearchReport::unauthenticated(query));
    };

    let backend = wiring::build_backend(&cfg.search)?;
    let accounts = wiring::build_accounts(&cfg.accounts)?;
    let profile = accounts
        .profiles
        .load_profile(&session.user_id)
        .await
        .with_context(|| format!("loading profile for {}", session.user_id))?;

    let orchestrator =
        SearchOrchestrator::new(backend, accounts.ledger).with_credit_cost(cfg.credit_cost);
    Ok(orchestrator
        .run(&SearchContext::new(Some(session), profile.as_ref()), query)
        .await)
}

async fn cmd_remaining(cfg: &LookoutConfig, user: Option<String>) -> Result<ExitCode> {
    let Some(session) = wiring::session_provider(&cfg.session, user)
        .authenticate()
        .await
    else {
        eprintln!("{}", WorkflowError::Unauthenticated);
        return Ok(ExitCode::FAILURE);
    };
    let accounts = wiring::build_accounts(&cfg.accounts)?;
    let profile = accounts
        .profiles
        .load_profile(&session.user_id)
        .await
        .with_context(|| format!("loading profile for {}", session.user_id))?;

    let remaining = compute_remaining(profile.as_ref());
    if remaining.is_finite() {
        println!("{remaining}");
    } else {
        println!("unknown");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_render(cfg: &LookoutConfig, file: Option<&Path>, json: bool) -> Result<ExitCode> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    // Input that is not JSON is shown as raw text.
    let value = serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw));
    let view = render(&value);

    if json {
        print_json(&view)?;
    } else {
        print!("{}", wiring::text_layout(&cfg.render).write(&view));
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    phase: SearchPhase,
    credit: CreditStatus,
    error: Option<String>,
    view: Option<View>,
}

impl<'a> SearchOutput<'a> {
    fn from_report(report: &'a SearchReport) -> Self {
        Self {
            query: &report.query,
            phase: report.phase,
            credit: report.credit,
            error: report.error.as_ref().map(ToString::to_string),
            view: report.result.as_ref().map(render),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("encoding JSON output")?;
    println!("{text}");
    Ok(())
}

/// The fetched result is printed even when the run failed afterwards.
fn print_report(layout: &TextLayout, report: &SearchReport) {
    match &report.result {
        Some(result) => print!("{}", layout.write(&render(result))),
        None if report.error.is_none() => print!("{}", layout.placeholder()),
        None => {}
    }
    if let Some(err) = &report.error {
        eprintln!("{err}");
    }
}
