//! Command implementations.
//!
//! Each command loads the gate from the state directory, performs its
//! operation, and lets the gate persist whatever changed. [`ask`] is the one
//! place where the gate and the analysis client meet.
use crate::analysis::AnalysisResult;
use crate::cli::{AskArgs, GlobalArgs, HealthArgs, LoginArgs, StatusArgs};
use crate::client::{AnalysisClient, ClientError};
use crate::config::{resolve_api_url, resolve_state_dir, ClientConfig};
use crate::gate::UsageGate;
use crate::identity::Identity;
use crate::output::{render_result, render_signup_prompt, render_status, StatusReport};
use crate::storage::{FileStorage, GateStorage};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;

/// Upper bound on query length accepted from the command line.
pub const MAX_QUERY_CHARS: usize = 500;

/// What happened to one question.
#[derive(Debug)]
pub enum AskOutcome {
    /// The backend answered. `gate_triggered` is true when this answer used
    /// up the free allowance and the signup prompt is now showing.
    Answered {
        result: AnalysisResult,
        gate_triggered: bool,
    },
    /// The allowance was already used up; the backend was not contacted.
    Gated,
    /// The request did not complete. The query was not counted.
    Failed(ClientError),
}

/// Check the gate, run the analysis, and count it on success.
pub fn ask<S: GateStorage>(
    gate: &mut UsageGate<S>,
    client: &AnalysisClient,
    query: &str,
) -> Result<AskOutcome> {
    let query = validate_query(query)?;
    if !gate.can_query() {
        gate.show_modal();
        return Ok(AskOutcome::Gated);
    }
    match client.analyze(query) {
        Ok(result) => {
            let gate_triggered = gate.record_query();
            if gate_triggered {
                gate.show_modal();
            }
            Ok(AskOutcome::Answered {
                result,
                gate_triggered,
            })
        }
        Err(err) => Ok(AskOutcome::Failed(err)),
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("query must not be empty"));
    }
    let length = trimmed.chars().count();
    if length > MAX_QUERY_CHARS {
        return Err(anyhow!(
            "query is {length} characters; the limit is {MAX_QUERY_CHARS}"
        ));
    }
    Ok(trimmed)
}

fn open_gate(global: &GlobalArgs) -> Result<UsageGate<FileStorage>> {
    let state_dir =
        resolve_state_dir(global.state_dir.clone()).context("resolve state directory")?;
    tracing::debug!(state_dir = %state_dir.display(), "opening usage gate");
    Ok(UsageGate::load(FileStorage::new(state_dir)))
}

fn open_client(global: &GlobalArgs) -> AnalysisClient {
    let mut config = ClientConfig::new(resolve_api_url(global.api_url.as_deref()));
    if let Some(secs) = global.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    AnalysisClient::new(&config)
}

pub fn run_ask(global: &GlobalArgs, args: &AskArgs) -> Result<()> {
    let mut gate = open_gate(global)?;
    let client = open_client(global);

    match ask(&mut gate, &client, &args.query)? {
        AskOutcome::Answered {
            result,
            gate_triggered,
        } => {
            if args.json {
                let text =
                    serde_json::to_string_pretty(&result).context("serialize analysis result")?;
                println!("{text}");
            } else {
                print!("{}", render_result(&result));
            }
            if gate_triggered {
                eprintln!();
                eprint!("{}", render_signup_prompt(gate.state()));
            }
            Ok(())
        }
        AskOutcome::Gated => {
            eprint!("{}", render_signup_prompt(gate.state()));
            Err(anyhow!("free query limit reached"))
        }
        AskOutcome::Failed(err) => {
            eprintln!("Something went wrong reaching the analysis service. Please try again.");
            Err(anyhow::Error::new(err).context(format!("analyze via {}", client.base_url())))
        }
    }
}

pub fn run_status(global: &GlobalArgs, args: &StatusArgs) -> Result<()> {
    let gate = open_gate(global)?;
    if args.json {
        let report = StatusReport::from_state(gate.state());
        let text = serde_json::to_string_pretty(&report).context("serialize status")?;
        println!("{text}");
    } else {
        print!("{}", render_status(gate.state()));
    }
    Ok(())
}

pub fn run_continue_as_guest(global: &GlobalArgs) -> Result<()> {
    let mut gate = open_gate(global)?;
    if gate.is_authenticated() {
        println!("Already signed in; no limit applies.");
        return Ok(());
    }
    gate.continue_as_guest();
    println!(
        "Continuing as guest. Remaining: {}",
        gate.remaining_queries()
    );
    Ok(())
}

pub fn run_login(global: &GlobalArgs, args: &LoginArgs) -> Result<()> {
    let mut gate = open_gate(global)?;
    let mut identity = Identity::new(
        args.id.clone(),
        args.email.clone(),
        args.name.clone(),
        args.provider,
    );
    if let Some(avatar_url) = &args.avatar_url {
        identity = identity.with_avatar_url(avatar_url.clone());
    }
    gate.login(identity);
    println!("Signed in as {} <{}>", args.name, args.email);
    Ok(())
}

pub fn run_logout(global: &GlobalArgs) -> Result<()> {
    let mut gate = open_gate(global)?;
    gate.logout();
    println!("Signed out. Remaining: {}", gate.remaining_queries());
    Ok(())
}

pub fn run_reset(global: &GlobalArgs) -> Result<()> {
    let mut gate = open_gate(global)?;
    gate.reset();
    println!("Usage state cleared.");
    Ok(())
}

pub fn run_health(global: &GlobalArgs, args: &HealthArgs) -> Result<()> {
    let client = open_client(global);
    if args.json {
        let report = client
            .health_report()
            .with_context(|| format!("fetch health from {}", client.base_url()))?;
        let text = serde_json::to_string_pretty(&report).context("serialize health report")?;
        println!("{text}");
        return Ok(());
    }
    if client.check_health() {
        println!("healthy: {}", client.base_url());
        Ok(())
    } else {
        Err(anyhow!("unhealthy: {}", client.base_url()))
    }
}
