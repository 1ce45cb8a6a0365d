use anyhow::Result;
use clap::Parser;
use gridiron::cli::{Command, RootArgs};
use gridiron::config::LOG_ENV;
use gridiron::workflow;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);

    let global = &args.global;
    match &args.command {
        Command::Ask(ask) => workflow::run_ask(global, ask),
        Command::Status(status) => workflow::run_status(global, status),
        Command::ContinueAsGuest => workflow::run_continue_as_guest(global),
        Command::Login(login) => workflow::run_login(global, login),
        Command::Logout => workflow::run_logout(global),
        Command::Reset => workflow::run_reset(global),
        Command::Health(health) => workflow::run_health(global, health),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "gridiron=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
