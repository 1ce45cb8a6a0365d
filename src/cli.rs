//! CLI argument parsing.
//!
//! The CLI is the application root: it owns the gate and the client and
//! decides, per command, how the two are combined.
use crate::identity::Provider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gridiron",
    version,
    about = "Ask the Gridiron analysis service questions, with a free-tier usage gate",
    after_help = "Commands:\n  ask <QUERY>                 Analyze a question (counts toward the free limit)\n  status                      Show sign-in state and remaining free queries\n  continue-as-guest           Decline signup and unlock one bonus query\n  login --id --email --name   Record a signed-in identity\n  logout                      Forget the signed-in identity\n  reset                       Clear all local usage state\n  health                      Probe the analysis backend\n\nExamples:\n  gridiron ask \"Who led the league in EPA per dropback in 2023?\"\n  gridiron status --json\n  gridiron --api-url http://localhost:8000 health",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Analysis backend base URL (default: $GRIDIRON_API_URL or http://localhost:8000)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory holding the local usage record (default: $GRIDIRON_STATE_DIR or the user data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Abort backend requests after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Log request and gate decisions to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Ask(AskArgs),
    Status(StatusArgs),
    /// Decline signup and unlock the one-time bonus query
    ContinueAsGuest,
    Login(LoginArgs),
    /// Sign out; usage counters are kept
    Logout,
    /// Clear all local usage state
    Reset,
    Health(HealthArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Analyze a natural-language question")]
pub struct AskArgs {
    /// The question to analyze
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Emit the normalized result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show sign-in state and remaining free queries")]
pub struct StatusArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Record an identity obtained from a completed sign-in")]
pub struct LoginArgs {
    /// Opaque user identifier issued by the backend
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub email: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long, value_name = "URL")]
    pub avatar_url: Option<String>,

    /// Sign-in provider: email, google, or twitter
    #[arg(long, default_value = "email")]
    pub provider: Provider,
}

#[derive(Parser, Debug)]
#[command(about = "Probe the analysis backend")]
pub struct HealthArgs {
    /// Print the backend's health report as JSON instead of a yes/no answer
    #[arg(long)]
    pub json: bool,
}
