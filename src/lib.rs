//! Usage-gated client for the Gridiron query analysis service.
//!
//! Two pieces, composed by the caller:
//!
//! - [`UsageGate`] tracks how many analyses an anonymous visitor has run,
//!   decides when to show the signup prompt, and grants the one-time guest
//!   bonus. It persists through any [`GateStorage`].
//! - [`AnalysisClient`] submits a question to the backend and normalizes the
//!   reply into an [`AnalysisResult`].
//!
//! The caller checks [`UsageGate::can_query`], calls
//! [`AnalysisClient::analyze`], and on success calls
//! [`UsageGate::record_query`]; [`workflow::ask`] does exactly that.
pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod gate;
pub mod identity;
pub mod output;
pub mod storage;
pub mod workflow;

pub use analysis::{AnalysisResult, AnalyzeResponse, ChartConfig, ChartType, DataPoint};
pub use client::{AnalysisClient, ClientError};
pub use config::ClientConfig;
pub use gate::{GateState, Remaining, UsageGate, BASE_LIMIT, BONUS_AMOUNT, STORAGE_KEY};
pub use identity::{Identity, Provider};
pub use storage::{FileStorage, GateStorage, MemoryStorage, StorageError};
