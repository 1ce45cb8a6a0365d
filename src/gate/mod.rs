//! Soft usage gate for anonymous visitors.
//!
//! Anonymous users get `BASE_LIMIT` analyses before the signup prompt shows,
//! plus `BONUS_AMOUNT` more once they choose to continue as a guest. Signed-in
//! users are never gated. The real quota lives server-side; this gate only
//! decides when to interrupt the user.
//!
//! Every state change goes through [`UsageGate::mutate`], which applies the
//! change and then writes the persisted subset of the state back to storage.
//! Storage problems are logged and swallowed: losing the counter is a UX
//! glitch, not an error the caller can act on.
use crate::identity::Identity;
use crate::storage::GateStorage;
use serde::{Serialize, Serializer};
use std::fmt;

mod persisted;

/// Free analyses before the signup prompt.
pub const BASE_LIMIT: u32 = 3;
/// Extra analyses granted by continuing as a guest.
pub const BONUS_AMOUNT: u32 = 1;
/// Storage key of the persisted gate record.
pub const STORAGE_KEY: &str = "gridiron_auth";

/// Snapshot of the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateState {
    pub authenticated: bool,
    pub identity: Option<Identity>,
    pub query_count: u32,
    pub bonus_granted: bool,
    pub modal_visible: bool,
}

impl GateState {
    pub fn effective_limit(&self) -> u32 {
        if self.bonus_granted {
            BASE_LIMIT + BONUS_AMOUNT
        } else {
            BASE_LIMIT
        }
    }

    pub fn can_query(&self) -> bool {
        self.authenticated || self.query_count < self.effective_limit()
    }

    pub fn remaining_queries(&self) -> Remaining {
        if self.authenticated {
            return Remaining::Unbounded;
        }
        Remaining::Limited(self.effective_limit().saturating_sub(self.query_count))
    }
}

/// Queries left before the gate closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Limited(u32),
    Unbounded,
}

impl Remaining {
    pub fn is_exhausted(self) -> bool {
        self == Remaining::Limited(0)
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Limited(count) => write!(f, "{count}"),
            Remaining::Unbounded => f.write_str("unlimited"),
        }
    }
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Remaining::Limited(count) => serializer.serialize_u32(*count),
            Remaining::Unbounded => serializer.serialize_str("unlimited"),
        }
    }
}

/// Gate state bound to the storage it is persisted in.
#[derive(Debug)]
pub struct UsageGate<S: GateStorage> {
    state: GateState,
    storage: S,
}

impl<S: GateStorage> UsageGate<S> {
    /// Seed the gate from `storage`, falling back to defaults for anything
    /// missing or unreadable.
    pub fn load(storage: S) -> Self {
        let state = match storage.read(STORAGE_KEY) {
            Ok(Some(text)) => {
                let decoded = persisted::decode(&text);
                if !decoded.defaulted.is_empty() {
                    tracing::warn!(
                        fields = ?decoded.defaulted,
                        "persisted gate state partially invalid; using defaults for those fields"
                    );
                }
                decoded.state
            }
            Ok(None) => GateState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "cannot read persisted gate state; starting fresh");
                GateState::default()
            }
        };
        tracing::debug!(
            query_count = state.query_count,
            bonus_granted = state.bonus_granted,
            authenticated = state.authenticated,
            "gate state loaded"
        );
        Self { state, storage }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.state.identity.as_ref()
    }

    pub fn query_count(&self) -> u32 {
        self.state.query_count
    }

    pub fn bonus_granted(&self) -> bool {
        self.state.bonus_granted
    }

    pub fn modal_visible(&self) -> bool {
        self.state.modal_visible
    }

    pub fn effective_limit(&self) -> u32 {
        self.state.effective_limit()
    }

    pub fn can_query(&self) -> bool {
        self.state.can_query()
    }

    pub fn remaining_queries(&self) -> Remaining {
        self.state.remaining_queries()
    }

    /// Count one completed analysis. Returns true when the signup gate should
    /// show, i.e. the new count has reached the limit in effect right now.
    pub fn record_query(&mut self) -> bool {
        if self.state.authenticated {
            return false;
        }
        let (count, limit) = self.mutate(|state| {
            state.query_count = state.query_count.saturating_add(1);
            (state.query_count, state.effective_limit())
        });
        let gated = count >= limit;
        if gated {
            tracing::info!(count, limit, "anonymous query limit reached");
        }
        gated
    }

    /// Grant the one-time guest bonus and dismiss the signup prompt.
    pub fn grant_bonus(&mut self) {
        self.mutate(|state| {
            state.bonus_granted = true;
            state.modal_visible = false;
        });
    }

    /// Same as [`UsageGate::grant_bonus`].
    pub fn continue_as_guest(&mut self) {
        self.grant_bonus();
    }

    pub fn show_modal(&mut self) {
        self.state.modal_visible = true;
    }

    pub fn hide_modal(&mut self) {
        self.state.modal_visible = false;
    }

    /// Sign in. The query counter and bonus survive so a later logout picks
    /// up where the anonymous session left off.
    pub fn login(&mut self, identity: Identity) {
        tracing::info!(provider = %identity.provider, "signed in");
        self.mutate(|state| {
            state.authenticated = true;
            state.identity = Some(identity);
            state.modal_visible = false;
        });
    }

    pub fn logout(&mut self) {
        self.mutate(|state| {
            state.authenticated = false;
            state.identity = None;
        });
    }

    /// Return to a first-visit state and forget the persisted record.
    pub fn reset(&mut self) {
        self.state = GateState::default();
        if let Err(err) = self.storage.remove(STORAGE_KEY) {
            tracing::warn!(error = %err, "failed to clear persisted gate state");
        }
    }

    /// Apply `change` to the state, then persist. The change runs against one
    /// exclusive borrow, so nothing can interleave with it.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut GateState) -> T) -> T {
        let outcome = change(&mut self.state);
        self.persist();
        outcome
    }

    fn persist(&mut self) {
        let text = match persisted::encode(&self.state) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize gate state");
                return;
            }
        };
        if let Err(err) = self.storage.write(STORAGE_KEY, &text) {
            tracing::warn!(error = %err, "failed to persist gate state");
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
