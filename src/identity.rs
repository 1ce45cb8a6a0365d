//! Signed-in identity records.
//!
//! Only the outcome of an authentication flow is modelled here; the flows
//! themselves happen elsewhere and hand over a finished `Identity`.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// First-party email signup.
    Email,
    Google,
    Twitter,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Email => "email",
            Provider::Google => "google",
            Provider::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Provider::Email),
            "google" => Ok(Provider::Google),
            "twitter" | "x" => Ok(Provider::Twitter),
            other => Err(format!(
                "unknown provider {other:?} (expected email, google, or twitter)"
            )),
        }
    }
}

/// A signed-in user as stored alongside the gate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub provider: Provider,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            avatar_url: None,
            provider,
        }
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}
