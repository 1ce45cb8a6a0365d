//! Plain-text rendering for terminal output.
//!
//! Charts are listed as labelled values; drawing them is the job of a real
//! front end.
use crate::analysis::{AnalysisResult, ChartConfig};
use crate::gate::{GateState, Remaining, BONUS_AMOUNT};
use crate::identity::Identity;
use serde::Serialize;
use std::fmt::Write;

/// `status --json` payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport<'a> {
    pub authenticated: bool,
    pub identity: Option<&'a Identity>,
    pub query_count: u32,
    pub bonus_granted: bool,
    pub effective_limit: u32,
    pub remaining: Remaining,
}

impl<'a> StatusReport<'a> {
    pub fn from_state(state: &'a GateState) -> Self {
        Self {
            authenticated: state.authenticated,
            identity: state.identity.as_ref(),
            query_count: state.query_count,
            bonus_granted: state.bonus_granted,
            effective_limit: state.effective_limit(),
            remaining: state.remaining_queries(),
        }
    }
}

pub fn render_status(state: &GateState) -> String {
    let mut out = String::new();
    match &state.identity {
        Some(identity) => {
            let _ = writeln!(
                out,
                "Signed in as {} <{}> via {}",
                identity.name, identity.email, identity.provider
            );
        }
        None => {
            let _ = writeln!(out, "Not signed in");
        }
    }
    let _ = writeln!(out, "Queries used: {}", state.query_count);
    if !state.authenticated {
        let _ = writeln!(
            out,
            "Free limit: {}{}",
            state.effective_limit(),
            if state.bonus_granted {
                " (guest bonus applied)"
            } else {
                ""
            }
        );
    }
    let _ = writeln!(out, "Remaining: {}", state.remaining_queries());
    out
}

/// Text shown when the signup gate is up.
pub fn render_signup_prompt(state: &GateState) -> String {
    let mut out = format!(
        "You've used all {} free analyses.\nSign in for unlimited access: gridiron login --id <ID> --email <EMAIL> --name <NAME>\n",
        state.effective_limit()
    );
    if !state.bonus_granted {
        let _ = writeln!(
            out,
            "Or continue as a guest for {BONUS_AMOUNT} more: gridiron continue-as-guest"
        );
    }
    out
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.headline);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.summary);

    // A backend-reported error replaces the chart content.
    if let Some(error) = &result.error {
        let _ = writeln!(out);
        let _ = writeln!(out, "Error: {error}");
        return out;
    }

    if let Some(insights) = result.insights.as_ref().filter(|i| !i.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Key insights:");
        for insight in insights {
            let _ = writeln!(out, "  - {insight}");
        }
    }
    for chart in &result.charts {
        let _ = writeln!(out);
        render_chart(&mut out, chart);
    }
    out
}

fn render_chart(out: &mut String, chart: &ChartConfig) {
    let title = if chart.title.is_empty() {
        "Untitled chart"
    } else {
        chart.title.as_str()
    };
    let _ = writeln!(out, "[{}] {title}", chart.chart_type.as_str());
    if let (Some(x), Some(y)) = (&chart.x_label, &chart.y_label) {
        let _ = writeln!(out, "  {x} vs {y}");
    } else if let Some(label) = chart.x_label.as_ref().or(chart.y_label.as_ref()) {
        let _ = writeln!(out, "  {label}");
    }
    let width = chart
        .data
        .iter()
        .map(|point| point.name.chars().count())
        .max()
        .unwrap_or(0);
    for point in &chart.data {
        match &point.category {
            Some(category) => {
                let _ = writeln!(
                    out,
                    "  {:<width$}  {}  ({category})",
                    point.name, point.value
                );
            }
            None => {
                let _ = writeln!(out, "  {:<width$}  {}", point.name, point.value);
            }
        }
    }
}
