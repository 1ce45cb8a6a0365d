//! Analysis request/response contract.
//!
//! The backend has shipped two response shapes: an older one with a single
//! `chart`, and a newer one with `charts` plus `insights`. [`AnalyzeResponse`]
//! accepts either (or both) and [`AnalysisResult`] is the normalized form
//! callers work with.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
}

/// Chart kind requested by the backend.
///
/// Unknown tags are kept as [`ChartType::Other`] so a newer backend never
/// breaks decoding; deciding what to do with them is up to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
    /// Point comparison.
    Dot,
    /// Ranked slope between two measurements.
    Slope,
    /// Inline trend line.
    Sparkline,
    /// Categorical bars.
    Bar,
    Other(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Dot => "dot",
            ChartType::Slope => "slope",
            ChartType::Sparkline => "sparkline",
            ChartType::Bar => "bar",
            ChartType::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ChartType::Other(_))
    }
}

impl From<String> for ChartType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "dot" => ChartType::Dot,
            "slope" => ChartType::Slope,
            "sparkline" => ChartType::Sparkline,
            "bar" => ChartType::Bar,
            _ => ChartType::Other(tag),
        }
    }
}

impl From<ChartType> for String {
    fn from(chart_type: ChartType) -> Self {
        match chart_type {
            ChartType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    // Older backends omitted titles.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
    #[serde(
        rename = "xLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub x_label: Option<String>,
    #[serde(
        rename = "yLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub y_label: Option<String>,
}

/// Response body of `POST /analyze` as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub headline: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<ChartConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized analysis outcome.
///
/// A populated `error` is still a successful response: the backend answered,
/// it just could not analyze the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub headline: String,
    pub summary: String,
    pub charts: Vec<ChartConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(response: AnalyzeResponse) -> Self {
        // `charts` supersedes the legacy single chart when both are sent.
        let charts = match (response.charts, response.chart) {
            (Some(charts), _) => charts,
            (None, Some(chart)) => vec![chart],
            (None, None) => Vec::new(),
        };
        Self {
            headline: response.headline,
            summary: response.summary,
            charts,
            insights: response.insights,
            raw_data: response.raw_data,
            error: response.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> AnalysisResult {
        serde_json::from_str::<AnalyzeResponse>(body)
            .expect("decode response")
            .into()
    }

    #[test]
    fn legacy_single_chart_becomes_a_one_element_sequence() {
        let result = decode(
            r#"{
                "headline": "Mahomes leads",
                "summary": "EPA per play",
                "chart": {"type": "dot", "data": [{"name": "KC", "value": 0.31}], "xLabel": "EPA"}
            }"#,
        );
        assert_eq!(result.charts.len(), 1);
        let chart = &result.charts[0];
        assert_eq!(chart.chart_type, ChartType::Dot);
        assert_eq!(chart.title, "");
        assert_eq!(chart.x_label.as_deref(), Some("EPA"));
        assert_eq!(chart.data[0].category, None);
    }

    #[test]
    fn charts_sequence_supersedes_legacy_chart() {
        let result = decode(
            r#"{
                "headline": "h",
                "summary": "s",
                "chart": {"type": "bar", "title": "old", "data": []},
                "charts": [
                    {"type": "slope", "title": "first", "data": []},
                    {"type": "sparkline", "title": "second", "data": []}
                ],
                "insights": ["one", "two"]
            }"#,
        );
        let titles: Vec<&str> = result.charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(result.insights, Some(vec!["one".into(), "two".into()]));
    }

    #[test]
    fn response_without_charts_yields_empty_sequence() {
        let result = decode(r#"{"headline": "h", "summary": "s"}"#);
        assert!(result.charts.is_empty());
        assert!(result.insights.is_none());
        assert!(!result.is_error());
    }

    #[test]
    fn embedded_error_is_a_valid_result() {
        let result = decode(
            r#"{"headline": "Analysis Error", "summary": "boom", "error": "R service down"}"#,
        );
        assert!(result.is_error());
        assert_eq!(result.error.as_deref(), Some("R service down"));
    }

    #[test]
    fn unknown_chart_tags_are_preserved() {
        let result = decode(
            r#"{"headline": "h", "summary": "s",
                "charts": [{"type": "heatmap", "title": "t",
                            "data": [{"name": "a", "value": 1, "category": "x"}]}]}"#,
        );
        let chart = &result.charts[0];
        assert_eq!(chart.chart_type, ChartType::Other("heatmap".to_string()));
        assert!(!chart.chart_type.is_known());
        assert_eq!(chart.data[0].value, 1.0);

        let encoded = serde_json::to_value(chart).expect("encode chart");
        assert_eq!(encoded["type"], "heatmap");
    }

    #[test]
    fn raw_data_is_carried_through_untouched() {
        let result = decode(
            r#"{"headline": "h", "summary": "s", "raw_data": {"rows": [[1, 2]], "source": "pbp"}}"#,
        );
        let raw = result.raw_data.expect("raw data");
        assert_eq!(raw["source"], "pbp");
        assert_eq!(raw["rows"][0][1], 2);
    }
}
