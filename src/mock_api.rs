//! Stand-in for the analytics backend: turns a free-text prompt into a query
//! and a query into chart data. Both calls sleep first to mimic network
//! latency; dropping the future is the only way to abandon a call.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mock_data::strings;

pub const QUERY_DELAY: Duration = Duration::from_millis(1000);
pub const CHART_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_CHART_TYPE: &str = "bar";

const SACK_QUERY: &str = "SELECT date, COUNT(*) as total_sacks FROM sack_events WHERE date BETWEEN DATE_SUB(NOW(), INTERVAL 30 DAY) AND NOW() GROUP BY date ORDER BY date";
const VEHICLE_QUERY: &str = "SELECT date, COUNT(DISTINCT vehicle_id) as vehicle_count FROM vehicle_logs WHERE date BETWEEN DATE_SUB(NOW(), INTERVAL 7 DAY) AND NOW() GROUP BY date";
const DAILY_QUERY: &str = "SELECT DATE(timestamp) as day, COUNT(*) as count FROM events WHERE timestamp >= DATE_SUB(NOW(), INTERVAL 30 DAY) GROUP BY DATE(timestamp)";
const LOADING_QUERY: &str = "SELECT dock_area, SUM(sack_count) as total_sacks FROM loading_events WHERE date >= DATE_SUB(NOW(), INTERVAL 7 DAY) GROUP BY dock_area";
const VIOLATION_QUERY: &str = "SELECT violation_type, COUNT(*) as count FROM violations WHERE date >= DATE_SUB(NOW(), INTERVAL 30 DAY) GROUP BY violation_type";

/// Keyword to query template, searched in this order.
const QUERY_TEMPLATES: [(&str, &str); 5] = [
    ("sack", SACK_QUERY),
    ("vehicle", VEHICLE_QUERY),
    ("daily", DAILY_QUERY),
    ("loading", LOADING_QUERY),
    ("violation", VIOLATION_QUERY),
];

/// Bar color: one for the whole dataset or one per bar.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum BackgroundColor {
    Single(String),
    PerBar(Vec<String>),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u32>,
    pub background_color: BackgroundColor,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_type: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[async_trait]
pub trait RemoteService: Send + Sync + 'static {
    /// Builds a query string from a free-text prompt.
    async fn generate_query(&self, prompt: &str) -> Result<String>;

    /// Fetches the chart series a query would produce.
    async fn generate_chart_data(
        &self, query: &str, chart_type: &str,
    ) -> Result<ChartData>;
}

/// Canned responses behind a fixed artificial delay.
#[derive(Debug, Clone)]
pub struct MockApi {
    query_delay: Duration,
    chart_delay: Duration,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::with_delays(QUERY_DELAY, CHART_DELAY)
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delays(query_delay: Duration, chart_delay: Duration) -> Self {
        Self { query_delay, chart_delay }
    }
}

/// First template whose keyword occurs in the prompt, ignoring case.
pub fn select_query(prompt: &str) -> &'static str {
    let prompt = prompt.to_lowercase();
    QUERY_TEMPLATES
        .iter()
        .find(|(keyword, _)| prompt.contains(keyword))
        .map(|(_, query)| *query)
        .unwrap_or(DAILY_QUERY)
}

fn series(
    label: &str, data: &[u32], background_color: BackgroundColor,
) -> Dataset {
    Dataset {
        label: label.to_string(),
        data: data.to_vec(),
        background_color,
    }
}

fn single(color: &str) -> BackgroundColor {
    BackgroundColor::Single(color.to_string())
}

/// Chart series for a query, picked by what the query mentions.
pub fn select_chart(query: &str, chart_type: &str) -> ChartData {
    let (labels, dataset) = if query.contains("sack") {
        (
            strings(&["Week 1", "Week 2", "Week 3", "Week 4"]),
            series("Sack Count", &[245, 312, 189, 298], single("#3b82f6")),
        )
    } else if query.contains("vehicle") {
        (
            strings(&["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]),
            series(
                "Vehicle Count",
                &[15, 23, 18, 27, 31, 12, 8],
                single("#10b981"),
            ),
        )
    } else if query.contains("dock_area") {
        (
            strings(&["Dock A", "Dock B", "Dock C"]),
            series(
                "Loading Count",
                &[120, 95, 87],
                BackgroundColor::PerBar(strings(&[
                    "#3b82f6", "#8b5cf6", "#f59e0b",
                ])),
            ),
        )
    } else {
        (
            strings(&["Jan", "Feb", "Mar", "Apr", "May", "Jun"]),
            series("Daily Events", &[12, 19, 15, 25, 22, 18], single("#6366f1")),
        )
    };

    ChartData {
        chart_type: chart_type.to_string(),
        labels,
        datasets: vec![dataset],
    }
}

#[async_trait]
impl RemoteService for MockApi {
    async fn generate_query(&self, prompt: &str) -> Result<String> {
        debug!("Generating query for prompt: {:?}", prompt);
        tokio::time::sleep(self.query_delay).await;

        let query = select_query(prompt);
        info!("Query generated: {}", query);
        Ok(query.to_string())
    }

    async fn generate_chart_data(
        &self, query: &str, chart_type: &str,
    ) -> Result<ChartData> {
        debug!("Generating {} chart data for query: {}", chart_type, query);
        tokio::time::sleep(self.chart_delay).await;

        Ok(select_chart(query, chart_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_select_query_vehicle_any_case() {
        assert_eq!(select_query("How many VEHICLES came in?"), VEHICLE_QUERY);
        assert_eq!(select_query("Vehicle arrivals"), VEHICLE_QUERY);
    }

    #[test]
    fn test_select_query_default_is_daily() {
        assert_eq!(select_query("show me something"), DAILY_QUERY);
        assert_eq!(select_query(""), DAILY_QUERY);
    }

    #[test]
    fn test_select_query_first_keyword_wins() {
        // "sack" precedes "loading" in the search order
        assert_eq!(select_query("loading of sacks"), SACK_QUERY);
        assert_eq!(select_query("violation on loading bay"), LOADING_QUERY);
        assert_eq!(select_query("violation count"), VIOLATION_QUERY);
    }

    #[test]
    fn test_select_chart_shapes() {
        let sacks = select_chart(SACK_QUERY, "bar");
        assert_eq!(sacks.labels.len(), 4);
        assert_eq!(sacks.datasets[0].label, "Sack Count");

        let vehicles = select_chart(VEHICLE_QUERY, "line");
        assert_eq!(vehicles.chart_type, "line");
        assert_eq!(vehicles.datasets[0].data, vec![15, 23, 18, 27, 31, 12, 8]);

        let violations = select_chart(VIOLATION_QUERY, "bar");
        assert_eq!(violations.datasets[0].label, "Daily Events");
        assert_eq!(violations.labels.len(), 6);
    }

    #[test]
    fn test_select_chart_dock_area_has_per_bar_colors() {
        // a bare dock_area query without the sack column
        let chart = select_chart("SELECT dock_area FROM loading_events", "bar");
        assert_eq!(chart.datasets[0].label, "Loading Count");

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(
            json["datasets"][0]["backgroundColor"],
            serde_json::json!(["#3b82f6", "#8b5cf6", "#f59e0b"])
        );
    }

    #[test]
    fn test_loading_query_charts_as_sacks() {
        // the loading template sums sack_count, so the sack shape matches first
        let chart = select_chart(LOADING_QUERY, "bar");
        assert_eq!(chart.datasets[0].label, "Sack Count");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_query_waits_for_latency() {
        let api = MockApi::new();
        let start = Instant::now();

        let query = api.generate_query("daily sack totals").await.unwrap();

        assert_eq!(query, SACK_QUERY);
        assert!(start.elapsed() >= QUERY_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_chart_data_waits_for_latency() {
        let api = MockApi::new();
        let start = Instant::now();

        let chart = api
            .generate_chart_data(VEHICLE_QUERY, DEFAULT_CHART_TYPE)
            .await
            .unwrap();

        assert_eq!(chart.datasets[0].label, "Vehicle Count");
        assert!(start.elapsed() >= CHART_DELAY);
        assert!(start.elapsed() < QUERY_DELAY);
    }
}
