use super::charts::DashboardCharts;
use crate::data::{Dataset, FilterSelection, SelectionOptions};
use crate::insights::{
    apply_jitter, filter_health, filter_transport, jitter_rng, summarize, FilteredHealthSeries,
    FilteredTransportSeries, SummaryInsight,
};
use serde::Serialize;
use tracing::debug;

pub const DASHBOARD_TITLE: &str = "City Health & Pollution Insights Dashboard";

/// Everything the single dashboard page shows for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub selection: FilterSelection,
    pub options: SelectionOptions,
    /// Health rows after presentation jitter, as charted.
    pub health: FilteredHealthSeries,
    pub transport: FilteredTransportSeries,
    pub charts: DashboardCharts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
    pub summary: SummaryInsight,
}

/// Runs one full pass over the cached dataset: filter, jitter, summarize and
/// chart. The dataset itself is only read.
pub fn render_dashboard(
    dataset: &Dataset,
    selection: &FilterSelection,
    jitter_seed: u64,
) -> DashboardPage {
    let filtered = filter_health(&dataset.health, selection);
    let health = apply_jitter(&filtered, &mut jitter_rng(jitter_seed));
    let transport = filter_transport(&dataset.transport, selection.year, &selection.city);

    let mut notices = Vec::new();
    if health.is_empty() {
        notices.push(format!(
            "No health records found for {} in {} ({}).",
            selection.city, selection.year, selection.diagnosis_group
        ));
    }
    if transport.is_empty() {
        notices.push(format!(
            "No transport data found for {} in {}.",
            selection.city, selection.year
        ));
    }

    let summary = summarize(&health, &transport);
    let charts = DashboardCharts::build(&health, &transport);
    debug!(
        %selection,
        health_rows = health.len(),
        transport_rows = transport.len(),
        "dashboard rendered"
    );

    DashboardPage {
        title: DASHBOARD_TITLE,
        selection: selection.clone(),
        options: dataset.selection_options(),
        health,
        transport,
        charts,
        notices,
        summary,
    }
}
