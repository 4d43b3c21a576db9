mod charts;
mod page;

pub use charts::DashboardCharts;
pub use page::{render_dashboard, DashboardPage, DASHBOARD_TITLE};
