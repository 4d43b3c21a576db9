use crate::infra::{ConfiguredSource, DashboardQuery, DashboardService};
use clap::Args;
use health_insights::config::AppConfig;
use health_insights::dashboard::DashboardPage;
use health_insights::data::SelectionOptions;
use health_insights::error::AppError;
use health_insights::telemetry::{self, LogOutput};

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    /// Year to summarize (defaults to the earliest available)
    #[arg(long)]
    year: Option<i32>,
    /// City to summarize (defaults to the first alphabetically)
    #[arg(long)]
    city: Option<String>,
    /// Diagnosis group to summarize (defaults to the first alphabetically)
    #[arg(long)]
    diagnosis_group: Option<String>,
}

async fn cli_service() -> Result<DashboardService<ConfiguredSource>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogOutput::Stderr)?;

    let source = ConfiguredSource::from_config(&config).await?;
    Ok(DashboardService::new(source, config.data.jitter_seed))
}

pub(crate) async fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let service = cli_service().await?;
    let query = DashboardQuery {
        year: args.year,
        city: args.city,
        diagnosis_group: args.diagnosis_group,
    };

    let page = service.page(&query).await?;
    print!("{}", render_summary(&page));
    Ok(())
}

pub(crate) async fn run_options() -> Result<(), AppError> {
    let service = cli_service().await?;
    let options = service.options().await?;
    print!("{}", render_options(&options));
    Ok(())
}

fn render_summary(page: &DashboardPage) -> String {
    let mut out = String::new();
    out.push_str(page.title);
    out.push('\n');
    out.push_str(&format!("Selection: {}\n", page.selection));
    out.push_str(&format!(
        "Rows: {} health, {} transport\n",
        page.health.len(),
        page.transport.len()
    ));

    for notice in &page.notices {
        out.push_str(&format!("Notice: {notice}\n"));
    }

    out.push_str("\nSummary insight\n");
    out.push_str(&page.summary.text.replace("**", ""));
    out.push('\n');
    out
}

fn render_options(options: &SelectionOptions) -> String {
    let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
    format!(
        "Years: {}\nCities: {}\nDiagnosis groups: {}\n",
        years.join(", "),
        options.cities.join(", "),
        options.diagnosis_groups.join(", ")
    )
}
