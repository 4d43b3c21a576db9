mod filter;
mod jitter;
mod summary;

pub use filter::{
    filter_health, filter_transport, DatedHealthRecord, FilteredHealthSeries,
    FilteredTransportSeries,
};
pub use jitter::{apply_jitter, jitter_rng, DEFAULT_JITTER_SEED};
pub use summary::{summarize, HealthFacts, SummaryInsight, TransportFacts, Trend, NO_TRANSPORT_DATA};
