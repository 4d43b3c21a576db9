//! Loading of the health/pollution and transport tables.
//!
//! ```text
//!  PostgreSQL / SQLite        CSV snapshot dir
//!          │                        │
//!          ▼                        ▼
//!   SqlDataSource          CsvSnapshotSource      (DataSource)
//!          └──────────┬─────────────┘
//!                     ▼
//!               DatasetCache  ── Arc<Dataset> shared by every render
//! ```

mod cache;
pub mod model;
mod snapshot;
mod source;
mod sql;

pub use cache::DatasetCache;
pub use model::{
    Dataset, FilterSelection, HealthRecord, SelectionError, SelectionOptions, TransportRecord,
};
pub use snapshot::CsvSnapshotSource;
pub use source::{DataSource, DataSourceError, InMemoryDataSource, HEALTH_TABLE, TRANSPORT_TABLE};
pub use sql::SqlDataSource;
