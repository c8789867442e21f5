//! SwingLab Runner — search orchestration over the core engine.
//!
//! - `grid` / `search`: the candidate space and the parallel trial executor
//! - `metrics`: performance statistics derived from a run
//! - `config`: TOML-serializable search configuration with a content-hash id
//! - `data_loader`: CSV bar ingest feeding the engine's series contract

pub mod config;
pub mod data_loader;
pub mod grid;
pub mod metrics;
pub mod search;

pub use config::{SearchConfig, StepRange};
pub use data_loader::{load_bars, load_series, LoadError};
pub use grid::ParamGrid;
pub use metrics::PerformanceMetrics;
pub use search::{
    search, search_with_abort, ScoredRun, SearchError, SearchOutcome, SearchSettings,
};
