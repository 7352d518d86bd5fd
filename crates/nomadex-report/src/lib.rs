//! nomadex-report - join, statistics, and export artifacts
//!
//! Consumes the records and author-name map produced by `nomadex-api` and
//! turns them into flat files for downstream plotting: a CSV of joined
//! samples plus JSON summary, time-series, author, and network artifacts.

pub mod export;
pub mod join;
pub mod stats;

// Re-exports
pub use export::{write_csv, write_json};
pub use join::{JoinedSample, join};
pub use stats::{
    AuthorStat, GraphEdge, GraphNode, NetworkGraph, SummaryStats, author_statistics,
    network_graph, time_series,
};
