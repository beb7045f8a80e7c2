//! Department network and admission merit analysis.
//!
//! The pipeline loads course relationships and merit lists once into a
//! [`loader::DataContext`], then answers every query from that snapshot:
//! edge aggregation, centrality rankings, name reconciliation, prestige
//! scoring and per-department recommendations.

pub mod analyzer;
pub mod centrality;
pub mod error;
pub mod links;
pub mod loader;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod scoring;

pub use analyzer::DepartmentAnalyzer;
pub use error::{LoadError, MeritFileError};
pub use loader::{DataContext, DatasetLoader};
pub use models::Config;
pub use reconcile::AliasMap;
