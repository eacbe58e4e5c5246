pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod ingest;
pub mod mcp_server;
pub mod patterns;
pub mod session;
pub mod store;
pub mod text;

pub use config::Config;
pub use error::{ExtractError, Result, Severity};
pub use export::{CsvCommaMode, ExportArtifact, ExportFormat};
pub use extractor::{extract, extract_all, BatchExtraction, MatchSet};
pub use patterns::{ExtractionType, MatchRule, PatternMatcher, PatternRegistry};
pub use session::Session;
pub use store::{AggregateStore, StoreKey, StoreValue};

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber shared by the binaries. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses a comma-separated list of type names.
pub fn parse_types(list: &str) -> Result<Vec<ExtractionType>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<ExtractionType>())
        .collect()
}
