pub mod aggregator;
pub mod metrics;
pub mod snapshots;

pub use aggregator::*;
pub use metrics::*;
pub use snapshots::*;
