pub mod auth;
pub mod json;
pub mod metrics;

pub use auth::*;
pub use json::*;
pub use metrics::*;
