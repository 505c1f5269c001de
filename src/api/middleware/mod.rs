//! API middleware components

pub mod bearer;
pub mod logging;
pub mod metrics;
pub mod security;

pub use bearer::BearerToken;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
