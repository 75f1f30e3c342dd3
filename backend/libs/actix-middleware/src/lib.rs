//! # Actix Middleware Library
//!
//! Middleware components shared by the betting backend's Actix services
//!
//! ## Modules
//! - `jwt_auth`: Bearer token authentication and the `UserId` extractor
//! - `correlation_id`: `X-Correlation-ID` propagation
//! - `metrics`: Prometheus HTTP metrics

pub mod correlation_id;
pub mod jwt_auth;
pub mod metrics;

pub use correlation_id::{CorrelationId, CorrelationIdMiddleware};
pub use jwt_auth::{AuthRejection, JwtAuthMiddleware, UserId};
pub use metrics::MetricsMiddleware;
