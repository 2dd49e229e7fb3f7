//! # DAS HTTP Server Module
//!
//! The RPC facade: translates HTTP/JSON calls into registry, catalog and
//! executor operations and maps their errors onto statuses.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Counter snapshot
//! - `/v1/registration/*` - Register and unregister instances
//! - `/v1/tables/*` - Table metadata, explain, execute and mutations

pub mod config;
pub mod errors;
pub mod messages;
pub mod observability_routes;
pub mod registration_routes;
pub mod server;
pub mod table_routes;

pub use config::ServerConfig;
pub use errors::{ApiError, ApiJson, ApiResult, ErrorResponse};
pub use server::{build_router, AppState, DasServer};
pub use table_routes::NDJSON;
