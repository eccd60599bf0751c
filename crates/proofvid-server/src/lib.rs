//! ProofVid Registry Service
//!
//! HTTP API over the certificate registry:
//!
//! - `POST /api/register` - issue a certificate for a video hash
//! - `GET /api/verify/{hash}` - prove or refute that a hash was registered
//! - `GET /api/certificate/{certificate_id}` - fetch a certificate
//! - `GET /api/stats` - number of issued certificates

pub mod config;
pub mod handlers;
pub mod server;

pub use config::ServeConfig;
pub use handlers::AppState;
pub use server::{app_state, create_router, run, ServerError, MAX_BODY_BYTES};
