//! ReviewReply Server
//!
//! HTTP API around the review pipeline plus the command line tooling that
//! ships with it (deployment checks and dataset preparation).

pub mod app;
pub mod check;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use config::{ServeOverrides, ServiceConfig};
pub use pipeline::ReviewPipeline;
pub use state::AppState;
