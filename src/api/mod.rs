//! Backend REST surface: HTTP client, error taxonomy and endpoint resolution.

mod client;
mod routes;

pub use client::{ApiError, BackendClient, RemoveAck, SaveAck};
pub use routes::NewsRoute;
