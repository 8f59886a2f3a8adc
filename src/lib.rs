//! Terminal news desk.
//!
//! Browse news by trending feed, free-text topic or favorite category, with
//! backend-provided credibility metadata, on-demand summaries and saved
//! articles. The core is sans-IO: [`query::ModeController`] turns user
//! actions into transitions, [`dispatch::FetchDispatcher`] decides between
//! cache reuse and a network fetch, and [`enrichment::EnrichmentManager`]
//! tracks per-article async state. [`app::App`] ties them together.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod enrichment;
pub mod model;
pub mod query;
pub mod saved;
pub mod ui;
pub mod util;
