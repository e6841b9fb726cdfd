//! Cumulus API command-line client
//!
//! - [`api`] - Request execution, pagination and upsert over an [`api::Invoke`] transport
//! - [`resources`] - Per-resource operations (collections, granules, rules, ...)
//! - [`unfold`] - Lazy sequences driven by a step function
//! - [`config`] - HTTP invoker settings

pub mod api;
pub mod config;
pub mod resources;
pub mod unfold;
