//! Role-scoped usage analytics console engine for a multi-tenant AI
//! gateway.
//!
//! The crate owns the query-defining state behind every console view:
//! the combined filter object lives in [`filter::FilterController`],
//! authorization scoping happens in [`filter::scope`], and the network
//! layer consumes only the fully resolved [`client::EffectiveFilter`] --
//! never raw UI state. [`engine::ConsoleEngine`] composes the pieces and
//! keeps the usage, conversation, storage, and export views synchronized
//! against a single source of truth.

pub mod auth;
pub mod client;
pub mod config;
pub mod engine;
pub mod filter;
pub mod models;
pub mod reference;
pub mod views;
