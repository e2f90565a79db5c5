//! Role resolution for the console session.
//!
//! The role is derived from an explicit [`SessionContext`] value threaded
//! in by the caller, never read from ambient storage, so the engine can
//! be exercised with arbitrary role fixtures.

mod role;

pub use role::{Principal, Role, SessionContext, resolve_role};
