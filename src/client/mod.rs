//! Network layer for the gateway's console API.
//!
//! Requests are built exclusively from [`EffectiveFilter`] -- the
//! post-scope, post-window resolution of the raw filter state -- so the
//! authorization boundary holds even if a view bug would otherwise leak
//! a disallowed field into a request.

mod error;
mod export;
mod gateway;
mod query;

pub use error::{ClientError, ClientResult};
pub use export::{ExportDownload, ExportFormat, ExportRequest, ExportScope};
pub use gateway::{GatewayClient, ListQuery};
pub use query::EffectiveFilter;
