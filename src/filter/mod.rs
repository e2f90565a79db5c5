//! Faceted filter state and authorization scoping.
//!
//! [`FilterState`] is the raw record the UI edits, owned exclusively by
//! [`FilterController`]. [`scope`] turns the caller's role and the
//! current mode into a capability descriptor, and [`date_range`] turns
//! the declarative date selector into a concrete window. The resolved
//! pair is what the network layer consumes; views never build query
//! parameters from raw state.

pub mod controller;
pub mod date_range;
mod error;
pub mod scope;
mod state;

pub use controller::{FilterController, FilterPatch};
pub use date_range::EffectiveWindow;
pub use error::FilterError;
pub use scope::ScopeDescriptor;
pub use state::{DateRangeSelection, FilterState, Mode, TeamSelection};
