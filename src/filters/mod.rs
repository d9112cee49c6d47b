//! Selection filters applied every collection cycle
//!
//! `DeploymentsFilter` decides which deployments are visible at all; the
//! remaining filters are pure predicates over a single instance attribute.

pub mod azs;
pub mod cidrs;
pub mod deployments;
pub mod processes;

pub use azs::AzsFilter;
pub use cidrs::CidrFilter;
pub use deployments::{DeploymentsFilter, SelectError, Selection};
pub use processes::ProcessFilter;
