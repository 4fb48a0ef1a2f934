//! Domain models for the inventory analytics dashboard

mod analytics;
mod filter;
mod record;
mod summary;
mod turnover;

pub use analytics::*;
pub use filter::*;
pub use record::*;
pub use summary::*;
pub use turnover::*;
