//! Domain types and the error taxonomy shared by every tunelink crate.

mod error;
mod result;
mod service;

pub use error::{TunelinkError, TunelinkResult};
pub use result::{ConversionResult, SearchResultItem};
pub use service::{ConversionRequest, TargetService};
