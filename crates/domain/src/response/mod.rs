//! HTTP Response domain types

mod record;
mod status;

pub use record::{ResponseBody, ResponseRecord};
pub use status::StatusCode;
