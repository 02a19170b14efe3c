//! Models Module
//!
//! Response DTOs for the session API.

mod responses;

pub use responses::*;
