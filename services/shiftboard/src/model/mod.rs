//! Shiftboard data model module.
//!
//! # Purpose
//! Re-exports the tenant and shift records shared by the API and store layers.
mod shift;
mod tenant;

pub use shift::{NewShift, Shift};
pub use tenant::Tenant;
