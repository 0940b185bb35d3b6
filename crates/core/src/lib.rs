//! Core business logic for the Wilaiety registry.

pub mod labels;
pub mod policy;
pub mod services;

pub use policy::{Permission, Policy, Principal, Role};
pub use services::*;
