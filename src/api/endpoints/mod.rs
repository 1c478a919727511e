//! API endpoint handlers.
//!
//! Route paths are kept stable for existing frontends.

pub mod admin;
pub mod health;
pub mod home;
pub mod lookup;
pub mod predict;
pub mod symptoms;
