//! Test helpers module
//!
//! Database setup, an application context around the router, and builders
//! for request bodies. Each test binary uses a different subset.

#![allow(dead_code)]

pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
