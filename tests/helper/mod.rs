//! Shared integration test utilities

#![allow(dead_code, unused_imports)]

mod app;
mod source;

pub use app::*;
pub use source::*;
