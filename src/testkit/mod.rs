//! Test helpers shared by the unit tests
//!
//! Scripted backends stand in for real point arithmetic so engine and
//! workflow tests run instantly and deterministically.

pub mod scripted;

pub use scripted::*;
