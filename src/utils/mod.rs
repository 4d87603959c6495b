//! Utility functions and helpers
//!
//! Hex encoding shared by the key types and front ends, and the naming of
//! the files an encode run leaves next to its input.

pub mod files;
pub mod hex;

pub use files::{artifact_path, ArtifactPaths};
pub use hex::{decode_hex, decode_hex_exact, encode_hex, strip_hex_prefix};
