//! Error handling for decompression operations
//!
//! This module defines the error types used by both backends. It uses
//! thiserror for ergonomic error handling.

pub use crate::common::DecodeError;
pub use crate::common::Result;
