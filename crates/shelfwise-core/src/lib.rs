//! # Shelfwise Core
//!
//! Core types, errors, and utilities for the Shelfwise API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`clock`]: Injectable time source used by fine assessment and overdue detection
//! - [`serde`]: Custom serde deserialization helpers for query parameters
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_core::{AppError, Clock, SystemClock};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Book not found"));
//! let now = SystemClock.now();
//! ```

pub mod clock;
pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AppError, ErrorKind};
