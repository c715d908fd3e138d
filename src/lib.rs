//! Secret Rotator Library
//!
//! Rotation handler for composite application secrets kept in a versioned,
//! stage-labelled secret store. Regenerates the field encryption key while
//! passing static configuration through unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use secret_rotator::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod rotation;
