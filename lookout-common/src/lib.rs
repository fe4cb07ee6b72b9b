//! Shared pieces used across the Lookout crates.
//!
//! This crate stays small so every other crate can depend on it without
//! pulling in the HTTP or rendering stacks.
//!
//! # Overview
//!
//! - [`meta`]: result metadata keys that are never rendered as payload
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use lookout_common::meta::is_hidden;
//!
//! assert!(is_hidden("search time"));
//! assert!(!is_hidden("email"));
//! ```

pub mod meta;
pub mod observability;
