//! Configuration system for fontweft.
//!
//! This crate provides the serde-backed [`FontConfig`] that drives font
//! resolution and strike caching:
//!
//! - Platform family names backing the four logical families
//! - The ordered fallback ("linked fonts") family list
//! - Strike retention and sweep scheduling
//! - Default antialiasing mode and font directories

pub mod config;
pub mod defaults;
mod error;
mod types;

pub use config::FontConfig;
pub use error::ConfigError;
pub use types::{AntiAliasMode, LogicalFamilies, canonical_family_name};
