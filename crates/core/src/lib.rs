//! FutStore Core - Shared types library.
//!
//! This crate provides common types used across all FutStore components:
//! - `storefront` - Public-facing e-commerce API
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, jersey sizes, order/payment enums, and money
//!   formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
