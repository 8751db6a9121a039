//! Core types and definitions for the skydrop positioning engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geodetic and local-frame types, enums, scene commands, configuration,
//! errors and constants. It has no dependency on any rendering framework.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;
