//! Locset Core - Domain models, errors, and configuration
//!
//! This crate contains the location and feature models shared by the
//! resolution engine, plus the port definition for boundary data providers.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{LocsetError, Result};

/// Canonical identifier of the "whole world" region.
pub const WORLD_ID: &str = "Q2";
