//! Shared types for the vidboard server and dashboard.

pub mod catalog;
pub mod config;
pub mod pagination;
pub mod platform;
pub mod trim;
