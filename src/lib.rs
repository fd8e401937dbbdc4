//! Ticket Triage — local rule-based support ticket analysis.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
