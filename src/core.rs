//! Core pagination engine
//!
//! This module contains the pure parts of the engine:
//! - Policy configuration
//! - Pagination state and its update function
//! - Commands produced by state transitions
//! - Scroll-driven trigger gating

pub mod cmd;
pub mod config;
pub mod pagination;
pub mod scroll_trigger;
