//! Infrastructure layer
//!
//! This module handles asynchronous execution and external integrations:
//! - Page fetcher abstraction and retry
//! - The accumulator service task and its handle
//! - File-based configuration and CLI argument processing
//! - A simulated catalog data source

pub mod accumulator;
pub mod cli;
pub mod config;
pub mod demo_source;
pub mod fetcher;
