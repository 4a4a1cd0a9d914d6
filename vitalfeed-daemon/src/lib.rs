//! Vitalfeed daemon library
//!
//! This module exports the internal components of the daemon for testing purposes.

pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod feed;
