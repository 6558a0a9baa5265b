//! Step-gated progress monitoring for long running operations.
//!
//! The core lives in [`progress`]. The [`storage`] and [`cli`] modules are the
//! `progmon` tool built on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod storage;
