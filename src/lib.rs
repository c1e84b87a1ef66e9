//! Pennywise - monthly budgeting engine
//!
//! This library holds the records of a personal budget (one budget per
//! month, spending categories, allocations, expenses, income, recurring
//! expenses, savings goals and a settings singleton) and derives the
//! figures shown to the user from them: per-category spend, budget
//! summaries and rollover from the previous month.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Records and derived views
//! - `storage`: Indexed tables committed through a pluggable backend
//! - `services`: Business logic layer
//! - `export`: Full-store JSON snapshots
//! - `display`: Table formatting for the terminal
//! - `cli`: Command handlers behind the `pennywise` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pennywise::config::PennywisePaths;
//! use pennywise::services::SummaryService;
//! use pennywise::storage::Storage;
//!
//! let storage = Storage::open(&PennywisePaths::new()?)?;
//! let summary = SummaryService::new(&storage).get_budget_summary(budget_id)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::PennywiseError;
