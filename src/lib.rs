//! mbox contacts library - Contact extraction from Gmail mbox exports
//!
//! Reads `From`/`To` header strings from a mailbox (or a JSON dump of
//! them), maps every email to the display names seen with it, sorts the
//! result by reversed domain and writes JSON and vCard files.

#![allow(clippy::multiple_crate_versions)] // Transitive dependencies

pub mod address;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod error;
pub mod logging;
pub mod mbox;
pub mod output;
pub mod processor;
pub mod report;

pub use config::Config;
pub use contacts::{ContactRecord, EmailNames, SortKey};
pub use error::{ContactsError, InvalidEmail, Result};
pub use processor::Processor;
pub use report::RunReport;
