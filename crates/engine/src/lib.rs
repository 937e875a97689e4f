//! # Rewire Engine
//!
//! Orchestrates the conversion pipeline over a project tree:
//!
//! ```text
//! project root
//!     │
//!     ├──> DescriptorScanner (content-sniffed walk, include/exclude filters)
//!     │
//!     └──> per descriptor file
//!          ├─> RecordExtractor        (markup → records)
//!          └─> per record
//!              ├─> ComponentResolver  (record → 0/1/N source files)
//!              ├─> MarkerPlanner      (record + structure view → plan)
//!              ├─> SourceRewriter     (plan → rewritten text)
//!              ├─> BackupCoordinator  (snapshot, write, restore on failure)
//!              └─> ConversionLedger   (outcome, follow-ups, counters)
//!          then MarkupPruner          (comment out converted, drop empty file)
//! ```
//!
//! Everything is sequential and synchronous. One record's failure never
//! aborts its file; one file's failure never aborts the run. Only a
//! configuration error during startup validation stops the run before any
//! file is touched.

mod backup;
mod config;
mod discovery;
mod engine;
mod error;
mod ledger;
mod outcome;
mod pruner;
mod resolver;

pub use backup::BackupCoordinator;
pub use config::ConverterConfig;
pub use discovery::{DescriptorScanner, PathFilters};
pub use engine::ConversionEngine;
pub use error::{EngineError, Result};
pub use ledger::ConversionLedger;
pub use outcome::{
    ConversionOutcome, ErrorKind, ErrorSeverity, FollowUpCategory, FollowUpItem,
    FollowUpPriority, OutcomeStatus, RunError,
};
pub use pruner::MarkupPruner;
pub use resolver::{ComponentResolver, SOURCE_EXTENSION};
