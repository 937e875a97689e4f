//! # Rewire Rewriter
//!
//! Turns wiring records into in-source declarative markers on the classes,
//! fields, and constructors they describe.
//!
//! ## Architecture
//!
//! ```text
//! Java source text
//!     │
//!     ├──> Tree-sitter parse → structure view
//!     │    (classes, fields, constructors, parameters,
//!     │     existing marker names, insertion offsets)
//!     │
//!     ├──> MarkerPlanner (pure decision logic)
//!     │    record + class view → MarkerPlan
//!     │
//!     └──> SourceRewriter (pure text transform)
//!          plan + original text → rewritten text
//! ```
//!
//! The plan is plain data and the apply step never touches the filesystem,
//! so idempotence and dry-run behavior are testable without disk I/O.

mod error;
mod java_ast;
mod markers;
mod planner;
mod rewriter;

pub use error::{Result, RewriteError};
pub use java_ast::{ClassView, ConstructorView, FieldView, JavaSource, ParamView};
pub use markers::{classify_role, marker_name, COMPONENT, ROLE_MARKERS};
pub use planner::{MarkerPlan, MarkerPlanner, MarkerTarget, PlannedMarker};
pub use rewriter::{RewriteOutcome, SourceRewriter};
