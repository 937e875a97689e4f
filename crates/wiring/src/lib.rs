//! # Rewire Wiring
//!
//! Data model and extractor for externally-declared component wiring
//! descriptors (XML dependency-injection records).
//!
//! ## Architecture
//!
//! ```text
//! Descriptor file (XML)
//!     │
//!     ├──> Well-formedness parse (roxmltree)
//!     │
//!     ├──> Element recognition
//!     │    ├─> component declaration  → WiringRecord + bindings
//!     │    ├─> scan directive         → synthetic record (basePackage)
//!     │    └─> import directive       → synthetic record (resource)
//!     │
//!     └──> Vec<WiringRecord> (immutable from here on)
//! ```
//!
//! Records carry everything downstream stages need: declared type, scope and
//! lifecycle flags, ordered property/constructor bindings, the raw attribute
//! map, and the descriptor position they came from.

mod error;
mod extractor;
mod record;

pub use error::{Result, WiringError};
pub use extractor::{is_wiring_descriptor, RecordExtractor};
pub use record::{ConstructorBinding, PropertyBinding, WiringRecord};

/// Default lifecycle scope assumed when a declaration carries none.
pub const DEFAULT_SCOPE: &str = "singleton";
