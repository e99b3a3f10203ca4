//! causeway-core: foundation types for the Causeway error model.
//!
//! This crate defines:
//! - [`ErrorValue`]: an immutable classified error with an owned cause
//! - [`SubtypeTag`] and the [`taxonomy`] table of default classifications
//! - [`chain::walk`]: bounded, cycle-safe cause-chain traversal
//! - [`ErrorRecord`] / [`RecordNode`]: transport-safe record shapes
//! - [`ErrorCodec`]: the trait every record format implements

pub mod chain;
pub mod codec;
pub mod config;
pub mod record;
pub mod stack;
pub mod taxonomy;
pub mod types;

pub use chain::{root_cause, walk, walk_with_depth, CauseLink, MAX_CHAIN_DEPTH};
pub use codec::{CodecError, ErrorCodec};
pub use config::CodecConfig;
pub use record::{ErrorRecord, LinkedRecord, RecordGraph, RecordNode};
pub use stack::StackFilter;
pub use taxonomy::{Classification, ErrorFactory, SubtypeTag, TaxonomyEntry};
pub use types::{DetailValue, Details, ErrorParts, ErrorValue, ErrorValueBuilder, UNKNOWN_ERROR_CODE};
