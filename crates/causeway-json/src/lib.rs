//! causeway-json: JSON serializer and reconstructor for Causeway error chains.
//!
//! # Quick Start
//!
//! ```rust
//! use causeway_core::{ErrorCodec, ErrorValue};
//! use causeway_json::JsonErrorCodec;
//!
//! let codec = JsonErrorCodec::new();
//! let error = ErrorValue::validation("Invalid email")
//!     .with_cause(ErrorValue::generic("Error", "regex mismatch"));
//!
//! let text = codec.encode_json(&error).unwrap();
//! let back = codec.decode_json(&text).unwrap();
//! assert_eq!(back.error_chain().len(), 2);
//! ```

pub mod codec;
pub mod coerce;
pub mod deserialize;
pub mod serialize;

pub use codec::{deserialize, reconstruct_error_chain, serialize, JsonErrorCodec};
pub use deserialize::{create_instance, EMPTY_CHAIN_MESSAGE};
