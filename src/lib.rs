//! Erlext: a decoder for the Erlang external term format.
//!
//! The crate provides:
//! - The wire-format decoders and envelope handling (`ext`)
//! - The decoded value model with structural matching (`term`)
//! - Batch decoding of independent buffers (`batch`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use erlext::{Term, decode};
//!
//! let term = decode(&[131, 107, 0, 2, b'h', b'i']).unwrap();
//! assert!(term.matches(&Term::list(vec![Term::Int64(104), Term::Int64(105)])));
//! ```

pub mod batch;
pub mod ext;
pub mod term;

#[cfg(feature = "cli")]
pub mod cli;

pub use ext::{DecodeError, DecodeOptions, decode, decode_reader, decode_with};
pub use term::Term;
