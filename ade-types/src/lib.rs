//! Closed type registry and typed value codec for the ADE AtomContainer
//! format.
//!
//! This crate has no notion of a tree; it is the leaf layer the `ade` crate
//! builds `Atom`/`BinaryCodec`/`TextCodec`/`PathEvaluator` on top of.

pub mod bytes;
mod codec;
pub mod error;
pub mod numeric;
pub mod registry;
pub mod type_code;
pub mod value;

pub use error::CodecError;
pub use registry::{TypeDescriptor, TypeRegistry, Width};
pub use type_code::TypeCode;
pub use value::AtomValue;
