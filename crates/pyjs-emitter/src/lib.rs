//! Best-effort syntax transliteration of a parsed module into JavaScript
//! source text.
//!
//! The emitter is syntax-directed: no type inference, no flow analysis
//! beyond the variable-declaration hoisting pre-pass in [`locals`]. Rewrites
//! that are known to be only approximately correct (truthy containers,
//! re-evaluated comparison chains, `yield`) are flagged with inline warning
//! comments in the output rather than rejected; constructs with no rewrite
//! at all fail hard with [`EmitError`].

mod emitter;
mod error;
mod locals;
mod source_writer;

pub use emitter::{translate, Emitter};
pub use error::EmitError;
pub use locals::{hoisted_locals, HoistMap};
pub use source_writer::SourceWriter;
