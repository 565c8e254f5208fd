//! Recursive tree-to-text emitter.
//!
//! One depth-first traversal from the module root. Statement printing is
//! split across `statements.rs` and `expressions.rs`; shared rewrite
//! helpers live in `helpers.rs`. The traversal either runs to completion
//! or stops at the first unsupported construct.

mod expressions;
mod helpers;
mod statements;

use crate::error::EmitError;
use crate::locals::{hoisted_locals, HoistMap};
use crate::source_writer::SourceWriter;
use pyjs_parser::{Node, NodeArena, NodeIndex, ParsedModule};
use rustc_hash::FxHashSet;

/// Translate a parsed module into target-language source text.
pub fn translate(module: &ParsedModule) -> Result<String, EmitError> {
    let mut emitter = Emitter::new(&module.arena);
    emitter.emit_module(module.root)?;
    let out = emitter.finish();
    tracing::debug!(bytes = out.len(), "emitted module");
    Ok(out)
}

pub struct Emitter<'a> {
    arena: &'a NodeArena,
    writer: SourceWriter,
    /// Hoisting map for the scope currently being printed. Swapped out and
    /// restored around every function body.
    scope: HoistMap,
    /// Assignments that must carry a `var ` prefix because a hoisted
    /// declaration was folded into them.
    pending_fold: FxHashSet<NodeIndex>,
}

impl<'a> Emitter<'a> {
    pub fn new(arena: &'a NodeArena) -> Emitter<'a> {
        Emitter {
            arena,
            writer: SourceWriter::new(),
            scope: HoistMap::default(),
            pending_fold: FxHashSet::default(),
        }
    }

    pub fn emit_module(&mut self, root: NodeIndex) -> Result<(), EmitError> {
        let Some(Node::Module { body }) = self.arena.get(root) else {
            return Err(EmitError::unsupported("module root"));
        };
        let scope = hoisted_locals(self.arena, body);
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = self.emit_statements(body);
        self.scope = saved;
        result
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }
}
