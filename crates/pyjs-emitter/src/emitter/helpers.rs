//! Shared rewrite helpers: parameter lists, loop desugaring, declaration
//! folding.

use super::Emitter;
use crate::error::EmitError;
use pyjs_parser::{Node, NodeIndex};

/// Desugaring plan for a For that becomes a three-clause counting loop.
pub(super) struct CountingLoop {
    pub index: LoopIndex,
    pub container: NodeIndex,
    pub element: NodeIndex,
}

pub(super) enum LoopIndex {
    /// No explicit index variable in the source; one is synthesized from
    /// the loop variable's name.
    Synthesized(String),
    Node(NodeIndex),
}

impl Emitter<'_> {
    /// Parameter list: names comma-separated, defaults shown as trailing
    /// comments, a catch-all parameter rendered with a `...` suffix.
    pub(super) fn emit_parameters(&mut self, args: NodeIndex) -> Result<(), EmitError> {
        let Some(Node::Arguments {
            args: params,
            defaults,
            vararg,
            kwarg,
        }) = self.arena.get(args)
        else {
            return Ok(());
        };
        let required = params.len() - defaults.len();
        for (i, &param) in params.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_expression(param)?;
            if i >= required {
                self.writer.write(" /*= ");
                self.emit_expression(defaults[i - required])?;
                self.writer.write("*/");
            }
        }
        if let Some(name) = vararg.as_deref().or(kwarg.as_deref()) {
            if !params.is_empty() {
                self.writer.write(", ");
            }
            self.writer.write(name);
            self.writer.write("...");
        }
        Ok(())
    }

    /// A For desugars to a counting loop in exactly two shapes: a name
    /// iterated over a name, or an `(index, item)` pair unpacked from an
    /// `enumerate` call on a name. Everything else falls back to a
    /// property-enumeration loop.
    pub(super) fn counting_loop_plan(
        &self,
        target: NodeIndex,
        iter: NodeIndex,
    ) -> Option<CountingLoop> {
        if let (Some(Node::Name { id }), Some(Node::Name { .. })) =
            (self.arena.get(target), self.arena.get(iter))
        {
            return Some(CountingLoop {
                index: LoopIndex::Synthesized(format!("{}$index", id)),
                container: iter,
                element: target,
            });
        }
        if let Some(Node::Tuple { elts }) = self.arena.get(target) {
            if elts.len() == 2 && matches!(self.arena.get(elts[0]), Some(Node::Name { .. })) {
                if let Some(Node::Call { func, args }) = self.arena.get(iter) {
                    if args.len() == 1
                        && matches!(self.arena.get(args[0]), Some(Node::Name { .. }))
                        && self.arena.name_text(*func) == Some("enumerate")
                    {
                        return Some(CountingLoop {
                            index: LoopIndex::Node(elts[0]),
                            container: args[0],
                            element: elts[1],
                        });
                    }
                }
            }
        }
        None
    }

    pub(super) fn write_loop_index(&mut self, plan: &CountingLoop) {
        match &plan.index {
            LoopIndex::Synthesized(name) => self.writer.write(name),
            LoopIndex::Node(idx) => {
                if let Some(name) = self.arena.name_text(*idx) {
                    self.writer.write(name);
                }
            }
        }
    }

    /// `stmt` is a single-target assignment to exactly `name`, so a
    /// declaration can be folded into it.
    pub(super) fn is_declaring_assign(&self, stmt: NodeIndex, name: &str) -> bool {
        match self.arena.get(stmt) {
            Some(Node::Assign { targets, .. }) => {
                targets.len() == 1 && self.arena.name_text(targets[0]) == Some(name)
            }
            _ => false,
        }
    }

    /// First assignment to `name` inside the nested statement sequences of
    /// `stmt` that a declaration can fold into, in depth-first order.
    pub(super) fn find_branch_assign(&self, stmt: NodeIndex, name: &str) -> Option<NodeIndex> {
        for body in self.nested_bodies(stmt) {
            for &child in body {
                if self.is_declaring_assign(child, name) {
                    return Some(child);
                }
                if let Some(found) = self.find_branch_assign(child, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Whether printing `stmt` would have to start with a standalone
    /// `var ...;` line.
    pub(super) fn needs_declaration_line(&self, stmt: NodeIndex) -> bool {
        match self.scope.get(&stmt) {
            None => false,
            Some(names) if names.len() == 1 => {
                !self.is_declaring_assign(stmt, &names[0])
                    && self.find_branch_assign(stmt, &names[0]).is_none()
            }
            Some(_) => true,
        }
    }

    fn nested_bodies(&self, stmt: NodeIndex) -> Vec<&[NodeIndex]> {
        match self.arena.get(stmt) {
            Some(Node::If { body, orelse, .. })
            | Some(Node::While { body, orelse, .. })
            | Some(Node::For { body, orelse, .. }) => vec![body, orelse],
            Some(Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            }) => {
                let mut bodies: Vec<&[NodeIndex]> = vec![body];
                for &handler in handlers {
                    if let Some(Node::ExceptHandler { body, .. }) = self.arena.get(handler) {
                        bodies.push(body);
                    }
                }
                bodies.push(finalbody);
                bodies.push(orelse);
                bodies
            }
            Some(Node::With { body, .. }) => vec![body],
            _ => Vec::new(),
        }
    }

    pub(super) fn is_literal_one(&self, expr: NodeIndex) -> bool {
        matches!(self.arena.get(expr), Some(Node::Number { text }) if text == "1")
    }
}
