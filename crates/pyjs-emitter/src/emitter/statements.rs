//! Statement emission.

use super::Emitter;
use crate::error::EmitError;
use crate::locals::hoisted_locals;
use pyjs_parser::{BinaryOp, ImportAlias, Node, NodeIndex};

impl Emitter<'_> {
    // =========================================================================
    // Statement sequences and hoisted declarations
    // =========================================================================

    pub(super) fn emit_statements(&mut self, body: &[NodeIndex]) -> Result<(), EmitError> {
        for &stmt in body {
            self.emit_declarations(stmt);
            self.emit_statement(stmt)?;
        }
        Ok(())
    }

    /// Emit the declaration line for names anchored at `stmt`, folding into
    /// an assignment where possible: either `stmt` itself when it is a
    /// single-target assignment to the hoisted name, or, for a sole hoisted
    /// name, the first matching assignment inside `stmt`.
    pub(super) fn emit_declarations(&mut self, stmt: NodeIndex) {
        let Some(names) = self.scope.get(&stmt).cloned() else {
            return;
        };
        let mut standalone: Vec<String> = Vec::new();
        for name in names {
            if self.is_declaring_assign(stmt, &name) {
                self.pending_fold.insert(stmt);
            } else {
                standalone.push(name);
            }
        }
        if standalone.len() == 1 && !self.pending_fold.contains(&stmt) {
            if let Some(inner) = self.find_branch_assign(stmt, &standalone[0]) {
                self.pending_fold.insert(inner);
                return;
            }
        }
        if standalone.is_empty() {
            return;
        }
        self.writer.write("var ");
        self.writer.write(&standalone.join(", "));
        self.writer.write_line(";");
    }

    pub(super) fn emit_statement(&mut self, stmt: NodeIndex) -> Result<(), EmitError> {
        let Some(node) = self.arena.get(stmt) else {
            return Ok(());
        };
        match node {
            Node::FunctionDef { name, args, body } => self.emit_function(name, *args, body),
            Node::If { .. } => self.emit_if(stmt),
            Node::While { test, body, orelse } => self.emit_while(*test, body, orelse),
            Node::For {
                target,
                iter,
                body,
                orelse,
            } => self.emit_for(*target, *iter, body, orelse),
            Node::Assign { targets, value } => self.emit_assign(stmt, targets, *value),
            Node::AugAssign { target, op, value } => self.emit_aug_assign(*target, *op, *value),
            Node::Return { value } => self.emit_return(*value),
            Node::Delete { targets } => self.emit_delete(targets),
            Node::Import { names } => self.emit_import(names),
            Node::ExprStatement { value } => {
                self.emit_expression(*value)?;
                self.writer.write_line(";");
                Ok(())
            }
            Node::Break => {
                self.writer.write_line("break;");
                Ok(())
            }
            Node::Continue => {
                self.writer.write_line("continue;");
                Ok(())
            }
            // The thrown expression is not appended; it has to be filled in
            // by hand in the emitted text.
            Node::Raise { .. } => {
                self.writer.write("throw");
                Ok(())
            }
            Node::Pass | Node::Global { .. } => Ok(()),
            other => Err(EmitError::unsupported(other.kind_name())),
        }
    }

    // =========================================================================
    // Individual statements
    // =========================================================================

    fn emit_function(
        &mut self,
        name: &str,
        args: NodeIndex,
        body: &[NodeIndex],
    ) -> Result<(), EmitError> {
        self.writer.write("function ");
        self.writer.write(name);
        self.writer.write("(");
        self.emit_parameters(args)?;
        self.writer.write_line(") {");
        self.writer.increase_indent();
        let scope = hoisted_locals(self.arena, body);
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = self.emit_statements(body);
        self.scope = saved;
        result?;
        self.writer.decrease_indent();
        self.writer.write_line("}");
        Ok(())
    }

    fn emit_if(&mut self, stmt: NodeIndex) -> Result<(), EmitError> {
        let mut current = stmt;
        loop {
            let Some(Node::If { test, body, orelse }) = self.arena.get(current) else {
                return Ok(());
            };
            self.writer.write("if (");
            self.emit_expression(*test)?;
            self.writer.write_line(") {");
            self.writer.increase_indent();
            self.emit_statements(body)?;
            self.writer.decrease_indent();
            self.writer.write("}");
            // A sole nested If in the else branch flattens to `else if`,
            // unless it would need a declaration line of its own (the line
            // cannot be placed mid-chain).
            if orelse.len() == 1
                && matches!(self.arena.get(orelse[0]), Some(Node::If { .. }))
                && !self.needs_declaration_line(orelse[0])
            {
                self.writer.write(" else ");
                self.emit_declarations(orelse[0]);
                current = orelse[0];
                continue;
            }
            if !orelse.is_empty() {
                self.writer.write_line(" else {");
                self.writer.increase_indent();
                self.emit_statements(orelse)?;
                self.writer.decrease_indent();
                self.writer.write_line("}");
            } else {
                self.writer.newline();
            }
            return Ok(());
        }
    }

    fn emit_while(
        &mut self,
        test: NodeIndex,
        body: &[NodeIndex],
        orelse: &[NodeIndex],
    ) -> Result<(), EmitError> {
        if !orelse.is_empty() {
            return Err(EmitError::unsupported("while-else"));
        }
        self.writer.write("while (");
        self.emit_expression(test)?;
        self.writer.write(")");
        if !matches!(self.arena.get(test), Some(Node::Compare { .. })) {
            self.writer
                .write(" /* WARNING: Empty containers are NOT false in Javascript! */");
        }
        self.writer.write_line(" {");
        self.writer.increase_indent();
        self.emit_statements(body)?;
        self.writer.decrease_indent();
        self.writer.write_line("}");
        Ok(())
    }

    fn emit_for(
        &mut self,
        target: NodeIndex,
        iter: NodeIndex,
        body: &[NodeIndex],
        orelse: &[NodeIndex],
    ) -> Result<(), EmitError> {
        if !orelse.is_empty() {
            return Err(EmitError::unsupported("for-else"));
        }
        if let Some(plan) = self.counting_loop_plan(target, iter) {
            self.writer.write("for (var ");
            self.write_loop_index(&plan);
            self.writer.write(" = 0; ");
            self.write_loop_index(&plan);
            self.writer.write(" < ");
            self.emit_expression(plan.container)?;
            self.writer.write(".length; ++");
            self.write_loop_index(&plan);
            self.writer.write_line(") {");
            self.writer.increase_indent();
            // Bind the element before the translated body.
            self.emit_expression(plan.element)?;
            self.writer.write(" = ");
            self.emit_expression(plan.container)?;
            self.writer.write("[");
            self.write_loop_index(&plan);
            self.writer.write_line("];");
            self.emit_statements(body)?;
            self.writer.decrease_indent();
            self.writer.write_line("}");
            return Ok(());
        }
        self.writer.write("for (var ");
        self.emit_expression(target)?;
        self.writer.write(" in ");
        self.emit_expression(iter)?;
        self.writer.write_line(") {");
        self.writer.increase_indent();
        self.emit_statements(body)?;
        self.writer.decrease_indent();
        self.writer.write_line("}");
        Ok(())
    }

    fn emit_assign(
        &mut self,
        stmt: NodeIndex,
        targets: &[NodeIndex],
        value: NodeIndex,
    ) -> Result<(), EmitError> {
        if self.pending_fold.remove(&stmt) {
            self.writer.write("var ");
        }
        for &target in targets {
            self.emit_expression(target)?;
            self.writer.write(" = ");
        }
        self.emit_expression(value)?;
        self.writer.write_line(";");
        Ok(())
    }

    fn emit_aug_assign(
        &mut self,
        target: NodeIndex,
        op: BinaryOp,
        value: NodeIndex,
    ) -> Result<(), EmitError> {
        self.emit_expression(target)?;
        let Some(text) = op.js_text() else {
            return Err(EmitError::unsupported(format!(
                "operator '{}'",
                op.py_text()
            )));
        };
        self.writer.write(" ");
        self.writer.write(text);
        self.writer.write("= ");
        self.emit_expression(value)?;
        self.writer.write_line(";");
        Ok(())
    }

    fn emit_return(&mut self, value: NodeIndex) -> Result<(), EmitError> {
        if value.is_none() {
            self.writer.write_line("return;");
            return Ok(());
        }
        self.writer.write("return ");
        self.emit_expression(value)?;
        self.writer.write_line(";");
        Ok(())
    }

    fn emit_delete(&mut self, targets: &[NodeIndex]) -> Result<(), EmitError> {
        let mut plain: Vec<NodeIndex> = Vec::new();
        for &target in targets {
            let Some(Node::Subscript { value, slice }) = self.arena.get(target) else {
                plain.push(target);
                continue;
            };
            let Some(Node::Slice { lower, upper, step }) = self.arena.get(*slice) else {
                plain.push(target);
                continue;
            };
            if step.is_some() && !self.is_literal_one(*step) {
                return Err(EmitError::unsupported("slice deletion with a non-unit step"));
            }
            self.emit_expression(*value)?;
            self.writer.write(".splice(");
            if lower.is_some() {
                self.emit_expression(*lower)?;
            } else {
                self.writer.write("0");
            }
            self.writer.write(", ");
            if upper.is_some() {
                self.emit_expression(*upper)?;
            } else {
                self.emit_expression(*value)?;
                self.writer.write(".length");
            }
            self.writer.write_line(");");
        }
        if !plain.is_empty() {
            self.writer.write("delete ");
            for (i, &target) in plain.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                self.emit_expression(target)?;
            }
            self.writer.write_line(";");
        }
        Ok(())
    }

    fn emit_import(&mut self, names: &[ImportAlias]) -> Result<(), EmitError> {
        self.writer.write("var ");
        for (i, alias) in names.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.writer.write(alias.asname.as_deref().unwrap_or(&alias.name));
            self.writer.write(" = import(\"");
            self.writer.write(&alias.name);
            self.writer.write("\")");
        }
        self.writer.write_line(";");
        Ok(())
    }
}
