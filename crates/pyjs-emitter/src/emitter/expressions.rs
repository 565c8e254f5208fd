//! Expression emission.

use super::Emitter;
use crate::error::EmitError;
use pyjs_parser::{BinaryOp, BoolOp, CmpOp, Node, NodeIndex};

impl Emitter<'_> {
    pub(super) fn emit_expression(&mut self, expr: NodeIndex) -> Result<(), EmitError> {
        let Some(node) = self.arena.get(expr) else {
            return Ok(());
        };
        match node {
            Node::Name { id } => {
                self.writer.write(if id == "None" { "null" } else { id });
                Ok(())
            }
            Node::Number { text } => {
                self.writer.write(text);
                Ok(())
            }
            Node::Str { value } => {
                self.emit_string(value);
                Ok(())
            }
            Node::List { elts } | Node::Tuple { elts } => self.emit_bracketed(elts),
            Node::Dict { keys, values } => self.emit_dict(keys, values),
            Node::Attribute { value, attr } => {
                self.emit_expression(*value)?;
                self.writer.write(".");
                self.writer.write(attr);
                Ok(())
            }
            Node::Subscript { value, slice } => {
                self.emit_expression(*value)?;
                self.emit_subscript_slice(*slice)
            }
            Node::Call { func, args } => self.emit_call(*func, args),
            Node::UnaryExpr { op, operand } => {
                self.writer.write(op.js_text());
                self.emit_expression(*operand)
            }
            Node::BinaryExpr { op, left, right } => self.emit_binary(*op, *left, *right),
            Node::BoolExpr { op, values } => self.emit_bool(*op, values),
            Node::Compare {
                left,
                ops,
                comparators,
            } => self.emit_compare(*left, ops, comparators),
            Node::IfExp { test, body, orelse } => self.emit_ternary(*test, *body, *orelse),
            Node::Lambda { args, body } => self.emit_lambda(*args, *body),
            Node::Yield { value } => {
                self.writer.write("yield(");
                self.emit_expression(*value)?;
                self.writer.write(") /* WARNING: Yield not supported */");
                Ok(())
            }
            other => Err(EmitError::unsupported(other.kind_name())),
        }
    }

    fn emit_string(&mut self, value: &str) {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                '\t' => escaped.push_str("\\t"),
                '\r' => escaped.push_str("\\r"),
                '\0' => escaped.push_str("\\0"),
                c => escaped.push(c),
            }
        }
        escaped.push('"');
        self.writer.write(&escaped);
    }

    fn emit_bracketed(&mut self, elts: &[NodeIndex]) -> Result<(), EmitError> {
        self.writer.write("[");
        for (i, &elt) in elts.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_expression(elt)?;
        }
        self.writer.write("]");
        Ok(())
    }

    fn emit_dict(&mut self, keys: &[NodeIndex], values: &[NodeIndex]) -> Result<(), EmitError> {
        self.writer.write("{");
        for (i, (&key, &value)) in keys.iter().zip(values.iter()).enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_expression(key)?;
            self.writer.write(": ");
            self.emit_expression(value)?;
        }
        self.writer.write("}");
        Ok(())
    }

    fn emit_subscript_slice(&mut self, slice: NodeIndex) -> Result<(), EmitError> {
        match self.arena.get(slice) {
            Some(Node::Index { value }) => {
                self.writer.write("[");
                self.emit_expression(*value)?;
                self.writer.write("]");
                Ok(())
            }
            Some(Node::Slice { lower, upper, step }) => {
                self.writer.write(".slice(");
                if lower.is_some() {
                    self.emit_expression(*lower)?;
                } else {
                    self.writer.write("0");
                }
                if upper.is_some() || step.is_some() {
                    self.writer.write(", ");
                }
                if upper.is_some() {
                    self.emit_expression(*upper)?;
                }
                if step.is_some() {
                    self.writer.write(", ");
                    self.emit_expression(*step)?;
                }
                self.writer.write(")");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn emit_call(&mut self, func: NodeIndex, args: &[NodeIndex]) -> Result<(), EmitError> {
        // len(x) -> x.length
        if args.len() == 1 && self.arena.name_text(func) == Some("len") {
            self.emit_expression(args[0])?;
            self.writer.write(".length");
            return Ok(());
        }
        // xs.extend(ys) -> Array.prototype.push.apply(xs, ys)
        if let Some(Node::Attribute { value, attr }) = self.arena.get(func) {
            if attr == "extend" {
                self.writer.write("Array.prototype.push.apply(");
                self.emit_expression(*value)?;
                for &arg in args {
                    self.writer.write(", ");
                    self.emit_expression(arg)?;
                }
                self.writer.write(")");
                return Ok(());
            }
        }
        self.emit_expression(func)?;
        self.writer.write("(");
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_expression(arg)?;
        }
        self.writer.write(")");
        Ok(())
    }

    fn emit_binary(
        &mut self,
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
    ) -> Result<(), EmitError> {
        let Some(text) = op.js_text() else {
            return Err(EmitError::unsupported(format!(
                "operator '{}'",
                op.py_text()
            )));
        };
        self.emit_expression(left)?;
        self.writer.write(" ");
        self.writer.write(text);
        self.writer.write(" ");
        self.emit_expression(right)
    }

    fn emit_bool(&mut self, op: BoolOp, values: &[NodeIndex]) -> Result<(), EmitError> {
        for (i, &value) in values.iter().enumerate() {
            if i > 0 {
                self.writer.write(" ");
                self.writer.write(op.js_text());
                self.writer.write(" ");
            }
            self.emit_expression(value)?;
        }
        Ok(())
    }

    /// A chain `a < b < c` expands to `a < b && b < c`. The shared
    /// comparand is re-emitted textually; when it is not a simple name this
    /// re-evaluates it, which gets flagged inline.
    fn emit_compare(
        &mut self,
        left: NodeIndex,
        ops: &[CmpOp],
        comparators: &[NodeIndex],
    ) -> Result<(), EmitError> {
        self.emit_expression(left)?;
        for (i, (&op, &comparator)) in ops.iter().zip(comparators.iter()).enumerate() {
            if i > 0 {
                self.writer.write(" && ");
                let previous = comparators[i - 1];
                self.emit_expression(previous)?;
                if !matches!(self.arena.get(previous), Some(Node::Name { .. })) {
                    self.writer.write(" /* WARNING: expression re-evaluated! */");
                }
            }
            let Some(text) = op.js_text() else {
                return Err(EmitError::unsupported(format!(
                    "operator '{}'",
                    op.py_text()
                )));
            };
            self.writer.write(" ");
            self.writer.write(text);
            self.writer.write(" ");
            self.emit_expression(comparator)?;
        }
        Ok(())
    }

    fn emit_ternary(
        &mut self,
        test: NodeIndex,
        body: NodeIndex,
        orelse: NodeIndex,
    ) -> Result<(), EmitError> {
        self.writer.write("((");
        self.emit_expression(test)?;
        self.writer.write(") ? ");
        self.emit_expression(body)?;
        self.writer.write(" : (");
        self.emit_expression(orelse)?;
        self.writer.write("))");
        Ok(())
    }

    fn emit_lambda(&mut self, args: NodeIndex, body: NodeIndex) -> Result<(), EmitError> {
        // A lambda shares the enclosing scope; no hoisting of its own.
        self.writer.write("function (");
        self.emit_parameters(args)?;
        self.writer.write(") { return ");
        self.emit_expression(body)?;
        self.writer.write("; }");
        Ok(())
    }
}
