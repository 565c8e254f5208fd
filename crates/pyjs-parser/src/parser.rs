//! Recursive-descent parser producing arena-allocated AST nodes.

use crate::arena::NodeArena;
use crate::ast::{BinaryOp, BoolOp, CmpOp, ImportAlias, Node, NodeIndex, UnaryOp};
use pyjs_scanner::{ScanError, Scanner, Span, Token, TokenKind};
use serde::Serialize;
use std::fmt;

/// A parse failure with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> ParseError {
        ParseError {
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}

impl From<ScanError> for ParseError {
    fn from(e: ScanError) -> ParseError {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// A parsed module: the arena plus the root `Module` node index.
#[derive(Debug, Serialize)]
pub struct ParsedModule {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

/// Parse a whole source text into an arena-allocated module.
pub fn parse(source: &str) -> Result<ParsedModule, ParseError> {
    let module = Parser::new(source)?.parse_module()?;
    tracing::debug!(nodes = module.arena.len(), "parsed module");
    Ok(module)
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    arena: NodeArena,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Parser<'a>, ParseError> {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token()?;
        Ok(Parser {
            scanner,
            arena: NodeArena::new(),
            current,
        })
    }

    pub fn parse_module(mut self) -> Result<ParsedModule, ParseError> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.current.kind == TokenKind::Eof {
                break;
            }
            body.push(self.parse_statement()?);
        }
        let root = self.arena.add(Node::Module { body });
        Ok(ParsedModule {
            arena: self.arena,
            root,
        })
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.scanner.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.current.kind == kind {
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.current.kind == kind {
            self.bump()?;
            return Ok(());
        }
        Err(self.unexpected(what))
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        if matches!(self.current.kind, TokenKind::Name(_)) {
            let token = self.bump()?;
            if let TokenKind::Name(id) = token.kind {
                return Ok(id);
            }
        }
        Err(self.unexpected("a name"))
    }

    fn unexpected(&self, what: &str) -> ParseError {
        ParseError::new(
            format!(
                "Expected {}, found {}",
                what,
                self.current.kind.describe()
            ),
            self.current.span,
        )
    }

    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        while self.current.kind == TokenKind::Newline {
            self.bump()?;
        }
        Ok(())
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
        )
    }

    fn end_statement(&mut self) -> Result<(), ParseError> {
        match self.current.kind {
            TokenKind::Newline => {
                self.bump()?;
                Ok(())
            }
            TokenKind::Dedent | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of statement")),
        }
    }

    fn can_start_expression(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Name(_)
                | TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Not
                | TokenKind::Lambda
        )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Result<NodeIndex, ParseError> {
        match self.current.kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Def => self.parse_def(),
            TokenKind::Try => self.parse_try(),
            TokenKind::With => self.parse_with(),
            TokenKind::Pass => self.parse_simple(Node::Pass),
            TokenKind::Break => self.parse_simple(Node::Break),
            TokenKind::Continue => self.parse_simple(Node::Continue),
            TokenKind::Return => self.parse_return(),
            TokenKind::Yield => self.parse_yield_statement(),
            TokenKind::Del => self.parse_delete(),
            TokenKind::Raise => self.parse_raise(),
            TokenKind::Global => self.parse_global(),
            TokenKind::Import => self.parse_import(),
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_simple(&mut self, node: Node) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        self.end_statement()?;
        Ok(self.arena.add(node))
    }

    fn parse_return(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let value = if self.at_statement_end() {
            NodeIndex::NONE
        } else {
            self.parse_testlist()?
        };
        self.end_statement()?;
        Ok(self.arena.add(Node::Return { value }))
    }

    fn parse_yield_statement(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let value = self.parse_testlist()?;
        self.end_statement()?;
        let yielded = self.arena.add(Node::Yield { value });
        Ok(self.arena.add(Node::ExprStatement { value: yielded }))
    }

    fn parse_delete(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let mut targets = vec![self.parse_test()?];
        while self.eat(TokenKind::Comma)? {
            targets.push(self.parse_test()?);
        }
        self.end_statement()?;
        Ok(self.arena.add(Node::Delete { targets }))
    }

    fn parse_raise(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let exc = if self.at_statement_end() {
            NodeIndex::NONE
        } else {
            self.parse_test()?
        };
        self.end_statement()?;
        Ok(self.arena.add(Node::Raise { exc }))
    }

    fn parse_global(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma)? {
            names.push(self.expect_name()?);
        }
        self.end_statement()?;
        Ok(self.arena.add(Node::Global { names }))
    }

    fn parse_import(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let mut names = Vec::new();
        loop {
            let mut name = self.expect_name()?;
            while self.eat(TokenKind::Dot)? {
                name.push('.');
                name.push_str(&self.expect_name()?);
            }
            let asname = if self.eat(TokenKind::As)? {
                Some(self.expect_name()?)
            } else {
                None
            };
            names.push(ImportAlias { name, asname });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.end_statement()?;
        Ok(self.arena.add(Node::Import { names }))
    }

    fn parse_expr_statement(&mut self) -> Result<NodeIndex, ParseError> {
        let first = self.parse_testlist()?;
        if let Some(op) = aug_assign_op(&self.current.kind) {
            self.bump()?;
            let value = self.parse_testlist()?;
            self.end_statement()?;
            return Ok(self.arena.add(Node::AugAssign {
                target: first,
                op,
                value,
            }));
        }
        if self.current.kind == TokenKind::Assign {
            self.bump()?;
            let mut targets = vec![first];
            let mut value = self.parse_testlist()?;
            while self.eat(TokenKind::Assign)? {
                targets.push(value);
                value = self.parse_testlist()?;
            }
            self.end_statement()?;
            return Ok(self.arena.add(Node::Assign { targets, value }));
        }
        self.end_statement()?;
        Ok(self.arena.add(Node::ExprStatement { value: first }))
    }

    /// `: NEWLINE INDENT statements DEDENT`, or a single simple statement on
    /// the same line.
    fn parse_suite(&mut self) -> Result<Vec<NodeIndex>, ParseError> {
        self.expect(TokenKind::Colon, "':'")?;
        if self.current.kind != TokenKind::Newline {
            return Ok(vec![self.parse_statement()?]);
        }
        self.bump()?;
        self.expect(TokenKind::Indent, "an indented block")?;
        let mut body = Vec::new();
        loop {
            self.skip_newlines()?;
            if matches!(self.current.kind, TokenKind::Dedent | TokenKind::Eof) {
                break;
            }
            body.push(self.parse_statement()?);
        }
        if self.current.kind == TokenKind::Dedent {
            self.bump()?;
        }
        Ok(body)
    }

    fn parse_if(&mut self) -> Result<NodeIndex, ParseError> {
        // Entered on `if` or `elif`; an elif chain nests as a single-If orelse.
        self.bump()?;
        let test = self.parse_test()?;
        let body = self.parse_suite()?;
        let orelse = match self.current.kind {
            TokenKind::Elif => vec![self.parse_if()?],
            TokenKind::Else => {
                self.bump()?;
                self.parse_suite()?
            }
            _ => Vec::new(),
        };
        Ok(self.arena.add(Node::If { test, body, orelse }))
    }

    fn parse_while(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let test = self.parse_test()?;
        let body = self.parse_suite()?;
        let orelse = if self.eat(TokenKind::Else)? {
            self.parse_suite()?
        } else {
            Vec::new()
        };
        Ok(self.arena.add(Node::While { test, body, orelse }))
    }

    fn parse_for(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let target = self.parse_target_list()?;
        self.expect(TokenKind::In, "'in'")?;
        let iter = self.parse_testlist()?;
        let body = self.parse_suite()?;
        let orelse = if self.eat(TokenKind::Else)? {
            self.parse_suite()?
        } else {
            Vec::new()
        };
        Ok(self.arena.add(Node::For {
            target,
            iter,
            body,
            orelse,
        }))
    }

    fn parse_def(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let name = self.expect_name()?;
        self.expect(TokenKind::LParen, "'('")?;
        let args = self.parse_params(TokenKind::RParen)?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_suite()?;
        Ok(self.arena.add(Node::FunctionDef { name, args, body }))
    }

    fn parse_params(&mut self, closing: TokenKind) -> Result<NodeIndex, ParseError> {
        let mut args = Vec::new();
        let mut defaults = Vec::new();
        let mut vararg = None;
        let mut kwarg = None;
        loop {
            if self.current.kind == closing {
                break;
            }
            match self.current.kind {
                TokenKind::Star => {
                    self.bump()?;
                    vararg = Some(self.expect_name()?);
                }
                TokenKind::StarStar => {
                    self.bump()?;
                    kwarg = Some(self.expect_name()?);
                }
                TokenKind::Name(_) => {
                    if vararg.is_some() || kwarg.is_some() {
                        return Err(self.unexpected("')' after catch-all parameter"));
                    }
                    let name = self.expect_name()?;
                    args.push(self.arena.add(Node::Name { id: name }));
                    if self.eat(TokenKind::Assign)? {
                        defaults.push(self.parse_test()?);
                    } else if !defaults.is_empty() {
                        return Err(ParseError::new(
                            "non-default argument follows default argument",
                            self.current.span,
                        ));
                    }
                }
                _ => return Err(self.unexpected("a parameter name")),
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(self.arena.add(Node::Arguments {
            args,
            defaults,
            vararg,
            kwarg,
        }))
    }

    fn parse_try(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let body = self.parse_suite()?;
        let mut handlers = Vec::new();
        while self.current.kind == TokenKind::Except {
            self.bump()?;
            let kind = if self.current.kind == TokenKind::Colon {
                NodeIndex::NONE
            } else {
                self.parse_test()?
            };
            let name = if self.eat(TokenKind::As)? {
                Some(self.expect_name()?)
            } else {
                None
            };
            let handler_body = self.parse_suite()?;
            handlers.push(self.arena.add(Node::ExceptHandler {
                kind,
                name,
                body: handler_body,
            }));
        }
        let orelse = if self.eat(TokenKind::Else)? {
            self.parse_suite()?
        } else {
            Vec::new()
        };
        let finalbody = if self.eat(TokenKind::Finally)? {
            self.parse_suite()?
        } else {
            Vec::new()
        };
        if handlers.is_empty() && finalbody.is_empty() {
            return Err(self.unexpected("'except' or 'finally'"));
        }
        Ok(self.arena.add(Node::Try {
            body,
            handlers,
            orelse,
            finalbody,
        }))
    }

    fn parse_with(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let context = self.parse_test()?;
        let optional_vars = if self.eat(TokenKind::As)? {
            self.parse_test()?
        } else {
            NodeIndex::NONE
        };
        let body = self.parse_suite()?;
        Ok(self.arena.add(Node::With {
            context,
            optional_vars,
            body,
        }))
    }

    /// Assignment targets for a `for` header: names, attributes and
    /// subscripts, never comparisons (the `in` keyword terminates the list).
    fn parse_target_list(&mut self) -> Result<NodeIndex, ParseError> {
        let first = self.parse_atom_expr()?;
        if self.current.kind != TokenKind::Comma {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(TokenKind::Comma)? {
            if !self.can_start_expression() {
                break;
            }
            elts.push(self.parse_atom_expr()?);
        }
        Ok(self.arena.add(Node::Tuple { elts }))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `test (',' test)*` — builds a Tuple when more than one item or a
    /// trailing comma is present.
    fn parse_testlist(&mut self) -> Result<NodeIndex, ParseError> {
        let first = self.parse_test()?;
        if self.current.kind != TokenKind::Comma {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(TokenKind::Comma)? {
            if !self.can_start_expression() {
                break;
            }
            elts.push(self.parse_test()?);
        }
        Ok(self.arena.add(Node::Tuple { elts }))
    }

    fn parse_test(&mut self) -> Result<NodeIndex, ParseError> {
        if self.current.kind == TokenKind::Lambda {
            return self.parse_lambda();
        }
        let expr = self.parse_or_test()?;
        if self.current.kind == TokenKind::If {
            self.bump()?;
            let test = self.parse_or_test()?;
            self.expect(TokenKind::Else, "'else'")?;
            let orelse = self.parse_test()?;
            return Ok(self.arena.add(Node::IfExp {
                test,
                body: expr,
                orelse,
            }));
        }
        Ok(expr)
    }

    fn parse_lambda(&mut self) -> Result<NodeIndex, ParseError> {
        self.bump()?;
        let args = self.parse_params(TokenKind::Colon)?;
        self.expect(TokenKind::Colon, "':'")?;
        let body = self.parse_test()?;
        Ok(self.arena.add(Node::Lambda { args, body }))
    }

    fn parse_or_test(&mut self) -> Result<NodeIndex, ParseError> {
        let first = self.parse_and_test()?;
        if self.current.kind != TokenKind::Or {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(TokenKind::Or)? {
            values.push(self.parse_and_test()?);
        }
        Ok(self.arena.add(Node::BoolExpr {
            op: BoolOp::Or,
            values,
        }))
    }

    fn parse_and_test(&mut self) -> Result<NodeIndex, ParseError> {
        let first = self.parse_not_test()?;
        if self.current.kind != TokenKind::And {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(TokenKind::And)? {
            values.push(self.parse_not_test()?);
        }
        Ok(self.arena.add(Node::BoolExpr {
            op: BoolOp::And,
            values,
        }))
    }

    fn parse_not_test(&mut self) -> Result<NodeIndex, ParseError> {
        if self.eat(TokenKind::Not)? {
            let operand = self.parse_not_test()?;
            return Ok(self.arena.add(Node::UnaryExpr {
                op: UnaryOp::Not,
                operand,
            }));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<NodeIndex, ParseError> {
        let left = self.parse_bitor()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        loop {
            let op = if let Some(op) = simple_cmp_op(&self.current.kind) {
                self.bump()?;
                op
            } else if self.current.kind == TokenKind::In {
                self.bump()?;
                CmpOp::In
            } else if self.current.kind == TokenKind::Not {
                self.bump()?;
                self.expect(TokenKind::In, "'in'")?;
                CmpOp::NotIn
            } else if self.current.kind == TokenKind::Is {
                self.bump()?;
                if self.eat(TokenKind::Not)? {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                }
            } else {
                break;
            };
            ops.push(op);
            comparators.push(self.parse_bitor()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(self.arena.add(Node::Compare {
            left,
            ops,
            comparators,
        }))
    }

    fn parse_bitor(&mut self) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_bitxor()?;
        while self.eat(TokenKind::Pipe)? {
            let right = self.parse_bitxor()?;
            left = self.arena.add(Node::BinaryExpr {
                op: BinaryOp::BitOr,
                left,
                right,
            });
        }
        Ok(left)
    }

    fn parse_bitxor(&mut self) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_bitand()?;
        while self.eat(TokenKind::Caret)? {
            let right = self.parse_bitand()?;
            left = self.arena.add(Node::BinaryExpr {
                op: BinaryOp::BitXor,
                left,
                right,
            });
        }
        Ok(left)
    }

    fn parse_bitand(&mut self) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_arith()?;
        while self.eat(TokenKind::Amp)? {
            let right = self.parse_arith()?;
            left = self.arena.add(Node::BinaryExpr {
                op: BinaryOp::BitAnd,
                left,
                right,
            });
        }
        Ok(left)
    }

    fn parse_arith(&mut self) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_term()?;
            left = self.arena.add(Node::BinaryExpr { op, left, right });
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mult,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_factor()?;
            left = self.arena.add(Node::BinaryExpr { op, left, right });
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<NodeIndex, ParseError> {
        let op = match self.current.kind {
            TokenKind::Plus => Some(UnaryOp::UAdd),
            TokenKind::Minus => Some(UnaryOp::USub),
            _ => None,
        };
        if let Some(op) = op {
            self.bump()?;
            let operand = self.parse_factor()?;
            return Ok(self.arena.add(Node::UnaryExpr { op, operand }));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<NodeIndex, ParseError> {
        let base = self.parse_atom_expr()?;
        if self.eat(TokenKind::StarStar)? {
            let right = self.parse_factor()?;
            return Ok(self.arena.add(Node::BinaryExpr {
                op: BinaryOp::Pow,
                left: base,
                right,
            }));
        }
        Ok(base)
    }

    fn parse_atom_expr(&mut self) -> Result<NodeIndex, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.current.kind {
                TokenKind::LParen => {
                    self.bump()?;
                    let mut args = Vec::new();
                    while self.current.kind != TokenKind::RParen {
                        args.push(self.parse_test()?);
                        if !self.eat(TokenKind::Comma)? {
                            break;
                        }
                    }
                    self.expect(TokenKind::RParen, "')'")?;
                    expr = self.arena.add(Node::Call { func: expr, args });
                }
                TokenKind::Dot => {
                    self.bump()?;
                    let attr = self.expect_name()?;
                    expr = self.arena.add(Node::Attribute { value: expr, attr });
                }
                TokenKind::LBracket => {
                    self.bump()?;
                    let slice = self.parse_subscript()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = self.arena.add(Node::Subscript { value: expr, slice });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_subscript(&mut self) -> Result<NodeIndex, ParseError> {
        let lower = if self.current.kind == TokenKind::Colon {
            NodeIndex::NONE
        } else {
            self.parse_test()?
        };
        if self.eat(TokenKind::Colon)? {
            let upper = if matches!(self.current.kind, TokenKind::Colon | TokenKind::RBracket) {
                NodeIndex::NONE
            } else {
                self.parse_test()?
            };
            let step = if self.eat(TokenKind::Colon)? {
                if self.current.kind == TokenKind::RBracket {
                    NodeIndex::NONE
                } else {
                    self.parse_test()?
                }
            } else {
                NodeIndex::NONE
            };
            return Ok(self.arena.add(Node::Slice { lower, upper, step }));
        }
        Ok(self.arena.add(Node::Index { value: lower }))
    }

    fn parse_atom(&mut self) -> Result<NodeIndex, ParseError> {
        match self.current.kind {
            TokenKind::Name(_) => {
                let id = self.expect_name()?;
                Ok(self.arena.add(Node::Name { id }))
            }
            TokenKind::Number(_) => {
                let token = self.bump()?;
                match token.kind {
                    TokenKind::Number(text) => Ok(self.arena.add(Node::Number { text })),
                    _ => Err(self.unexpected("a number")),
                }
            }
            TokenKind::Str(_) => {
                let token = self.bump()?;
                match token.kind {
                    TokenKind::Str(value) => Ok(self.arena.add(Node::Str { value })),
                    _ => Err(self.unexpected("a string")),
                }
            }
            TokenKind::LParen => {
                self.bump()?;
                if self.eat(TokenKind::RParen)? {
                    return Ok(self.arena.add(Node::Tuple { elts: Vec::new() }));
                }
                let expr = self.parse_testlist()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.bump()?;
                let mut elts = Vec::new();
                while self.current.kind != TokenKind::RBracket {
                    elts.push(self.parse_test()?);
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(self.arena.add(Node::List { elts }))
            }
            TokenKind::LBrace => {
                self.bump()?;
                let mut keys = Vec::new();
                let mut values = Vec::new();
                while self.current.kind != TokenKind::RBrace {
                    keys.push(self.parse_test()?);
                    self.expect(TokenKind::Colon, "':'")?;
                    values.push(self.parse_test()?);
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(self.arena.add(Node::Dict { keys, values }))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}

fn simple_cmp_op(kind: &TokenKind) -> Option<CmpOp> {
    match kind {
        TokenKind::Lt => Some(CmpOp::Lt),
        TokenKind::LtEq => Some(CmpOp::LtE),
        TokenKind::Gt => Some(CmpOp::Gt),
        TokenKind::GtEq => Some(CmpOp::GtE),
        TokenKind::EqEq => Some(CmpOp::Eq),
        TokenKind::NotEq => Some(CmpOp::NotEq),
        _ => None,
    }
}

fn aug_assign_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusEq => Some(BinaryOp::Add),
        TokenKind::MinusEq => Some(BinaryOp::Sub),
        TokenKind::StarEq => Some(BinaryOp::Mult),
        TokenKind::SlashEq => Some(BinaryOp::Div),
        TokenKind::PercentEq => Some(BinaryOp::Mod),
        TokenKind::AmpEq => Some(BinaryOp::BitAnd),
        TokenKind::PipeEq => Some(BinaryOp::BitOr),
        TokenKind::CaretEq => Some(BinaryOp::BitXor),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> ParsedModule {
        parse(source).expect("parse should succeed")
    }

    fn module_body(module: &ParsedModule) -> &[NodeIndex] {
        match module.arena.get(module.root) {
            Some(Node::Module { body }) => body,
            other => panic!("expected module root, got {:?}", other),
        }
    }

    #[test]
    fn parses_assignment_chain() {
        let module = parse_ok("a = b = 1\n");
        let body = module_body(&module);
        assert_eq!(body.len(), 1);
        match module.arena.get(body[0]) {
            Some(Node::Assign { targets, value }) => {
                assert_eq!(targets.len(), 2);
                assert!(matches!(
                    module.arena.get(*value),
                    Some(Node::Number { text }) if text == "1"
                ));
            }
            other => panic!("expected assign, got {:?}", other),
        }
    }

    #[test]
    fn parses_tuple_assignment() {
        let module = parse_ok("a, b = 1, 2\n");
        let body = module_body(&module);
        match module.arena.get(body[0]) {
            Some(Node::Assign { targets, .. }) => {
                assert!(matches!(
                    module.arena.get(targets[0]),
                    Some(Node::Tuple { elts }) if elts.len() == 2
                ));
            }
            other => panic!("expected assign, got {:?}", other),
        }
    }

    #[test]
    fn elif_nests_as_single_if_orelse() {
        let module = parse_ok("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n");
        let body = module_body(&module);
        match module.arena.get(body[0]) {
            Some(Node::If { orelse, .. }) => {
                assert_eq!(orelse.len(), 1);
                assert!(matches!(
                    module.arena.get(orelse[0]),
                    Some(Node::If { orelse: inner, .. }) if !inner.is_empty()
                ));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn for_target_stops_at_in_keyword() {
        let module = parse_ok("for item in items:\n    pass\n");
        let body = module_body(&module);
        match module.arena.get(body[0]) {
            Some(Node::For { target, iter, .. }) => {
                assert_eq!(module.arena.name_text(*target), Some("item"));
                assert_eq!(module.arena.name_text(*iter), Some("items"));
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn for_tuple_target_over_enumerate() {
        let module = parse_ok("for i, item in enumerate(items):\n    pass\n");
        let body = module_body(&module);
        match module.arena.get(body[0]) {
            Some(Node::For { target, iter, .. }) => {
                assert!(matches!(
                    module.arena.get(*target),
                    Some(Node::Tuple { elts }) if elts.len() == 2
                ));
                assert!(matches!(module.arena.get(*iter), Some(Node::Call { .. })));
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn parses_comparison_chain() {
        let module = parse_ok("x = a < b < c\n");
        let compare = module
            .arena
            .nodes
            .iter()
            .find(|n| matches!(n, Node::Compare { .. }));
        match compare {
            Some(Node::Compare {
                ops, comparators, ..
            }) => {
                assert_eq!(ops, &[CmpOp::Lt, CmpOp::Lt]);
                assert_eq!(comparators.len(), 2);
            }
            other => panic!("expected compare, got {:?}", other),
        }
    }

    #[test]
    fn parses_not_in_and_is_not() {
        let module = parse_ok("x = a not in b\ny = a is not b\n");
        let ops: Vec<&Node> = module
            .arena
            .nodes
            .iter()
            .filter(|n| matches!(n, Node::Compare { .. }))
            .collect();
        assert!(matches!(
            ops[0],
            Node::Compare { ops, .. } if ops == &[CmpOp::NotIn]
        ));
        assert!(matches!(
            ops[1],
            Node::Compare { ops, .. } if ops == &[CmpOp::IsNot]
        ));
    }

    #[test]
    fn parses_def_with_defaults_and_catch_alls() {
        let module = parse_ok("def f(a, b=2, *rest):\n    pass\n");
        let args_node = module
            .arena
            .nodes
            .iter()
            .find(|n| matches!(n, Node::Arguments { .. }));
        match args_node {
            Some(Node::Arguments {
                args,
                defaults,
                vararg,
                kwarg,
            }) => {
                assert_eq!(args.len(), 2);
                assert_eq!(defaults.len(), 1);
                assert_eq!(vararg.as_deref(), Some("rest"));
                assert!(kwarg.is_none());
            }
            other => panic!("expected arguments, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_default_after_default() {
        let err = parse("def f(a=1, b):\n    pass\n").expect_err("expected parse failure");
        assert!(err.message.contains("non-default argument"));
    }

    #[test]
    fn parses_slice_forms() {
        let module = parse_ok("a = x[1:3]\nb = x[:]\nc = x[::2]\nd = x[0]\n");
        let slices = module
            .arena
            .nodes
            .iter()
            .filter(|n| matches!(n, Node::Slice { .. }))
            .count();
        let indexes = module
            .arena
            .nodes
            .iter()
            .filter(|n| matches!(n, Node::Index { .. }))
            .count();
        assert_eq!(slices, 3);
        assert_eq!(indexes, 1);
    }

    #[test]
    fn parses_lambda() {
        let module = parse_ok("f = lambda x, y: x + y\n");
        assert!(
            module
                .arena
                .nodes
                .iter()
                .any(|n| matches!(n, Node::Lambda { .. }))
        );
    }

    #[test]
    fn parses_ternary() {
        let module = parse_ok("x = a if c else b\n");
        assert!(
            module
                .arena
                .nodes
                .iter()
                .any(|n| matches!(n, Node::IfExp { .. }))
        );
    }

    #[test]
    fn parses_try_with_handler_bodies() {
        let module = parse_ok("try:\n    a = 1\nexcept ValueError as e:\n    b = 2\nfinally:\n    c = 3\n");
        match module
            .arena
            .nodes
            .iter()
            .find(|n| matches!(n, Node::Try { .. }))
        {
            Some(Node::Try {
                handlers,
                finalbody,
                ..
            }) => {
                assert_eq!(handlers.len(), 1);
                assert_eq!(finalbody.len(), 1);
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    #[test]
    fn parses_import_with_alias() {
        let module = parse_ok("import os.path as p, sys\n");
        match module
            .arena
            .nodes
            .iter()
            .find(|n| matches!(n, Node::Import { .. }))
        {
            Some(Node::Import { names }) => {
                assert_eq!(names[0].name, "os.path");
                assert_eq!(names[0].asname.as_deref(), Some("p"));
                assert_eq!(names[1].name, "sys");
                assert!(names[1].asname.is_none());
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn reports_position_on_error() {
        let err = parse("a = \n").expect_err("expected parse failure");
        assert_eq!(err.line, 1);
        assert!(err.message.contains("Expected an expression"));
    }
}
