//! AST node types.
//!
//! Nodes live in a [`NodeArena`](crate::NodeArena) and reference each other
//! by index, never by pointer. The `Node` enum is closed: every supported
//! source construct has exactly one variant, so consumers match
//! exhaustively and new kinds cannot slip through unhandled.

use serde::Serialize;

/// Index of a node in the arena. `NodeIndex::NONE` marks an absent child
/// (e.g. a slice without an upper bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }
}

/// One imported module binding: `import a.b as c`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportAlias {
    pub name: String,
    pub asname: Option<String>,
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn js_text(self) -> &'static str {
        match self {
            BoolOp::And => "&&",
            BoolOp::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    UAdd,
    USub,
    Not,
}

impl UnaryOp {
    pub fn js_text(self) -> &'static str {
        match self {
            UnaryOp::UAdd => "+",
            UnaryOp::USub => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Pow,
    FloorDiv,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    /// Target-language spelling, or `None` when the operator has no
    /// one-to-one JavaScript equivalent.
    pub fn js_text(self) -> Option<&'static str> {
        match self {
            BinaryOp::Add => Some("+"),
            BinaryOp::Sub => Some("-"),
            BinaryOp::Mult => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::BitAnd => Some("&"),
            BinaryOp::BitOr => Some("|"),
            BinaryOp::BitXor => Some("^"),
            BinaryOp::Mod | BinaryOp::Pow | BinaryOp::FloorDiv => None,
        }
    }

    /// Source-language spelling, for error messages.
    pub fn py_text(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::FloorDiv => "//",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
        }
    }
}

/// Comparison operators, including the chained forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpOp {
    Lt,
    LtE,
    Gt,
    GtE,
    Eq,
    NotEq,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOp {
    /// Target-language spelling. `is`/`!is` are literal placeholders that
    /// require manual follow-up; `not in` has no spelling at all.
    pub fn js_text(self) -> Option<&'static str> {
        match self {
            CmpOp::Lt => Some("<"),
            CmpOp::LtE => Some("<="),
            CmpOp::Gt => Some(">"),
            CmpOp::GtE => Some(">="),
            CmpOp::Eq => Some("=="),
            CmpOp::NotEq => Some("!="),
            CmpOp::In => Some("in"),
            CmpOp::Is => Some("is"),
            CmpOp::IsNot => Some("!is"),
            CmpOp::NotIn => None,
        }
    }

    pub fn py_text(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        }
    }
}

/// A syntax tree node. Child links are `NodeIndex` values into the owning
/// arena; statement sequences are ordered `Vec<NodeIndex>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Module {
        body: Vec<NodeIndex>,
    },
    FunctionDef {
        name: String,
        args: NodeIndex,
        body: Vec<NodeIndex>,
    },
    Lambda {
        args: NodeIndex,
        body: NodeIndex,
    },
    Arguments {
        args: Vec<NodeIndex>,
        defaults: Vec<NodeIndex>,
        vararg: Option<String>,
        kwarg: Option<String>,
    },
    Name {
        id: String,
    },
    IfExp {
        test: NodeIndex,
        body: NodeIndex,
        orelse: NodeIndex,
    },
    While {
        test: NodeIndex,
        body: Vec<NodeIndex>,
        orelse: Vec<NodeIndex>,
    },
    For {
        target: NodeIndex,
        iter: NodeIndex,
        body: Vec<NodeIndex>,
        orelse: Vec<NodeIndex>,
    },
    If {
        test: NodeIndex,
        body: Vec<NodeIndex>,
        orelse: Vec<NodeIndex>,
    },
    Pass,
    Break,
    Continue,
    Index {
        value: NodeIndex,
    },
    Slice {
        lower: NodeIndex,
        upper: NodeIndex,
        step: NodeIndex,
    },
    Subscript {
        value: NodeIndex,
        slice: NodeIndex,
    },
    Yield {
        value: NodeIndex,
    },
    Compare {
        left: NodeIndex,
        ops: Vec<CmpOp>,
        comparators: Vec<NodeIndex>,
    },
    Return {
        value: NodeIndex,
    },
    AugAssign {
        target: NodeIndex,
        op: BinaryOp,
        value: NodeIndex,
    },
    Assign {
        targets: Vec<NodeIndex>,
        value: NodeIndex,
    },
    Delete {
        targets: Vec<NodeIndex>,
    },
    Number {
        text: String,
    },
    List {
        elts: Vec<NodeIndex>,
    },
    ExprStatement {
        value: NodeIndex,
    },
    Tuple {
        elts: Vec<NodeIndex>,
    },
    Dict {
        keys: Vec<NodeIndex>,
        values: Vec<NodeIndex>,
    },
    Raise {
        exc: NodeIndex,
    },
    Global {
        names: Vec<String>,
    },
    Attribute {
        value: NodeIndex,
        attr: String,
    },
    Call {
        func: NodeIndex,
        args: Vec<NodeIndex>,
    },
    UnaryExpr {
        op: UnaryOp,
        operand: NodeIndex,
    },
    BinaryExpr {
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
    },
    BoolExpr {
        op: BoolOp,
        values: Vec<NodeIndex>,
    },
    Str {
        value: String,
    },
    Import {
        names: Vec<ImportAlias>,
    },
    Try {
        body: Vec<NodeIndex>,
        handlers: Vec<NodeIndex>,
        orelse: Vec<NodeIndex>,
        finalbody: Vec<NodeIndex>,
    },
    ExceptHandler {
        kind: NodeIndex,
        name: Option<String>,
        body: Vec<NodeIndex>,
    },
    With {
        context: NodeIndex,
        optional_vars: NodeIndex,
        body: Vec<NodeIndex>,
    },
}

impl Node {
    /// Name of the node kind, used in unsupported-construct errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Module { .. } => "Module",
            Node::FunctionDef { .. } => "FunctionDef",
            Node::Lambda { .. } => "Lambda",
            Node::Arguments { .. } => "Arguments",
            Node::Name { .. } => "Name",
            Node::IfExp { .. } => "IfExp",
            Node::While { .. } => "While",
            Node::For { .. } => "For",
            Node::If { .. } => "If",
            Node::Pass => "Pass",
            Node::Break => "Break",
            Node::Continue => "Continue",
            Node::Index { .. } => "Index",
            Node::Slice { .. } => "Slice",
            Node::Subscript { .. } => "Subscript",
            Node::Yield { .. } => "Yield",
            Node::Compare { .. } => "Compare",
            Node::Return { .. } => "Return",
            Node::AugAssign { .. } => "AugAssign",
            Node::Assign { .. } => "Assign",
            Node::Delete { .. } => "Delete",
            Node::Number { .. } => "Number",
            Node::List { .. } => "List",
            Node::ExprStatement { .. } => "ExprStatement",
            Node::Tuple { .. } => "Tuple",
            Node::Dict { .. } => "Dict",
            Node::Raise { .. } => "Raise",
            Node::Global { .. } => "Global",
            Node::Attribute { .. } => "Attribute",
            Node::Call { .. } => "Call",
            Node::UnaryExpr { .. } => "UnaryOp",
            Node::BinaryExpr { .. } => "BinOp",
            Node::BoolExpr { .. } => "BoolOp",
            Node::Str { .. } => "Str",
            Node::Import { .. } => "Import",
            Node::Try { .. } => "Try",
            Node::ExceptHandler { .. } => "ExceptHandler",
            Node::With { .. } => "With",
        }
    }
}
