//! Arena-allocated AST and recursive-descent parser.
//!
//! [`parse`] turns source text into a [`ParsedModule`]: a flat [`NodeArena`]
//! plus the root node index. All child links are [`NodeIndex`] values, so
//! consumers walk the tree without lifetimes or boxing.

mod arena;
mod ast;
mod parser;

pub use arena::NodeArena;
pub use ast::{BinaryOp, BoolOp, CmpOp, ImportAlias, Node, NodeIndex, UnaryOp};
pub use parser::{parse, ParseError, ParsedModule, Parser};
