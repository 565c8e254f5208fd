//! Variable-declaration hoisting pre-pass.
//!
//! Before a statement sequence is printed, every name assigned anywhere in
//! the scope (one function body, or the module body) is attributed to an
//! anchor statement: the statement in front of which its declaration must
//! appear so that the declaration dominates every assignment. For a name
//! assigned once, the anchor is the assignment itself. For a name assigned
//! in several places, the anchor is the last shared element of the
//! statement paths leading to those assignments.
//!
//! Nested function bodies are opaque: they are separate scopes with their
//! own pass. A `global` declaration empties the name's path, which removes
//! it from the map entirely; no declaration is ever emitted for it.

use pyjs_parser::{Node, NodeArena, NodeIndex};
use rustc_hash::FxHashMap;

/// Anchor statement to the names declared immediately before it, in
/// first-assignment order.
pub type HoistMap = FxHashMap<NodeIndex, Vec<String>>;

pub fn hoisted_locals(arena: &NodeArena, body: &[NodeIndex]) -> HoistMap {
    let mut collector = Collector {
        arena,
        path: Vec::new(),
        names: Vec::new(),
    };
    collector.walk_body(body);

    let mut map = HoistMap::default();
    for (name, path) in collector.names {
        if let Some(&anchor) = path.last() {
            map.entry(anchor).or_default().push(name);
        }
    }
    map
}

struct Collector<'a> {
    arena: &'a NodeArena,
    /// Stack of statements from the scope root to the current position.
    /// Statements of a body stay pushed until the body is exited, so two
    /// assignments in the same body share a prefix ending at the first one.
    path: Vec<NodeIndex>,
    /// Name to its narrowed path, in first-assignment order.
    names: Vec<(String, Vec<NodeIndex>)>,
}

impl Collector<'_> {
    fn walk_body(&mut self, body: &[NodeIndex]) {
        let depth = self.path.len();
        for &stmt in body {
            self.path.push(stmt);
            self.walk_statement(stmt);
        }
        self.path.truncate(depth);
    }

    fn walk_statement(&mut self, stmt: NodeIndex) {
        match self.arena.get(stmt) {
            Some(Node::Assign { targets, .. }) => {
                for &target in targets {
                    self.record_target(target);
                }
            }
            Some(Node::If { body, orelse, .. })
            | Some(Node::While { body, orelse, .. })
            | Some(Node::For { body, orelse, .. }) => {
                self.walk_body(body);
                self.walk_body(orelse);
            }
            Some(Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            }) => {
                self.walk_body(body);
                for &handler in handlers {
                    if let Some(Node::ExceptHandler { body, .. }) = self.arena.get(handler) {
                        self.walk_body(body);
                    }
                }
                self.walk_body(finalbody);
                self.walk_body(orelse);
            }
            Some(Node::With { body, .. }) => self.walk_body(body),
            Some(Node::Global { names }) => {
                for name in names {
                    self.mark_global(name);
                }
            }
            // Function bodies are their own scope; everything else binds
            // nothing at statement level.
            _ => {}
        }
    }

    fn record_target(&mut self, target: NodeIndex) {
        match self.arena.get(target) {
            Some(Node::Name { id }) => self.record_name(id),
            Some(Node::Tuple { elts }) | Some(Node::List { elts }) => {
                for &elt in elts {
                    self.record_target(elt);
                }
            }
            // Attribute and subscript targets do not introduce locals.
            _ => {}
        }
    }

    fn record_name(&mut self, id: &str) {
        if let Some((_, path)) = self.names.iter_mut().find(|(name, _)| name == id) {
            let shared = path
                .iter()
                .zip(self.path.iter())
                .take_while(|(a, b)| a == b)
                .count();
            path.truncate(shared);
        } else {
            self.names.push((id.to_string(), self.path.clone()));
        }
    }

    fn mark_global(&mut self, id: &str) {
        if let Some((_, path)) = self.names.iter_mut().find(|(name, _)| name == id) {
            path.clear();
        } else {
            self.names.push((id.to_string(), Vec::new()));
        }
    }
}
