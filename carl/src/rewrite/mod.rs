//! Term rewriting
//!
//! [`substitute`] replaces the first occurrence of a pattern in a source tree
//! with a replacement tree, in three linear phases:
//!
//! 1. the pattern is linearized in post-order;
//! 2. the source is walked in post-order, and after every node the newest
//!    stretch of the walk is compared against the pattern sequence;
//! 3. the replacement is moved into the source arena, its variables are
//!    resolved to copies of the subtrees they matched, and it is spliced in
//!    where the match was found.
//!
//! String literals in a pattern are variables. A variable matches any
//! subtree; a variable repeated within one pattern must match structurally
//! equal subtrees at every occurrence.

use crate::ast::{BinOp, ExprTree, Literal, NodeId, NodeKind, Span, TreeError, UnOp, Visitor};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// One element of a linearized pattern
#[derive(Debug, Clone, Copy, PartialEq)]
enum Element<'p> {
    Variable(&'p str),
    Literal(&'p Literal),
    Binary(BinOp),
    Unary(UnOp),
}

fn linearize(pattern: &ExprTree) -> Vec<Element<'_>> {
    pattern
        .post_order()
        .into_iter()
        .map(|id| match pattern.node(id).kind() {
            NodeKind::Literal(literal) if literal.is_variable() => Element::Variable(&literal.text),
            NodeKind::Literal(literal) => Element::Literal(literal),
            NodeKind::Binary { op, .. } => Element::Binary(*op),
            NodeKind::Unary { op, .. } => Element::Unary(*op),
        })
        .collect()
}

/// The first place a pattern occurs in a source tree
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'p> {
    /// Root of the matched source subtree
    pub target: NodeId,
    /// Variable name to the source subtree it matched
    pub bindings: HashMap<&'p str, NodeId>,
}

/// Streaming matcher driven by a post-order walk of the source.
///
/// `seen` holds the source nodes in visit order and `sizes[i]` the node
/// count of the subtree rooted at `seen[i]`, so the subtree of `seen[i]`
/// occupies positions `i + 1 - sizes[i] ..= i`.
struct Scanner<'s, 'p> {
    source: &'s ExprTree,
    pattern: &'s [Element<'p>],
    seen: Vec<NodeId>,
    sizes: Vec<usize>,
}

impl<'s, 'p> Scanner<'s, 'p> {
    fn new(source: &'s ExprTree, pattern: &'s [Element<'p>]) -> Self {
        Scanner {
            source,
            pattern,
            seen: Vec::new(),
            sizes: Vec::new(),
        }
    }

    fn push(&mut self, id: NodeId, size: usize) -> ControlFlow<Match<'p>> {
        self.seen.push(id);
        self.sizes.push(size);
        match self.match_at(self.seen.len() - 1) {
            Some(found) => ControlFlow::Break(found),
            None => ControlFlow::Continue(()),
        }
    }

    fn last_size(&self, back: usize) -> usize {
        self.sizes
            .len()
            .checked_sub(back + 1)
            .and_then(|i| self.sizes.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Compare the pattern, walking backwards from its root, with the source
    /// walking backwards from position `end`
    fn match_at(&self, end: usize) -> Option<Match<'p>> {
        let mut bindings: HashMap<&'p str, NodeId> = HashMap::new();
        let mut cursor = Some(end);

        for element in self.pattern.iter().rev() {
            let at = cursor?;
            let id = self.seen[at];
            let consumed = match *element {
                Element::Variable(name) => {
                    if let Some(&bound) = bindings.get(name) {
                        if !self.source.same_shape(bound, self.source, id) {
                            return None;
                        }
                    }
                    // post-order visits left to right, so walking backwards
                    // binds the rightmost occurrence; equality makes it moot
                    bindings.insert(name, id);
                    self.sizes[at]
                }
                Element::Literal(expected) => {
                    if self.source.node(id).literal() != Some(expected) {
                        return None;
                    }
                    1
                }
                Element::Binary(expected) => match self.source.node(id).kind() {
                    NodeKind::Binary { op, .. } if *op == expected => 1,
                    _ => return None,
                },
                Element::Unary(expected) => match self.source.node(id).kind() {
                    NodeKind::Unary { op, .. } if *op == expected => 1,
                    _ => return None,
                },
            };
            cursor = at.checked_sub(consumed);
        }

        Some(Match {
            target: self.seen[end],
            bindings,
        })
    }
}

impl<'p> Visitor for Scanner<'_, 'p> {
    type Break = Match<'p>;

    fn visit_literal(&mut self, id: NodeId, _: &Literal, _: Span) -> ControlFlow<Match<'p>> {
        self.push(id, 1)
    }

    fn visit_binary(&mut self, id: NodeId, _: BinOp, _: Span) -> ControlFlow<Match<'p>> {
        let right = self.last_size(0);
        let left = self.last_size(right);
        self.push(id, 1 + left + right)
    }

    fn visit_unary(&mut self, id: NodeId, _: UnOp, _: Span) -> ControlFlow<Match<'p>> {
        let operand = self.last_size(0);
        self.push(id, 1 + operand)
    }
}

/// First occurrence of `pattern` in `source`, in post-order
pub fn find_match<'p>(source: &ExprTree, pattern: &'p ExprTree) -> Option<Match<'p>> {
    let elements = linearize(pattern);
    let mut scanner = Scanner::new(source, &elements);
    match source.walk(&mut scanner) {
        ControlFlow::Break(found) => Some(found),
        ControlFlow::Continue(()) => None,
    }
}

/// Rewrite the first occurrence of `pattern` in `source` with `replacement`.
///
/// Takes ownership of all three trees; callers holding a stored rule pass
/// copies. Without a match, `source` is returned unchanged.
///
/// # Errors
///
/// A [`TreeError`] means a structural invariant broke during the splice.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source, pattern = %pattern))]
pub fn substitute(
    source: ExprTree,
    pattern: ExprTree,
    replacement: ExprTree,
) -> Result<ExprTree, TreeError> {
    let Some(found) = find_match(&source, &pattern) else {
        tracing::debug!("no match");
        return Ok(source);
    };
    tracing::debug!(node = %found.target, bindings = found.bindings.len(), "matched");

    let bindings: HashMap<String, NodeId> = found
        .bindings
        .into_iter()
        .map(|(name, id)| (name.to_string(), id))
        .collect();
    splice(source, found.target, &bindings, replacement)
}

fn splice(
    mut tree: ExprTree,
    target: NodeId,
    bindings: &HashMap<String, NodeId>,
    replacement: ExprTree,
) -> Result<ExprTree, TreeError> {
    let splice_parent = tree.parent(target);
    let mut resolved = tree.adopt(replacement);

    let variables: Vec<(NodeId, NodeId)> = tree
        .post_order_from(resolved)
        .into_iter()
        .filter_map(|id| {
            let literal = tree.node(id).literal().filter(|lit| lit.is_variable())?;
            bindings.get(&literal.text).map(|&bound| (id, bound))
        })
        .collect();

    for (variable, bound) in variables {
        let copy = tree.copy_subtree(bound);
        match tree.parent(variable) {
            Some(parent) => tree.replace_child(parent, variable, copy)?,
            None => resolved = copy,
        }
    }

    match splice_parent {
        Some(parent) => tree.replace_child(parent, target, resolved)?,
        None => {
            tree.set_root(resolved)?;
        }
    }

    let result = tree.compact();
    tracing::debug!(result = %result, "rewritten");
    Ok(result)
}
