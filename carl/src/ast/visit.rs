//! Node-kind dispatch for tree consumers
//!
//! The node kind set is closed, so dispatch is a `match` on [`NodeKind`]
//! rather than per-type virtual calls. Walks are post-order and iterative;
//! a visitor stops a walk early by returning `ControlFlow::Break`.

use super::{BinOp, ExprTree, Literal, NodeId, NodeKind, Span, UnOp};
use std::ops::ControlFlow;

/// Handler invoked once per node, after all of the node's children
pub trait Visitor {
    type Break;

    fn visit_literal(
        &mut self,
        id: NodeId,
        literal: &Literal,
        span: Span,
    ) -> ControlFlow<Self::Break>;

    fn visit_binary(&mut self, id: NodeId, op: BinOp, span: Span) -> ControlFlow<Self::Break>;

    fn visit_unary(&mut self, id: NodeId, op: UnOp, span: Span) -> ControlFlow<Self::Break>;
}

impl ExprTree {
    /// Dispatch a single node to `visitor`
    pub fn accept<V: Visitor>(&self, id: NodeId, visitor: &mut V) -> ControlFlow<V::Break> {
        let node = self.node(id);
        match node.kind() {
            NodeKind::Literal(literal) => visitor.visit_literal(id, literal, node.span()),
            NodeKind::Binary { op, .. } => visitor.visit_binary(id, *op, node.span()),
            NodeKind::Unary { op, .. } => visitor.visit_unary(id, *op, node.span()),
        }
    }

    /// Visit the whole tree in post-order
    pub fn walk<V: Visitor>(&self, visitor: &mut V) -> ControlFlow<V::Break> {
        self.walk_from(self.root(), visitor)
    }

    /// Visit the subtree rooted at `start` in post-order
    pub fn walk_from<V: Visitor>(&self, start: NodeId, visitor: &mut V) -> ControlFlow<V::Break> {
        for id in self.post_order_from(start) {
            self.accept(id, visitor)?;
        }
        ControlFlow::Continue(())
    }
}
