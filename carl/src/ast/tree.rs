//! Arena-backed expression trees
//!
//! Every node of an [`ExprTree`] lives in a single `Vec<Node>` and is addressed
//! by a [`NodeId`]. Child links are ids owned by the parent; each node also
//! records its parent id so a subtree can be spliced out and replaced without
//! re-walking from the root.
//!
//! Invariants maintained by every mutating operation:
//! - a node reachable from the root has exactly one parent, and that parent's
//!   child slot points back at it;
//! - the root has no parent;
//! - nodes are only ever attached while detached, so no node is shared and no
//!   cycle can form.
//!
//! Splicing may leave unreachable nodes behind in the arena; [`ExprTree::compact`]
//! and `Clone` rebuild a tree containing only the reachable nodes.

use super::{BinOp, Literal, LiteralKind, Span, UnOp};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Literal(Literal),
    Binary {
        left: NodeId,
        op: BinOp,
        right: NodeId,
    },
    Unary {
        op: UnOp,
        operand: NodeId,
    },
}

/// Child slot of an interior node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChildSlot {
    Left,
    Right,
    Operand,
}

impl std::fmt::Display for ChildSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChildSlot::Left => write!(f, "left"),
            ChildSlot::Right => write!(f, "right"),
            ChildSlot::Operand => write!(f, "operand"),
        }
    }
}

/// A node in the arena
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Literal payload, if this is a leaf
    pub fn literal(&self) -> Option<&Literal> {
        match &self.kind {
            NodeKind::Literal(literal) => Some(literal),
            NodeKind::Binary { .. } | NodeKind::Unary { .. } => None,
        }
    }

    fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        let (first, second) = match self.kind {
            NodeKind::Literal(_) => (None, None),
            NodeKind::Binary { left, right, .. } => (Some(left), Some(right)),
            NodeKind::Unary { operand, .. } => (Some(operand), None),
        };
        first.into_iter().chain(second)
    }

    fn remap(&self, map: impl Fn(NodeId) -> NodeId) -> NodeKind {
        match &self.kind {
            NodeKind::Literal(literal) => NodeKind::Literal(literal.clone()),
            NodeKind::Binary { left, op, right } => NodeKind::Binary {
                left: map(*left),
                op: *op,
                right: map(*right),
            },
            NodeKind::Unary { op, operand } => NodeKind::Unary {
                op: *op,
                operand: map(*operand),
            },
        }
    }
}

/// Structural inconsistencies. These indicate a logic defect in a tree
/// consumer, never a problem with user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is a literal and has no child slots")]
    LeafParent(NodeId),

    #[error("node {parent} has no {slot} slot")]
    NoSuchSlot { parent: NodeId, slot: ChildSlot },

    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),

    #[error("attaching node {child} under node {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("node {child} records parent {recorded:?} but hangs under {actual:?}")]
    ParentMismatch {
        child: NodeId,
        recorded: Option<NodeId>,
        actual: Option<NodeId>,
    },
}

/// An expression tree
#[derive(Debug, Serialize)]
pub struct ExprTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ExprTree {
    /// Single literal leaf
    pub fn literal(kind: LiteralKind, text: impl Into<String>, span: Span) -> Self {
        Self::leaf(Literal::new(kind, text), span)
    }

    pub fn leaf(literal: Literal, span: Span) -> Self {
        let node = Node {
            kind: NodeKind::Literal(literal),
            span,
            parent: None,
        };
        ExprTree {
            nodes: vec![node],
            root: NodeId(0),
        }
    }

    /// `left op right`, taking ownership of both operand trees
    pub fn binary(left: ExprTree, op: BinOp, span: Span, right: ExprTree) -> Self {
        let mut tree = left;
        let left = tree.root;
        let right = tree.adopt(right);
        let id = tree.push(NodeKind::Binary { left, op, right }, span);
        tree.nodes[left.0].parent = Some(id);
        tree.nodes[right.0].parent = Some(id);
        tree.root = id;
        tree
    }

    /// `op operand`, taking ownership of the operand tree
    pub fn unary(op: UnOp, span: Span, operand: ExprTree) -> Self {
        let mut tree = operand;
        let operand = tree.root;
        let id = tree.push(NodeKind::Unary { op, operand }, span);
        tree.nodes[operand.0].parent = Some(id);
        tree.root = id;
        tree
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Number of nodes reachable from the root
    pub fn size(&self) -> usize {
        self.post_order().len()
    }

    /// Number of nodes held by the arena, including any left unreachable by splicing
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids of the whole tree, children before parents, left before right
    pub fn post_order(&self) -> Vec<NodeId> {
        self.post_order_from(self.root)
    }

    /// Node ids of the subtree rooted at `start`, in post-order
    pub fn post_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(start, false)];
        while let Some((id, expanded)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if expanded {
                order.push(id);
            } else {
                stack.push((id, true));
                for child in node.children().rev() {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// Move every node of `other` into this arena. The returned id is the
    /// root of the adopted subtree, which is left detached.
    pub fn adopt(&mut self, other: ExprTree) -> NodeId {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);
        for node in other.nodes {
            let kind = node.remap(shift);
            self.nodes.push(Node {
                kind,
                span: node.span,
                parent: node.parent.map(shift),
            });
        }
        let root = shift(other.root);
        self.nodes[root.0].parent = None;
        root
    }

    /// Independent tree holding a copy of the subtree rooted at `id`
    pub fn subtree(&self, id: NodeId) -> ExprTree {
        let mut remapped: HashMap<NodeId, NodeId> = HashMap::new();
        let mut nodes: Vec<Node> = Vec::new();
        for old in self.post_order_from(id) {
            let node = &self.nodes[old.0];
            let new = NodeId(nodes.len());
            let kind = node.remap(|child| remapped.get(&child).copied().unwrap_or(child));
            for child in node.children() {
                if let Some(copied) = remapped.get(&child) {
                    nodes[copied.0].parent = Some(new);
                }
            }
            nodes.push(Node {
                kind,
                span: node.span,
                parent: None,
            });
            remapped.insert(old, new);
        }
        let root = remapped.get(&id).copied().unwrap_or(NodeId(0));
        ExprTree { nodes, root }
    }

    /// Duplicate the subtree rooted at `id` inside this arena, detached
    pub fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let copy = self.subtree(id);
        self.adopt(copy)
    }

    /// Drop every node no longer reachable from the root
    pub fn compact(self) -> ExprTree {
        self.subtree(self.root)
    }

    fn check_node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Attach the detached node `child` in `slot` of `parent`.
    ///
    /// Returns the displaced child, which is left detached.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        slot: ChildSlot,
        child: NodeId,
    ) -> Result<NodeId, TreeError> {
        self.check_node(parent)?;
        if self.check_node(child)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(TreeError::Cycle { parent, child });
            }
            cursor = self.nodes[ancestor.0].parent;
        }

        let old = match (&mut self.nodes[parent.0].kind, slot) {
            (NodeKind::Binary { left, .. }, ChildSlot::Left) => std::mem::replace(left, child),
            (NodeKind::Binary { right, .. }, ChildSlot::Right) => std::mem::replace(right, child),
            (NodeKind::Unary { operand, .. }, ChildSlot::Operand) => {
                std::mem::replace(operand, child)
            }
            (NodeKind::Literal(_), _) => return Err(TreeError::LeafParent(parent)),
            _ => return Err(TreeError::NoSuchSlot { parent, slot }),
        };
        self.nodes[old.0].parent = None;
        self.nodes[child.0].parent = Some(parent);
        Ok(old)
    }

    pub fn set_left(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        self.set_child(parent, ChildSlot::Left, child)
    }

    pub fn set_right(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        self.set_child(parent, ChildSlot::Right, child)
    }

    pub fn set_operand(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        self.set_child(parent, ChildSlot::Operand, child)
    }

    /// Which slot of `parent` holds `child`
    pub fn slot_of(&self, parent: NodeId, child: NodeId) -> Result<ChildSlot, TreeError> {
        match self.check_node(parent)?.kind {
            NodeKind::Binary { left, .. } if left == child => Ok(ChildSlot::Left),
            NodeKind::Binary { right, .. } if right == child => Ok(ChildSlot::Right),
            NodeKind::Unary { operand, .. } if operand == child => Ok(ChildSlot::Operand),
            NodeKind::Literal(_) => Err(TreeError::LeafParent(parent)),
            NodeKind::Binary { .. } | NodeKind::Unary { .. } => {
                Err(TreeError::NotAChild { parent, child })
            }
        }
    }

    /// Put the detached node `new` where `old` currently hangs under `parent`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let slot = self.slot_of(parent, old)?;
        self.set_child(parent, slot, new)?;
        Ok(())
    }

    /// Make the detached node `id` the root. Returns the previous root.
    pub fn set_root(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        if self.check_node(id)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }
        Ok(std::mem::replace(&mut self.root, id))
    }

    /// Check that every reachable node agrees with its parent about the link
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.check_node(self.root)?;
        if root.parent.is_some() {
            return Err(TreeError::ParentMismatch {
                child: self.root,
                recorded: root.parent,
                actual: None,
            });
        }
        for id in self.post_order() {
            for child in self.nodes[id.0].children() {
                let recorded = self.check_node(child)?.parent;
                if recorded != Some(id) {
                    return Err(TreeError::ParentMismatch {
                        child,
                        recorded,
                        actual: Some(id),
                    });
                }
            }
        }
        Ok(())
    }

    /// Structural equality of the subtree at `a` in `self` and the subtree
    /// at `b` in `other`. Spans are ignored.
    pub fn same_shape(&self, a: NodeId, other: &ExprTree, b: NodeId) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            let (Some(x), Some(y)) = (self.get(a), other.get(b)) else {
                return false;
            };
            match (&x.kind, &y.kind) {
                (NodeKind::Literal(l), NodeKind::Literal(r)) => {
                    if l != r {
                        return false;
                    }
                }
                (
                    NodeKind::Binary { left: ll, op: lop, right: lr },
                    NodeKind::Binary { left: rl, op: rop, right: rr },
                ) => {
                    if lop != rop {
                        return false;
                    }
                    pending.push((*ll, *rl));
                    pending.push((*lr, *rr));
                }
                (
                    NodeKind::Unary { op: lop, operand: lo },
                    NodeKind::Unary { op: rop, operand: ro },
                ) => {
                    if lop != rop {
                        return false;
                    }
                    pending.push((*lo, *ro));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Clone for ExprTree {
    /// Deep copy holding only the reachable nodes, with fresh parent links
    fn clone(&self) -> Self {
        self.subtree(self.root)
    }
}

impl PartialEq for ExprTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(self.root, other, other.root)
    }
}

impl std::fmt::Display for ExprTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::AstPrinter::print(self))
    }
}
