//! Variable classification.
//!
//! Every variable reference in the packet language belongs to exactly one [`VariableKind`],
//! decided by syntax alone: field access is a packet field, a plain name is a state scalar
//! and an indexed name is a state array (keyed by the array name, whatever the index).
use std::collections::BTreeSet;

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::Node;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariableKind {
    PacketField,
    StateScalar,
    StateArray,
}

impl VariableKind {
    /// Classify a reference node. Returns `None` for nodes that are not references.
    pub fn of(node: &Node) -> Option<Self> {
        match node {
            Node::Member { .. } => Some(VariableKind::PacketField),
            Node::DeclRef(_) => Some(VariableKind::StateScalar),
            Node::ArraySubscript { .. } => Some(VariableKind::StateArray),
            _ => None,
        }
    }

    /// Singleton flag set for this kind.
    pub fn flag(self) -> VariableKinds {
        match self {
            VariableKind::PacketField => VariableKinds::PACKET_FIELD,
            VariableKind::StateScalar => VariableKinds::STATE_SCALAR,
            VariableKind::StateArray => VariableKinds::STATE_ARRAY,
        }
    }
}

bitflags! {
    /// Set of enabled variable kinds for classification and renaming queries.
    #[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct VariableKinds: u8 {
        const PACKET_FIELD = 1 << 0;
        const STATE_SCALAR = 1 << 1;
        const STATE_ARRAY = 1 << 2;

        const STATE = Self::STATE_SCALAR.bits() | Self::STATE_ARRAY.bits();
        const ALL = Self::PACKET_FIELD.bits() | Self::STATE.bits();
    }
}

impl VariableKinds {
    pub fn enables(&self, kind: VariableKind) -> bool {
        self.contains(kind.flag())
    }
}

/// Textual form of a variable reference (`p.dst_port`, `counter`, `table`).
///
/// Two references denote the same variable iff their canonical names are equal.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanonicalName(pub String);

impl CanonicalName {
    /// Canonical name of a reference node, `None` if the node is not a reference.
    pub fn of(node: &Node) -> Option<Self> {
        match node {
            Node::Member { base, field } => Some(CanonicalName(format!("{}.{}", base, field))),
            Node::DeclRef(name) => Some(CanonicalName(name.clone())),
            Node::ArraySubscript { array, .. } => Some(CanonicalName(array.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CanonicalName {
    fn from(value: &str) -> Self {
        CanonicalName(value.to_string())
    }
}

impl std::fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthetic identifier substituted for a variable in generated code.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynthName(pub String);

impl SynthName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SynthName {
    fn from(value: &str) -> Self {
        SynthName(value.to_string())
    }
}

impl std::fmt::Display for SynthName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collect the canonical names of every reference of an enabled kind below `node`.
///
/// The walk covers the whole tree, array index expressions included, and accepts any
/// node kind.
pub fn collect_variables(node: &Node, kinds: VariableKinds) -> BTreeSet<CanonicalName> {
    let mut names = BTreeSet::new();
    collect_into(node, kinds, &mut names);
    names
}

fn collect_into(node: &Node, kinds: VariableKinds, names: &mut BTreeSet<CanonicalName>) {
    if let (Some(kind), Some(name)) = (VariableKind::of(node), CanonicalName::of(node)) {
        if kinds.enables(kind) {
            names.insert(name);
        }
    }

    match node {
        Node::Compound(stmts) => stmts.iter().for_each(|s| collect_into(s, kinds, names)),
        Node::Call { args, .. } => args.iter().for_each(|a| collect_into(a, kinds, names)),
        Node::BinaryOp { lhs, rhs, .. } => {
            collect_into(lhs, kinds, names);
            collect_into(rhs, kinds, names);
        }
        Node::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            collect_into(cond, kinds, names);
            collect_into(then_expr, kinds, names);
            collect_into(else_expr, kinds, names);
        }
        Node::If {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_into(cond, kinds, names);
            collect_into(then_branch, kinds, names);
            if let Some(else_branch) = else_branch {
                collect_into(else_branch, kinds, names);
            }
        }
        Node::While { cond, body } => {
            collect_into(cond, kinds, names);
            collect_into(body, kinds, names);
        }
        Node::ArraySubscript { index: inner, .. }
        | Node::Paren(inner)
        | Node::UnaryOp { operand: inner, .. }
        | Node::ImplicitCast(inner)
        | Node::Return(Some(inner))
        | Node::VarDecl {
            init: Some(inner), ..
        } => collect_into(inner, kinds, names),
        Node::Member { .. }
        | Node::DeclRef(_)
        | Node::IntegerLiteral(_)
        | Node::Null
        | Node::Return(None)
        | Node::VarDecl { init: None, .. }
        | Node::FloatingLiteral(_) => {}
    }
}
