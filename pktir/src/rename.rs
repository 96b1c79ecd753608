//! Rename tables and the renaming renderer.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ast::Node,
    fmt::is_block_like,
    vars::{CanonicalName, SynthName, VariableKind, VariableKinds},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum RenameError {
    /// A reference of an enabled kind has no entry in the rename table.
    #[error("Variable `{name}` ({kind:?}) has no entry in the rename table.")]
    Unbound {
        name: CanonicalName,
        kind: VariableKind,
    },

    /// The canonical name already has a synthetic name.
    #[error("Variable `{name}` is already renamed to `{existing}`, cannot rename it to `{requested}`.")]
    AlreadyRenamed {
        name: CanonicalName,
        existing: SynthName,
        requested: SynthName,
    },

    /// The synthetic name is already bound to another variable.
    #[error("Synthetic name `{synth}` is already used by `{owner}`, cannot reuse it for `{name}`.")]
    SynthNameInUse {
        synth: SynthName,
        owner: CanonicalName,
        name: CanonicalName,
    },
}

/// Mapping from canonical variable names to synthetic identifiers.
///
/// Synthetic names are unique: no two variables share one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenameTable {
    entries: BTreeMap<CanonicalName, SynthName>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `synth`.
    pub fn insert(&mut self, name: CanonicalName, synth: SynthName) -> Result<(), RenameError> {
        if let Some(existing) = self.entries.get(&name) {
            return Err(RenameError::AlreadyRenamed {
                name,
                existing: existing.clone(),
                requested: synth,
            });
        }
        if let Some((owner, _)) = self.entries.iter().find(|(_, s)| **s == synth) {
            return Err(RenameError::SynthNameInUse {
                synth,
                owner: owner.clone(),
                name,
            });
        }
        self.entries.insert(name, synth);
        Ok(())
    }

    pub fn get(&self, name: &CanonicalName) -> Option<&SynthName> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalName, &SynthName)> {
        self.entries.iter()
    }

}

/// Print `node` replacing every reference of an enabled kind by its synthetic name.
///
/// Output matches [`print_node`](crate::fmt::print_node) for everything else. With
/// [`VariableKinds::STATE_ARRAY`] enabled an array reference prints as the synthetic name
/// of its base alone; otherwise the index is rendered recursively.
pub fn render_with_renaming(
    node: &Node,
    table: &RenameTable,
    kinds: VariableKinds,
) -> Result<String, RenameError> {
    let mut out = String::new();
    Renderer { table, kinds }.render(node, &mut out)?;
    Ok(out)
}

struct Renderer<'a> {
    table: &'a RenameTable,
    kinds: VariableKinds,
}

impl Renderer<'_> {
    /// Printed name of a reference: its synthetic name when the kind is enabled.
    fn reference(&self, name: CanonicalName, kind: VariableKind) -> Result<String, RenameError> {
        if !self.kinds.enables(kind) {
            return Ok(name.0);
        }
        match self.table.get(&name) {
            Some(synth) => Ok(synth.to_string()),
            None => Err(RenameError::Unbound { name, kind }),
        }
    }

    fn render(&self, node: &Node, out: &mut String) -> Result<(), RenameError> {
        match node {
            Node::Member { base, field } => {
                let name = CanonicalName(format!("{}.{}", base, field));
                out.push_str(&self.reference(name, VariableKind::PacketField)?);
            }
            Node::DeclRef(name) => {
                let name = CanonicalName(name.clone());
                out.push_str(&self.reference(name, VariableKind::StateScalar)?);
            }
            // a renamed array stands for the whole array, the index is dropped
            Node::ArraySubscript { array, .. }
                if self.kinds.enables(VariableKind::StateArray) =>
            {
                let name = CanonicalName(array.clone());
                out.push_str(&self.reference(name, VariableKind::StateArray)?);
            }
            Node::ArraySubscript { array, index } => {
                out.push_str(array);
                out.push('[');
                self.render(index, out)?;
                out.push(']');
            }
            Node::Compound(stmts) => {
                out.push_str("{\n");
                for stmt in stmts {
                    self.render(stmt, out)?;
                    out.push_str(if is_block_like(stmt) { "\n" } else { ";\n" });
                }
                out.push('}');
            }
            Node::BinaryOp { op, lhs, rhs } => {
                self.render(lhs, out)?;
                out.push_str(op.to_str());
                self.render(rhs, out)?;
            }
            Node::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.render(cond, out)?;
                out.push('?');
                self.render(then_expr, out)?;
                out.push(':');
                self.render(else_expr, out)?;
            }
            Node::Paren(inner) => {
                out.push('(');
                self.render(inner, out)?;
                out.push(')');
            }
            Node::UnaryOp { op, operand } if op.is_postfix() => {
                self.render(operand, out)?;
                out.push_str(op.to_str());
            }
            Node::UnaryOp { op, operand } => {
                out.push_str(op.to_str());
                self.render(operand, out)?;
            }
            Node::ImplicitCast(inner) => self.render(inner, out)?,
            Node::Call { callee, args } => {
                out.push_str(callee);
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.render(arg, out)?;
                }
                out.push(')');
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push_str("if(");
                self.render(cond, out)?;
                out.push(')');
                self.render(then_branch, out)?;
                if let Some(else_branch) = else_branch {
                    out.push_str("else ");
                    self.render(else_branch, out)?;
                }
            }
            Node::While { cond, body } => {
                out.push_str("while(");
                self.render(cond, out)?;
                out.push(')');
                self.render(body, out)?;
            }
            Node::Return(value) => {
                out.push_str("return");
                if let Some(value) = value {
                    out.push(' ');
                    self.render(value, out)?;
                }
            }
            Node::VarDecl { ty, name, init } => {
                out.push_str(ty);
                out.push(' ');
                out.push_str(name);
                if let Some(init) = init {
                    out.push('=');
                    self.render(init, out)?;
                }
            }
            Node::IntegerLiteral(_) | Node::Null | Node::FloatingLiteral(_) => {
                out.push_str(&node.to_string())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{UnaryOpcode, build::*},
        fmt::print_node,
    };

    fn table(entries: &[(&str, &str)]) -> RenameTable {
        let mut table = RenameTable::new();
        for (name, synth) in entries {
            table.insert((*name).into(), (*synth).into()).unwrap();
        }
        table
    }

    #[test]
    fn renames_every_enabled_reference() {
        let expr = cond(
            field("p", "a"),
            add(var("count"), array("table", field("p", "b"))),
            int(7),
        );
        let table = table(&[
            ("p.a", "pkt_1"),
            ("p.b", "pkt_2"),
            ("count", "state_1"),
            ("table", "state_2"),
        ]);

        let rendered = render_with_renaming(&expr, &table, VariableKinds::ALL).unwrap();
        assert_eq!(rendered, "pkt_1?state_1+state_2:7");
    }

    #[test]
    fn renamed_array_drops_its_index() {
        // `i` only appears as an index and needs no entry
        let expr = add(array("table", var("i")), array("table", int(3)));
        let table = table(&[("table", "state_1")]);

        let rendered = render_with_renaming(&expr, &table, VariableKinds::ALL).unwrap();
        assert_eq!(rendered, "state_1+state_1");
    }

    #[test]
    fn index_is_rendered_when_arrays_are_disabled() {
        let expr = array("table", add(field("p", "b"), var("i")));
        let table = table(&[("p.b", "pkt_1"), ("i", "state_1")]);

        let rendered = render_with_renaming(
            &expr,
            &table,
            VariableKinds::PACKET_FIELD | VariableKinds::STATE_SCALAR,
        )
        .unwrap();
        assert_eq!(rendered, "table[pkt_1+state_1]");
    }

    #[test]
    fn disabled_kinds_print_unchanged() {
        let expr = add(field("p", "a"), var("count"));
        let table = table(&[("count", "state_1")]);

        let rendered = render_with_renaming(&expr, &table, VariableKinds::STATE).unwrap();
        assert_eq!(rendered, "p.a+state_1");
    }

    #[test]
    fn empty_kinds_match_printer() {
        let expr = call(
            "max",
            vec![paren(not(var("x"))), unary(UnaryOpcode::PostDec, var("y"))],
        );
        let rendered =
            render_with_renaming(&expr, &RenameTable::new(), VariableKinds::empty()).unwrap();
        assert_eq!(rendered, print_node(&expr));
    }

    #[test]
    fn unbound_reference_is_an_error() {
        let expr = add(field("p", "a"), var("count"));
        let table = table(&[("p.a", "pkt_1")]);

        let err = render_with_renaming(&expr, &table, VariableKinds::ALL).unwrap_err();
        assert_eq!(
            err,
            RenameError::Unbound {
                name: "count".into(),
                kind: VariableKind::StateScalar,
            }
        );
    }

    #[test]
    fn table_rejects_duplicates() {
        let mut table = table(&[("p.a", "pkt_1")]);

        assert!(matches!(
            table.insert("p.a".into(), "pkt_2".into()),
            Err(RenameError::AlreadyRenamed { .. })
        ));
        assert!(matches!(
            table.insert("p.b".into(), "pkt_1".into()),
            Err(RenameError::SynthNameInUse { .. })
        ));
        assert_eq!(table.len(), 1);
    }
}
