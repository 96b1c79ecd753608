//! State-reference collection.
use std::collections::BTreeSet;

use pktir::{ast::Node, vars::CanonicalName};

use crate::{
    utils::error::SketchResult,
    walker::{RestrictedVisitor, walk_restricted},
};

#[derive(Debug, Default)]
struct StateRefs(BTreeSet<CanonicalName>);

impl RestrictedVisitor for StateRefs {
    fn visit_state_scalar(&mut self, name: CanonicalName) {
        self.0.insert(name);
    }

    fn visit_state_array(&mut self, name: CanonicalName) {
        self.0.insert(name);
    }
}

/// Canonical names of every state scalar and state array referenced below `node`.
///
/// Packet fields are never included and array index expressions are not inspected.
/// Fails on any construct outside the restricted grammar.
pub fn collect_state_vars(node: &Node) -> SketchResult<BTreeSet<CanonicalName>> {
    let mut refs = StateRefs::default();
    walk_restricted(node, &mut refs)?;
    Ok(refs.0)
}

#[cfg(test)]
mod tests {
    use pktir::ast::{BinaryOpcode, build::*};

    use super::*;

    fn names(list: &[&str]) -> BTreeSet<CanonicalName> {
        list.iter().map(|n| CanonicalName::from(*n)).collect()
    }

    #[test]
    fn collects_scalars_and_array_bases() {
        let body = block(vec![
            assign(var("count"), add(var("count"), int(1))),
            assign(
                array("table", var("idx")),
                cond(
                    binop(BinaryOpcode::Gt, field("p", "len"), var("threshold")),
                    call("hash2", vec![var("seed"), field("p", "src")]),
                    int(0),
                ),
            ),
        ]);

        // `idx` only appears inside an index expression
        assert_eq!(
            collect_state_vars(&body).unwrap(),
            names(&["count", "seed", "table", "threshold"])
        );
    }

    #[test]
    fn packet_fields_are_not_state() {
        let body = block(vec![assign(field("p", "a"), field("p", "b"))]);
        assert!(collect_state_vars(&body).unwrap().is_empty());
    }

    #[test]
    fn logical_negation_is_transparent() {
        let expr = not(paren(var("flag")));
        assert_eq!(collect_state_vars(&expr).unwrap(), names(&["flag"]));
    }

    #[test]
    fn empty_statement_and_literals_yield_nothing() {
        assert!(collect_state_vars(&block(vec![null(), int(4)])).unwrap().is_empty());
    }

    #[test]
    fn bitwise_complement_is_rejected() {
        let expr = unary(pktir::ast::UnaryOpcode::Not, var("mask"));
        assert!(collect_state_vars(&expr).unwrap_err().is_unsupported_unary_operator());
    }
}
