//! Integer constants of a packet function, used to bound the synthesizer's search space.
use std::collections::BTreeSet;

use log::debug;
use pktir::{
    ast::{FunctionDecl, Node, TranslationUnit},
    packet::PacketFunctionFilter,
};

use crate::{
    utils::error::{SketchError, SketchResult},
    walker::{RestrictedVisitor, walk_restricted},
};

/// Accumulates the distinct integer literals of one packet function body.
///
/// Unlike [`SketchGenerator::transform`](crate::sketch::SketchGenerator::transform),
/// which handles any number of packet functions, a unit must contain exactly one
/// packet function to yield a constant set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantSetGenerator {
    constant_set: BTreeSet<i64>,
}

impl ConstantSetGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constants of the single packet function of `unit`.
    pub fn from_translation_unit<F>(unit: &TranslationUnit, filter: &F) -> SketchResult<Self>
    where
        F: PacketFunctionFilter + ?Sized,
    {
        let packet_functions: Vec<&FunctionDecl> = unit
            .functions()
            .filter(|function| filter.is_packet_function(function))
            .collect();

        let [function] = packet_functions.as_slice() else {
            return Err(SketchError::PacketFunctionCount {
                found: packet_functions.len(),
            });
        };

        let body = function
            .body
            .as_ref()
            .ok_or_else(|| SketchError::MissingBody {
                function: function.name.clone(),
            })?;

        let mut generator = Self::new();
        generator.visit_body(body)?;
        debug!(
            "Collected {} constants from packet function `{}`",
            generator.constant_set.len(),
            function.name
        );
        Ok(generator)
    }

    /// Record every integer literal of `body`. Fails on constructs outside the restricted
    /// grammar.
    pub fn visit_body(&mut self, body: &Node) -> SketchResult<()> {
        walk_restricted(body, self)
    }

    pub fn insert_constant(&mut self, value: i64) {
        self.constant_set.insert(value);
    }

    /// Constants seen so far, ascending.
    pub fn get_set(&self) -> &BTreeSet<i64> {
        &self.constant_set
    }

    pub fn into_set(self) -> BTreeSet<i64> {
        self.constant_set
    }
}

impl RestrictedVisitor for ConstantSetGenerator {
    fn visit_integer_literal(&mut self, value: i64) {
        self.insert_constant(value);
    }
}

#[cfg(test)]
mod tests {
    use pktir::ast::build::*;

    use super::*;

    #[test]
    fn deduplicates_and_sorts() {
        let body = block(vec![
            assign(var("a"), int(5)),
            assign(field("p", "x"), add(int(3), paren(int(5)))),
            assign(var("b"), cond(not(var("c")), int(10), int(-1))),
        ]);

        let mut generator = ConstantSetGenerator::new();
        generator.visit_body(&body).unwrap();
        assert_eq!(generator.get_set().iter().copied().collect::<Vec<_>>(), vec![-1, 3, 5, 10]);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut generator = ConstantSetGenerator::new();
        generator.insert_constant(7);
        generator.insert_constant(7);
        assert_eq!(generator.into_set(), BTreeSet::from([7]));
    }

    #[test]
    fn array_indices_are_not_harvested() {
        let body = block(vec![assign(array("t", int(4)), int(1))]);
        let mut generator = ConstantSetGenerator::new();
        generator.visit_body(&body).unwrap();
        assert_eq!(generator.get_set(), &BTreeSet::from([1]));
    }

    #[test]
    fn unsupported_unary_aborts() {
        let body = block(vec![assign(var("a"), neg(int(5)))]);
        let err = ConstantSetGenerator::new().visit_body(&body).unwrap_err();
        assert!(err.is_unsupported_unary_operator());
    }
}
