//! Restricted tree walk.
//!
//! The walk is both a query and a grammar validator: it visits the node kinds of the
//! restricted packet language and fails on anything else. Visitors only observe the
//! leaves they care about (state references and integer literals).
//!
//! | node              | rule                                              |
//! |-------------------|---------------------------------------------------|
//! | compound          | every statement                                   |
//! | binary operation  | left then right operand                           |
//! | conditional       | condition, true branch, false branch              |
//! | field access      | nothing (packet fields are not state)             |
//! | plain name        | [`RestrictedVisitor::visit_state_scalar`]         |
//! | indexed name      | [`RestrictedVisitor::visit_state_array`], index skipped |
//! | integer literal   | [`RestrictedVisitor::visit_integer_literal`]      |
//! | empty statement   | nothing                                           |
//! | parenthesis, cast | inner expression                                  |
//! | unary operation   | operand, logical negation only                    |
//! | call              | every argument                                    |
use pktir::{ast::Node, vars::CanonicalName};

use crate::utils::error::{SketchError, SketchResult};

/// Observer of the leaves reached by [`walk_restricted`].
pub trait RestrictedVisitor {
    fn visit_state_scalar(&mut self, _name: CanonicalName) {}

    fn visit_state_array(&mut self, _name: CanonicalName) {}

    fn visit_integer_literal(&mut self, _value: i64) {}
}

/// Walk `node` under the restricted grammar rules, reporting leaves to `visitor`.
pub fn walk_restricted<V>(node: &Node, visitor: &mut V) -> SketchResult<()>
where
    V: RestrictedVisitor + ?Sized,
{
    match node {
        Node::Compound(stmts) => stmts
            .iter()
            .try_for_each(|stmt| walk_restricted(stmt, visitor)),
        Node::BinaryOp { lhs, rhs, .. } => {
            walk_restricted(lhs, visitor)?;
            walk_restricted(rhs, visitor)
        }
        Node::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            walk_restricted(cond, visitor)?;
            walk_restricted(then_expr, visitor)?;
            walk_restricted(else_expr, visitor)
        }
        Node::Member { .. } | Node::Null => Ok(()),
        Node::DeclRef(name) => {
            visitor.visit_state_scalar(CanonicalName(name.clone()));
            Ok(())
        }
        Node::ArraySubscript { array, .. } => {
            visitor.visit_state_array(CanonicalName(array.clone()));
            Ok(())
        }
        Node::IntegerLiteral(value) => {
            visitor.visit_integer_literal(*value);
            Ok(())
        }
        Node::Paren(inner) | Node::ImplicitCast(inner) => walk_restricted(inner, visitor),
        Node::UnaryOp { op, operand } => {
            if !op.is_logical_not() {
                return Err(SketchError::UnsupportedUnaryOperator { opcode: *op });
            }
            walk_restricted(operand, visitor)
        }
        Node::Call { args, .. } => args.iter().try_for_each(|arg| walk_restricted(arg, visitor)),
        Node::If { .. }
        | Node::While { .. }
        | Node::Return(_)
        | Node::VarDecl { .. }
        | Node::FloatingLiteral(_) => Err(SketchError::GrammarViolation { kind: node.kind() }),
    }
}
