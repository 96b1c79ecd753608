//! Source printer for packet-language trees.
//!
//! Expressions are printed compactly, without whitespace around binary operators
//! (`p.a+1`, `c?x:y`, `f(a,b)`), which is the form expected by the synthesizer input.
use std::fmt::{Display, Formatter, Result};

use crate::ast::{BinaryOpcode, FunctionDecl, Node, UnaryOpcode};

/// Render a node back to source text.
pub fn print_node(node: &Node) -> String {
    node.to_string()
}

impl Display for BinaryOpcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.to_str())
    }
}

impl Display for UnaryOpcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.to_str())
    }
}

/// Statements that carry their own terminator when printed in a block.
pub(crate) fn is_block_like(node: &Node) -> bool {
    matches!(node, Node::Compound(_) | Node::If { .. } | Node::While { .. })
}

fn write_statements(f: &mut Formatter<'_>, stmts: &[Node]) -> Result {
    writeln!(f, "{{")?;
    for stmt in stmts {
        write!(f, "{}", stmt)?;
        if is_block_like(stmt) {
            writeln!(f)?;
        } else {
            writeln!(f, ";")?;
        }
    }
    write!(f, "}}")
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Node::Compound(stmts) => write_statements(f, stmts),
            Node::BinaryOp { op, lhs, rhs } => write!(f, "{}{}{}", lhs, op, rhs),
            Node::Conditional {
                cond,
                then_expr,
                else_expr,
            } => write!(f, "{}?{}:{}", cond, then_expr, else_expr),
            Node::Member { base, field } => write!(f, "{}.{}", base, field),
            Node::DeclRef(name) => f.write_str(name),
            Node::ArraySubscript { array, index } => write!(f, "{}[{}]", array, index),
            Node::IntegerLiteral(value) => write!(f, "{}", value),
            Node::Null => Ok(()),
            Node::Paren(inner) => write!(f, "({})", inner),
            Node::UnaryOp { op, operand } if op.is_postfix() => write!(f, "{}{}", operand, op),
            Node::UnaryOp { op, operand } => write!(f, "{}{}", op, operand),
            Node::ImplicitCast(inner) => write!(f, "{}", inner),
            Node::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if({}){}", cond, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, "else {}", else_branch)?;
                }
                Ok(())
            }
            Node::While { cond, body } => write!(f, "while({}){}", cond, body),
            Node::Return(None) => write!(f, "return"),
            Node::Return(Some(value)) => write!(f, "return {}", value),
            Node::VarDecl { ty, name, init } => {
                write!(f, "{} {}", ty, name)?;
                if let Some(init) = init {
                    write!(f, "={}", init)?;
                }
                Ok(())
            }
            Node::FloatingLiteral(text) => f.write_str(text),
        }
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{} {}", param.ty, param.name)?;
        }
        write!(f, ")")?;
        match &self.body {
            Some(body) => write!(f, "{}", body),
            None => write!(f, ";"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;

    #[test]
    fn prints_compact_expressions() {
        let expr = add(field("p", "a"), int(1));
        assert_eq!(print_node(&expr), "p.a+1");

        let expr = cond(not(var("flag")), array("tbl", field("p", "idx")), int(-3));
        assert_eq!(print_node(&expr), "!flag?tbl[p.idx]:-3");

        let expr = call("hash2", vec![field("p", "sport"), paren(cast(var("x")))]);
        assert_eq!(print_node(&expr), "hash2(p.sport,(x))");
    }

    #[test]
    fn prints_postfix_after_operand() {
        let expr = unary(UnaryOpcode::PostInc, var("count"));
        assert_eq!(print_node(&expr), "count++");
    }

    #[test]
    fn prints_blocks_one_statement_per_line() {
        let body = block(vec![assign(field("p", "x"), int(2)), null()]);
        assert_eq!(print_node(&body), "{\np.x=2;\n;\n}");
    }

    #[test]
    fn prints_function_signature() {
        let function = packet_function("func", vec![assign(var("s"), int(0))]);
        assert_eq!(function.to_string(), "void func(struct Packet p){\ns=0;\n}");
    }
}
