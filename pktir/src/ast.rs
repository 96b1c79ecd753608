//! Syntax tree of the packet-processing language.
//!
//! A compilation unit is a [`TranslationUnit`] holding top-level [`Decl`]s. Function bodies
//! and expressions share a single tagged union, [`Node`], mirroring the statement/expression
//! hierarchy a C front end produces. Only a subset of node kinds belongs to the restricted
//! grammar understood by the sketch backend; the remaining kinds (`If`, `While`, `Return`,
//! `VarDecl`, `FloatingLiteral`) exist so that front ends can hand over whatever they parsed
//! and let the backend reject it.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumIter};

/// Binary operators, including plain and compound assignments.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    LAnd,
    LOr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,
}

impl BinaryOpcode {
    /// Source symbol of the operator.
    pub fn to_str(&self) -> &'static str {
        match self {
            BinaryOpcode::Add => "+",
            BinaryOpcode::Sub => "-",
            BinaryOpcode::Mul => "*",
            BinaryOpcode::Div => "/",
            BinaryOpcode::Rem => "%",
            BinaryOpcode::Shl => "<<",
            BinaryOpcode::Shr => ">>",
            BinaryOpcode::BitAnd => "&",
            BinaryOpcode::BitOr => "|",
            BinaryOpcode::BitXor => "^",
            BinaryOpcode::Lt => "<",
            BinaryOpcode::Gt => ">",
            BinaryOpcode::Le => "<=",
            BinaryOpcode::Ge => ">=",
            BinaryOpcode::Eq => "==",
            BinaryOpcode::Ne => "!=",
            BinaryOpcode::LAnd => "&&",
            BinaryOpcode::LOr => "||",
            BinaryOpcode::Assign => "=",
            BinaryOpcode::AddAssign => "+=",
            BinaryOpcode::SubAssign => "-=",
            BinaryOpcode::MulAssign => "*=",
            BinaryOpcode::DivAssign => "/=",
            BinaryOpcode::RemAssign => "%=",
            BinaryOpcode::ShlAssign => "<<=",
            BinaryOpcode::ShrAssign => ">>=",
            BinaryOpcode::AndAssign => "&=",
            BinaryOpcode::OrAssign => "|=",
            BinaryOpcode::XorAssign => "^=",
        }
    }

    /// True only for the plain assignment `=`.
    pub fn is_assignment(&self) -> bool {
        matches!(self, BinaryOpcode::Assign)
    }

    /// True for `+=`, `-=` and the other read-modify-write assignments.
    pub fn is_compound_assignment(&self) -> bool {
        matches!(
            self,
            BinaryOpcode::AddAssign
                | BinaryOpcode::SubAssign
                | BinaryOpcode::MulAssign
                | BinaryOpcode::DivAssign
                | BinaryOpcode::RemAssign
                | BinaryOpcode::ShlAssign
                | BinaryOpcode::ShrAssign
                | BinaryOpcode::AndAssign
                | BinaryOpcode::OrAssign
                | BinaryOpcode::XorAssign
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpcode {
    /// Logical negation `!`.
    LNot,
    /// Arithmetic negation `-`.
    Minus,
    /// Unary plus `+`.
    Plus,
    /// Bitwise complement `~`.
    Not,
    /// Prefix increment `++x`.
    PreInc,
    /// Prefix decrement `--x`.
    PreDec,
    /// Postfix increment `x++`.
    PostInc,
    /// Postfix decrement `x--`.
    PostDec,
}

impl UnaryOpcode {
    /// Source symbol of the operator.
    pub fn to_str(&self) -> &'static str {
        match self {
            UnaryOpcode::LNot => "!",
            UnaryOpcode::Minus => "-",
            UnaryOpcode::Plus => "+",
            UnaryOpcode::Not => "~",
            UnaryOpcode::PreInc | UnaryOpcode::PostInc => "++",
            UnaryOpcode::PreDec | UnaryOpcode::PostDec => "--",
        }
    }

    /// Postfix operators are printed after their operand.
    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOpcode::PostInc | UnaryOpcode::PostDec)
    }

    /// The only unary operator of the restricted grammar.
    pub fn is_logical_not(&self) -> bool {
        matches!(self, UnaryOpcode::LNot)
    }
}

/// A statement or expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumDiscriminants)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum_discriminants(name(NodeKind))]
#[strum_discriminants(derive(Hash, EnumIter, strum::Display))]
pub enum Node {
    /// Brace-delimited sequence of statements.
    Compound(Vec<Node>),

    /// Binary operation, assignments included.
    BinaryOp {
        op: BinaryOpcode,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },

    /// Ternary `cond ? then_expr : else_expr`.
    Conditional {
        cond: Box<Node>,
        then_expr: Box<Node>,
        else_expr: Box<Node>,
    },

    /// Field access on a packet object, e.g. `p.dst_port`.
    Member { base: String, field: String },

    /// Plain named reference.
    DeclRef(String),

    /// Indexed reference `array[index]`.
    ArraySubscript { array: String, index: Box<Node> },

    IntegerLiteral(i64),

    /// Empty statement `;`.
    Null,

    Paren(Box<Node>),

    UnaryOp { op: UnaryOpcode, operand: Box<Node> },

    /// Conversion inserted by the front end; prints as its operand.
    ImplicitCast(Box<Node>),

    Call { callee: String, args: Vec<Node> },

    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },

    While { cond: Box<Node>, body: Box<Node> },

    Return(Option<Box<Node>>),

    /// Local declaration `ty name = init`.
    VarDecl {
        ty: String,
        name: String,
        init: Option<Box<Node>>,
    },

    /// Floating point literal, kept as written.
    FloatingLiteral(String),
}

impl Node {
    /// Kind of this node.
    pub fn kind(&self) -> NodeKind {
        self.into()
    }
}

/// Function parameter, record field or global variable: a typed name.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypedName {
    pub name: String,
    /// Type as written, e.g. `int` or `struct Packet`.
    pub ty: String,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: String,
    pub params: Vec<TypedName>,
    /// `None` for a prototype without definition.
    pub body: Option<Node>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<TypedName>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalVarDecl {
    pub var: TypedName,
    pub init: Option<Node>,
}

/// Top-level declaration.
#[derive(Debug, Clone, Hash, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decl {
    Function(FunctionDecl),
    Record(RecordDecl),
    Var(GlobalVarDecl),
}

/// A compilation unit, declarations in source order.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslationUnit {
    pub decls: Vec<Decl>,
}

impl TranslationUnit {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }

    /// Function declarations in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Function(function) => Some(function),
            _ => None,
        })
    }
}

/// Constructors for building trees by hand.
pub mod build {
    use super::*;

    pub fn field(base: &str, field: &str) -> Node {
        Node::Member {
            base: base.to_string(),
            field: field.to_string(),
        }
    }

    pub fn var(name: &str) -> Node {
        Node::DeclRef(name.to_string())
    }

    pub fn array(name: &str, index: Node) -> Node {
        Node::ArraySubscript {
            array: name.to_string(),
            index: Box::new(index),
        }
    }

    pub fn int(value: i64) -> Node {
        Node::IntegerLiteral(value)
    }

    pub fn null() -> Node {
        Node::Null
    }

    pub fn paren(inner: Node) -> Node {
        Node::Paren(Box::new(inner))
    }

    pub fn cast(inner: Node) -> Node {
        Node::ImplicitCast(Box::new(inner))
    }

    pub fn unary(op: UnaryOpcode, operand: Node) -> Node {
        Node::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn not(operand: Node) -> Node {
        unary(UnaryOpcode::LNot, operand)
    }

    pub fn neg(operand: Node) -> Node {
        unary(UnaryOpcode::Minus, operand)
    }

    pub fn binop(op: BinaryOpcode, lhs: Node, rhs: Node) -> Node {
        Node::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(lhs: Node, rhs: Node) -> Node {
        binop(BinaryOpcode::Assign, lhs, rhs)
    }

    pub fn add(lhs: Node, rhs: Node) -> Node {
        binop(BinaryOpcode::Add, lhs, rhs)
    }

    pub fn cond(cond: Node, then_expr: Node, else_expr: Node) -> Node {
        Node::Conditional {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn call(callee: &str, args: Vec<Node>) -> Node {
        Node::Call {
            callee: callee.to_string(),
            args,
        }
    }

    pub fn block(stmts: Vec<Node>) -> Node {
        Node::Compound(stmts)
    }

    /// `void name(struct Packet p) { stmts }`
    pub fn packet_function(name: &str, stmts: Vec<Node>) -> FunctionDecl {
        FunctionDecl {
            name: name.to_string(),
            return_type: "void".to_string(),
            params: vec![TypedName {
                name: "p".to_string(),
                ty: "struct Packet".to_string(),
            }],
            body: Some(block(stmts)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build::*, *};

    #[test]
    fn only_plain_assignment_is_assignment() {
        assert!(BinaryOpcode::Assign.is_assignment());
        assert!(!BinaryOpcode::AddAssign.is_assignment());
        assert!(BinaryOpcode::AddAssign.is_compound_assignment());
        assert!(!BinaryOpcode::Eq.is_assignment());
    }

    #[test]
    fn node_kind_names() {
        assert_eq!(var("x").kind(), NodeKind::DeclRef);
        assert_eq!(NodeKind::While.to_string(), "While");
    }

    #[test]
    fn unit_lists_functions_only() {
        let unit = TranslationUnit::new(vec![
            Decl::Record(RecordDecl {
                name: "Packet".to_string(),
                fields: vec![],
            }),
            Decl::Function(packet_function("func", vec![])),
        ]);
        let names: Vec<_> = unit.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["func"]);
    }
}
