use pktir::{
    ast::{BinaryOpcode, NodeKind, UnaryOpcode},
    rename::RenameError,
};
use strum::EnumIs;
use thiserror::Error;

/// Failures of the sketch backend. None of them is recoverable: the compilation unit
/// is outside the supported language and must be rejected as a whole.
#[derive(Debug, EnumIs, Error)]
pub enum SketchError {
    /// A node kind outside the restricted packet grammar was encountered.
    #[error("The restricted packet grammar does not cover `{kind}` nodes.")]
    GrammarViolation { kind: NodeKind },

    /// Only logical negation is accepted as a unary operator.
    #[error("Unary operator `{opcode}` is not supported. Only logical negation `!` may appear in a packet function.")]
    UnsupportedUnaryOperator { opcode: UnaryOpcode },

    /// Packet function bodies are straight-line assignment sequences.
    #[error("Top-level statement `{statement}` of a packet function is not an assignment.")]
    NonAssignmentStatement { statement: String },

    /// A top-level binary operation uses something else than plain `=`.
    #[error("Top-level statement uses operator `{opcode}`. Only plain assignment `=` is supported.")]
    NotTrueAssignment { opcode: BinaryOpcode },

    /// The packet function is a prototype without definition.
    #[error("Packet function `{function}` has no body.")]
    MissingBody { function: String },

    /// A function body must be a compound statement.
    #[error("Function body is a `{kind}` node, expected a compound statement.")]
    BodyNotCompound { kind: NodeKind },

    /// The constant set generator needs exactly one packet function per unit.
    #[error("Expected exactly one packet function in the compilation unit, found {found}.")]
    PacketFunctionCount { found: usize },

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },
}

pub type SketchResult<T> = Result<T, SketchError>;
