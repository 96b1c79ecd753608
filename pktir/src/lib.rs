//! Syntax tree and tree utilities for the packet-processing language.
//!
//! - [`ast`]: node, declaration and compilation unit types, plus hand builders
//! - [`fmt`]: compact source printer
//! - [`vars`]: structural classification of variable references
//! - [`rename`]: rename tables and the renaming renderer
//! - [`packet`]: selection of packet functions

pub mod ast;
pub mod fmt;
pub mod packet;
pub mod rename;
pub mod vars;
