// Licensed under the Apache-2.0 license

//! Errors reported while compiling a register map.
//!
//! Every error is fatal: the input schema is deterministic, so nothing is
//! retried and no partial output is produced.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, validating or emitting a register map.
#[derive(Error, Debug)]
pub enum Error {
    /// The node identifier cannot be turned into a valid Rust identifier.
    #[error("could not convert node id \"{raw}\" to a valid identifier")]
    InvalidIdentifier { raw: String },

    /// The mask of a register has holes.
    #[error("register {node}: mask {mask:#x} has holes")]
    NonContiguousMask { node: String, mask: u32 },

    /// A register is neither readable nor writable.
    #[error("register {node} has no read or write permission")]
    NoPermission { node: String },

    /// A masked register is writable but not readable.
    #[error("register {node} cannot be mask-written (mask {mask:#x}) because it cannot be read")]
    InvalidMaskedWrite { node: String, mask: u32 },

    /// An integer attribute could not be parsed.
    #[error("node {node}: attribute {attribute}=\"{value}\" is not a valid 32-bit integer")]
    MalformedLiteral {
        node: String,
        attribute: &'static str,
        value: String,
    },

    /// The replication attributes of a node are missing or inconsistent.
    #[error("node {node}: invalid replication: {detail}")]
    InvalidReplication { node: String, detail: String },

    /// Two members of the same block resolve to the same name.
    #[error("block {block}: member name {member} is used more than once")]
    DuplicateIdentifier { block: String, member: String },

    /// A resolved address does not fit in 32 bits.
    #[error("register {node}: address overflows 32 bits")]
    AddressOverflow { node: String },

    /// The schema file could not be read.
    #[error("schema {} not found", .path.display())]
    SchemaNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is not well formed.
    #[error("malformed schema: {0}")]
    SchemaParseError(String),

    /// The generator configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The emitted code is not valid Rust.
    #[error("generated code does not parse: {0}")]
    Render(#[from] syn::Error),
}

/// Result type for register map compilation.
pub type Result<T> = std::result::Result<T, Error>;
