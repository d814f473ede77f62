// Licensed under the Apache-2.0 license

//! Register map to Rust code generator.
//!
//! This crate reads a hierarchical register map (registers, blocks and
//! replicated blocks) and emits Rust declarations that give host code typed
//! access to every register. Addresses, masks and register arrays are
//! computed when the code is generated, not maintained by hand.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use regmap_generator::{compile_file, GeneratorConfig};
//!
//! let config = GeneratorConfig::default().with_access_path("my_hal::access");
//! let code = compile_file(Path::new("address_table.xml"), &config).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`schema`]: Typed register tree read from the XML schema
//! - [`util`]: Literal parsing, mask checks and hex formatting
//! - [`config`]: Generation settings ([`GeneratorConfig`])
//! - [`address`]: Absolute address resolution ([`flatten`])
//! - [`ir`]: Typed representation of the emitted declarations
//! - `codegen`: Lowering to the IR and rendering to Rust

pub mod address;
pub mod config;
pub mod error;
pub mod ir;
pub mod schema;
pub mod util;

mod codegen;

/// Schema file read when no path is given.
pub const DEFAULT_SCHEMA: &str = "address_table.xml";

pub use address::{flatten, ResolvedRegister};
pub use codegen::{compile_file, compile_node, compile_str, lower};
pub use config::{AddressTransform, GeneratorConfig};
pub use error::{Error, Result};
pub use schema::Node;
