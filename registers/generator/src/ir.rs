// Licensed under the Apache-2.0 license

//! Typed intermediate representation of the emitted translation unit.
//!
//! The code generator resolves the schema into these types (identifiers,
//! masks, permissions and relative addresses are all validated by then), and
//! the renderer turns them into Rust tokens.
//!
//! ```text
//! TranslationUnit
//! ├── composites: Vec<Composite>   # dependency order, children first
//! │   └── members: Vec<Member>
//! │       ├── Register(LeafAccess)
//! │       └── Block(type name)
//! └── root: RootInstance
//! ```

use crate::schema::LeafAccess;
use proc_macro2::Ident;

/// A generated block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    /// Unique type name: node name plus content hash.
    pub name: Ident,
    pub doc: Option<String>,
    pub members: Vec<Member>,
}

/// A field of a generated block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: Ident,
    pub doc: Option<String>,
    pub kind: MemberKind,
    pub placement: Placement,
}

/// What a member holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// A register with its validated access description.
    Register(LeafAccess),
    /// A nested block, by type name.
    Block(Ident),
}

/// Where a member lives relative to the base of its parent, in words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Single(u32),
    /// One relative address per replicated instance.
    Array(Vec<u32>),
}

impl Placement {
    /// Relative address of every instance.
    pub fn addresses(&self) -> &[u32] {
        match self {
            Placement::Single(address) => std::slice::from_ref(address),
            Placement::Array(addresses) => addresses,
        }
    }
}

/// The top-level instance of the register map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootInstance {
    pub name: Ident,
    pub doc: Option<String>,
    /// Type name of the root block.
    pub ty: Ident,
    /// Base address the root is constructed at.
    pub base: u32,
}

/// Everything emitted for one register map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Block types, each declared before any block embedding it.
    pub composites: Vec<Composite>,
    pub root: RootInstance,
}
