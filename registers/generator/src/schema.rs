// Licensed under the Apache-2.0 license

//! Strongly typed register map schema.
//!
//! The XML document is read with `serde-xml-rs` into loosely typed raw
//! nodes, then validated in a single pass into [`Node`]s. After this pass
//! every integer attribute has been parsed and every replicated node carries
//! its complete [`Replication`] description.
//!
//! ```text
//! <address_table>
//!   <node id="TOP">
//!     <node id="CTRL" address="0x0" permission="rw" mask="0xff"/>
//!     <node id="CH_${i}" address="0x100" generate="true"
//!           generate_size="4" generate_address_step="0x10" generate_idx_var="i">
//!       <node id="STATUS" address="0x1" permission="r"/>
//!     </node>
//!   </node>
//! </address_table>
//! ```

use crate::error::{Error, Result};
use crate::util::{check_mask, is_identifier, parse_int};
use serde::Deserialize;
use std::path::Path;

/// Mask used when a register does not declare one.
pub const FULL_MASK: u32 = 0xffff_ffff;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "node", default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(alias = "identifier")]
    id: String,
    description: Option<String>,
    address: Option<String>,
    permission: Option<String>,
    mask: Option<String>,
    generate: Option<String>,
    generate_idx_var: Option<String>,
    generate_size: Option<String>,
    generate_address_step: Option<String>,
    #[serde(rename = "node", default)]
    children: Vec<RawNode>,
}

/// Read/write permission of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Permission {
    pub read: bool,
    pub write: bool,
}

impl Permission {
    /// Parse a permission string; any `r` grants read and any `w` grants write.
    pub fn parse(s: &str) -> Self {
        Self {
            read: s.contains('r'),
            write: s.contains('w'),
        }
    }
}

/// Replication of a node into an array of sibling instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replication {
    /// Name of the index placeholder embedded in the identifier (`i` for `${i}`).
    pub idx_var: String,
    /// Number of instances; always at least one.
    pub size: u32,
    /// Address increment between consecutive instances.
    pub step: u32,
}

impl Replication {
    /// Relative address of instance `index`, or `None` on overflow.
    pub fn instance_address(&self, address: u32, index: u32) -> Option<u32> {
        address.checked_add(index.checked_mul(self.step)?)
    }
}

/// Validated access description of a register: mask and permissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafAccess {
    pub mask: u32,
    pub read: bool,
    pub write: bool,
}

/// A node of the register tree.
///
/// Nodes without children are registers; nodes with children are blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Raw identifier, possibly containing a replication placeholder.
    pub id: String,
    pub description: Option<String>,
    /// Address relative to the parent block, in words.
    pub address: u32,
    pub permission: Permission,
    /// Declared mask; `None` means all bits.
    pub mask: Option<u32>,
    pub replication: Option<Replication>,
    pub children: Vec<Node>,
}

impl Node {
    /// Returns true for registers, false for blocks.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The Rust identifier for this node.
    ///
    /// Replication placeholders are removed together with a preceding
    /// underscore, surrounding whitespace is dropped, and `reg_` is prepended
    /// when the result is not an identifier (e.g. when it starts with a digit).
    pub fn name(&self) -> Result<String> {
        let mut name = match &self.replication {
            None => self.id.trim().to_string(),
            Some(replication) => {
                let token = format!("${{{}}}", replication.idx_var);
                self.id
                    .replace(&format!("_{token}"), "")
                    .replace(&token, "")
                    .trim()
                    .to_string()
            }
        };
        if !is_identifier(&name) {
            name = format!("reg_{name}");
        }
        if !is_identifier(&name) {
            return Err(Error::InvalidIdentifier {
                raw: self.id.clone(),
            });
        }
        Ok(name)
    }

    /// Validate the mask and permissions of a register.
    pub fn leaf_access(&self) -> Result<LeafAccess> {
        let mask = self.mask.unwrap_or(FULL_MASK);
        check_mask(&self.id, mask)?;
        let Permission { read, write } = self.permission;
        if !read && !write {
            return Err(Error::NoPermission {
                node: self.id.clone(),
            });
        }
        // Masked writes are read-modify-write.
        if mask != FULL_MASK && write && !read {
            return Err(Error::InvalidMaskedWrite {
                node: self.id.clone(),
                mask,
            });
        }
        Ok(LeafAccess { mask, read, write })
    }

    fn from_raw(raw: RawNode) -> Result<Self> {
        let id = raw.id;
        let literal = |attribute: &'static str, value: Option<String>| -> Result<Option<u32>> {
            value
                .map(|v| {
                    parse_int(&v).ok_or_else(|| Error::MalformedLiteral {
                        node: id.clone(),
                        attribute,
                        value: v,
                    })
                })
                .transpose()
        };

        let address = literal("address", raw.address)?.unwrap_or(0);
        let mask = literal("mask", raw.mask)?;
        let size = literal("generate_size", raw.generate_size)?;
        let step = literal("generate_address_step", raw.generate_address_step)?;

        let replication = if raw.generate.is_some() {
            let missing = |attribute: &str| Error::InvalidReplication {
                node: id.clone(),
                detail: format!("missing {attribute}"),
            };
            let idx_var = raw
                .generate_idx_var
                .ok_or_else(|| missing("generate_idx_var"))?;
            let size = size.ok_or_else(|| missing("generate_size"))?;
            let step = step.ok_or_else(|| missing("generate_address_step"))?;
            if size == 0 {
                return Err(Error::InvalidReplication {
                    node: id,
                    detail: "generate_size must be positive".to_string(),
                });
            }
            Some(Replication {
                idx_var,
                size,
                step,
            })
        } else {
            None
        };

        let children = raw
            .children
            .into_iter()
            .map(Node::from_raw)
            .collect::<Result<Vec<_>>>()?;

        Ok(Node {
            id,
            description: raw.description,
            address,
            permission: raw
                .permission
                .as_deref()
                .map(Permission::parse)
                .unwrap_or_default(),
            mask,
            replication,
            children,
        })
    }
}

/// Parse a schema document and return its single top-level node.
pub fn parse_document(xml: &str) -> Result<Node> {
    let doc: RawDocument =
        serde_xml_rs::from_str(xml).map_err(|e| Error::SchemaParseError(e.to_string()))?;
    let mut nodes = doc.nodes.into_iter();
    let root = nodes
        .next()
        .ok_or_else(|| Error::SchemaParseError("document contains no node".to_string()))?;
    if nodes.next().is_some() {
        return Err(Error::SchemaParseError(
            "document contains more than one top-level node".to_string(),
        ));
    }
    Node::from_raw(root)
}

/// Read and parse a schema file.
pub fn load(path: &Path) -> Result<Node> {
    let xml = std::fs::read_to_string(path).map_err(|source| Error::SchemaNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&xml)
}
