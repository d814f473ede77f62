// Licensed under the Apache-2.0 license

//! Absolute address resolution.
//!
//! Walks the register tree, accumulating block offsets and expanding
//! replicated nodes, and yields one [`ResolvedRegister`] per register
//! instance. Code emission computes the same addresses through the emitted
//! `get_address` helper; this pass produces them up front so that overflow
//! is caught at generation time and the table can be listed.

use crate::config::AddressTransform;
use crate::error::{Error, Result};
use crate::schema::Node;
use crate::util::hex_const;

/// A register instance with its absolute address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRegister {
    /// Dotted path from the root, with replicated instances indexed (`OH[2].CTRL`).
    pub path: String,
    pub address: u32,
    pub mask: u32,
    pub read: bool,
    pub write: bool,
}

impl std::fmt::Display for ResolvedRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}{}",
            self.path,
            hex_const(self.address as u64),
            hex_const(self.mask as u64),
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
        )
    }
}

/// Resolve every register below `root`, whose parent base is `base`.
///
/// Registers are returned in declaration order.
pub fn flatten(root: &Node, base: u32, transform: AddressTransform) -> Result<Vec<ResolvedRegister>> {
    let mut out = Vec::new();
    let name = root.name()?;
    resolve_node(root, base, &name, transform, &mut out)?;
    Ok(out)
}

fn resolve_node(
    node: &Node,
    base: u32,
    path: &str,
    transform: AddressTransform,
    out: &mut Vec<ResolvedRegister>,
) -> Result<()> {
    let overflow = || Error::AddressOverflow {
        node: node.id.clone(),
    };
    match &node.replication {
        None => resolve_instance(node, base, node.address, path, transform, out),
        Some(replication) => {
            for i in 0..replication.size {
                let local = replication
                    .instance_address(node.address, i)
                    .ok_or_else(overflow)?;
                resolve_instance(node, base, local, &format!("{path}[{i}]"), transform, out)?;
            }
            Ok(())
        }
    }
}

fn resolve_instance(
    node: &Node,
    base: u32,
    local: u32,
    path: &str,
    transform: AddressTransform,
    out: &mut Vec<ResolvedRegister>,
) -> Result<()> {
    let overflow = || Error::AddressOverflow {
        node: node.id.clone(),
    };
    if node.is_leaf() {
        let access = node.leaf_access()?;
        out.push(ResolvedRegister {
            path: path.to_string(),
            address: transform.absolute(base, local).ok_or_else(overflow)?,
            mask: access.mask,
            read: access.read,
            write: access.write,
        });
        return Ok(());
    }
    let child_base = base.checked_add(local).ok_or_else(overflow)?;
    for child in &node.children {
        let child_path = format!("{path}.{}", child.name()?);
        resolve_node(child, child_base, &child_path, transform, out)?;
    }
    Ok(())
}
