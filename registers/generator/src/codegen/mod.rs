// Licensed under the Apache-2.0 license

//! Main code generation logic: register tree to Rust declarations.
//!
//! The tree is walked depth first. Every block is lowered to a
//! [`Composite`] after all of its children, so the resulting list is already
//! in dependency order. Blocks whose members render identically share one
//! type name and are emitted once.
//!
//! The implementation is split across submodules:
//! - `render`: converting the IR to Rust code

mod render;

use crate::address::flatten;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::ir::{Composite, Member, MemberKind, Placement, RootInstance, TranslationUnit};
use crate::schema::{self, Node};
use log::{debug, info};
use proc_macro2::Ident;
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Name reserved for the field holding the base address of a block.
const BASE_FIELD: &str = "__base";

/// Hex digits of the content hash in a type name, and the step by which it
/// grows when two different bodies share a prefix.
const HASH_DIGITS: usize = 4;

/// State of one compilation run.
struct Compiler<'a> {
    config: &'a GeneratorConfig,
    /// Canonical body of every composite emitted so far, by type name.
    emitted: HashMap<String, String>,
    /// Emitted composites, in dependency order.
    composites: Vec<Composite>,
}

impl<'a> Compiler<'a> {
    fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            emitted: HashMap::new(),
            composites: Vec::new(),
        }
    }

    /// Lower a block node and return its type name.
    ///
    /// The declaration is appended only the first time its name is seen; the
    /// caller references the returned name either way.
    fn composite(&mut self, node: &Node) -> Result<Ident> {
        let block = node.name()?;
        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let member = self.member(child)?;
            let member_name = member.name.to_string();
            if member_name == BASE_FIELD || !seen.insert(member_name.clone()) {
                return Err(Error::DuplicateIdentifier {
                    block: node.id.clone(),
                    member: member_name,
                });
            }
            members.push(member);
        }

        let body = render::canonical_body(&members);
        let name = self.type_name(node, &block, &body)?;
        let ident = ident(&name, &node.id)?;
        match self.emitted.entry(name) {
            Entry::Vacant(entry) => {
                debug!("Emitting block {} for node {}", entry.key(), node.id);
                entry.insert(body);
                self.composites.push(Composite {
                    name: ident.clone(),
                    doc: node.description.clone(),
                    members,
                });
            }
            Entry::Occupied(entry) => {
                debug!("Block {} already emitted, reusing it for node {}", entry.key(), node.id);
            }
        }
        Ok(ident)
    }

    /// `<block>_<hash>` for a block with the given canonical body.
    ///
    /// The hash is the shortest prefix of the body's SHA-256 (in steps of
    /// [`HASH_DIGITS`]) whose name is free or already holds this same body.
    fn type_name(&self, node: &Node, block: &str, body: &str) -> Result<String> {
        let digest = hex::encode(Sha256::digest(body.as_bytes()));
        for len in (HASH_DIGITS..=digest.len()).step_by(HASH_DIGITS) {
            let name = format!("{block}_{}", &digest[..len]);
            match self.emitted.get(&name) {
                Some(existing) if existing != body => {
                    debug!("Hash prefix of {name} is taken by another layout");
                }
                _ => return Ok(name),
            }
        }
        Err(Error::DuplicateIdentifier {
            block: node.id.clone(),
            member: block.to_string(),
        })
    }

    fn member(&mut self, node: &Node) -> Result<Member> {
        let name = ident(&node.name()?, &node.id)?;
        let kind = if node.is_leaf() {
            MemberKind::Register(node.leaf_access()?)
        } else {
            MemberKind::Block(self.composite(node)?)
        };
        let placement = match &node.replication {
            None => Placement::Single(node.address),
            Some(replication) => Placement::Array(
                (0..replication.size)
                    .map(|i| {
                        replication
                            .instance_address(node.address, i)
                            .ok_or_else(|| Error::AddressOverflow {
                                node: node.id.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        Ok(Member {
            name,
            doc: node.description.clone(),
            kind,
            placement,
        })
    }

    /// Leading segment of a relative access path, which the root name would
    /// shadow.
    fn access_root(&self) -> Option<String> {
        let path = syn::parse_str::<syn::Path>(&self.config.access_path).ok()?;
        if path.leading_colon.is_some() {
            return None;
        }
        path.segments.first().map(|segment| segment.ident.to_string())
    }

    fn finish(mut self, root: &Node) -> Result<TranslationUnit> {
        if root.is_leaf() {
            return Err(Error::SchemaParseError(format!(
                "top-level node {} has no children",
                root.id
            )));
        }
        if root.replication.is_some() {
            return Err(Error::InvalidReplication {
                node: root.id.clone(),
                detail: "the top-level node cannot be replicated".to_string(),
            });
        }
        let name = root.name()?;
        if render::RESERVED_NAMES.contains(&name.as_str())
            || self.access_root().as_deref() == Some(name.as_str())
        {
            return Err(Error::InvalidIdentifier {
                raw: root.id.clone(),
            });
        }
        let ty = self.composite(root)?;
        // The root name is also declared as a type alias.
        if self.emitted.contains_key(&name) {
            return Err(Error::DuplicateIdentifier {
                block: root.id.clone(),
                member: name,
            });
        }
        let base = self
            .config
            .root_base
            .checked_add(root.address)
            .ok_or_else(|| Error::AddressOverflow {
                node: root.id.clone(),
            })?;
        Ok(TranslationUnit {
            composites: self.composites,
            root: RootInstance {
                name: ident(&name, &root.id)?,
                doc: root.description.clone(),
                ty,
                base,
            },
        })
    }
}

fn ident(name: &str, raw: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| Error::InvalidIdentifier {
        raw: raw.to_string(),
    })
}

/// Lower a register tree to the typed IR.
pub fn lower(root: &Node, config: &GeneratorConfig) -> Result<TranslationUnit> {
    config.validate()?;
    Compiler::new(config).finish(root)
}

/// Generate the translation unit for an already parsed register tree.
pub fn compile_node(root: &Node, config: &GeneratorConfig) -> Result<String> {
    let unit = lower(root, config)?;
    // Resolve every address up front so overflow is reported here rather
    // than when the emitted code is compiled.
    let registers = flatten(root, config.root_base, config.transform())?;
    info!(
        "Generated {} block types for {} registers under {}",
        unit.composites.len(),
        registers.len(),
        root.id
    );
    render::render_unit(&unit, config)
}

/// Generate the translation unit for a schema document.
pub fn compile_str(xml: &str, config: &GeneratorConfig) -> Result<String> {
    compile_node(&schema::parse_document(xml)?, config)
}

/// Generate the translation unit for a schema file.
pub fn compile_file(path: &Path, config: &GeneratorConfig) -> Result<String> {
    compile_node(&schema::load(path)?, config)
}
