// Licensed under the Apache-2.0 license

//! Rendering of the IR into Rust source.
//!
//! Every item is built with `quote`, the whole unit is checked by parsing it
//! with `syn`, and `prettyplease` produces the final text.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::ir::{Composite, Member, MemberKind, Placement, RootInstance, TranslationUnit};
use crate::util::hex_const;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::LitInt;

/// Names the emitted code declares or refers to by a relative path; no root
/// instance may reuse them.
pub(super) const RESERVED_NAMES: &[&str] = &[
    "RegisterGenerator",
    "Binding",
    "Hardware",
    "Generated",
    "get_address",
    "u32",
    "bool",
];

const HEADER: &str = "// Generated by regmap-gen. Do not edit.\n\n";

/// Render a complete translation unit.
pub(super) fn render_unit(unit: &TranslationUnit, config: &GeneratorConfig) -> Result<String> {
    let scaffolding = scaffolding(config)?;
    let composites = unit
        .composites
        .iter()
        .map(|c| composite(c, config))
        .collect::<Result<Vec<_>>>()?;
    let root = root_instance(&unit.root, config);
    let tokens = quote! {
        #scaffolding
        #(#composites)*
        #root
    };
    let file = syn::parse2::<syn::File>(tokens)?;
    Ok(format!("{HEADER}{}", prettyplease::unparse(&file)))
}

/// Canonical rendering of a block body, used to derive its content hash.
///
/// It covers the member declarations and the relative address, mask and
/// permission of every register, but nothing that depends on where the
/// block is placed or on the configuration.
pub(super) fn canonical_body(members: &[Member]) -> String {
    let fields = members.iter().map(field);
    let inits = members
        .iter()
        .map(|m| generator_init(m, &quote!(base)));
    quote! {
        { #(#fields,)* } { #(#inits,)* }
    }
    .to_string()
}

fn int(value: u32) -> LitInt {
    LitInt::new(&hex_const(value as u64), proc_macro2::Span::call_site())
}

fn bool_lit(value: bool) -> TokenStream {
    if value {
        quote!(true)
    } else {
        quote!(false)
    }
}

fn doc_attrs(doc: &Option<String>) -> TokenStream {
    let lines = doc
        .iter()
        .flat_map(|d| d.trim().lines())
        .map(|line| format!(" {}", line.trim_end()));
    quote! { #(#[doc = #lines])* }
}

fn access_path(config: &GeneratorConfig) -> Result<syn::Path> {
    Ok(syn::parse_str::<syn::Path>(&config.access_path)?)
}

fn scaffolding(config: &GeneratorConfig) -> Result<TokenStream> {
    let origin = int(config.origin);
    let shift = Literal::u32_unsuffixed(config.word_shift);
    let hardware = if config.address_constructor {
        let access = access_path(config)?;
        quote! {
            /// Binds every register to the memory-mapped access types.
            pub struct Hardware;

            impl Binding for Hardware {
                type ReadOnly = #access::ReadOnly;
                type WriteOnly = #access::WriteOnly;
                type ReadWrite = #access::ReadWrite;
            }
        }
    } else {
        TokenStream::new()
    };
    Ok(quote! {
        /// Produces the value stored for each register of a tree.
        ///
        /// Implemented for every `FnMut(address, mask, read, write) -> R`.
        pub trait RegisterGenerator {
            type Register;

            fn generate(&mut self, address: u32, mask: u32, read: bool, write: bool) -> Self::Register;
        }

        impl<R, F> RegisterGenerator for F
        where
            F: FnMut(u32, u32, bool, bool) -> R,
        {
            type Register = R;

            fn generate(&mut self, address: u32, mask: u32, read: bool, write: bool) -> R {
                self(address, mask, read, write)
            }
        }

        /// Maps register permissions to the types stored in a tree.
        pub trait Binding {
            type ReadOnly;
            type WriteOnly;
            type ReadWrite;
        }

        #hardware

        /// Binds every register to the output of the generator `G`.
        pub struct Generated<G>(::core::marker::PhantomData<G>);

        impl<G: RegisterGenerator> Binding for Generated<G> {
            type ReadOnly = G::Register;
            type WriteOnly = G::Register;
            type ReadWrite = G::Register;
        }

        /// Bus address of the word at `local` in the block based at `base`.
        pub const fn get_address(base: u32, local: u32) -> u32 {
            ((base + local) << #shift) + #origin
        }
    })
}

/// Type resolution: the declared type of a member under binding `B`.
fn member_type(member: &Member) -> TokenStream {
    let scalar = match &member.kind {
        MemberKind::Register(access) => match (access.read, access.write) {
            (true, true) => quote!(B::ReadWrite),
            (true, false) => quote!(B::ReadOnly),
            _ => quote!(B::WriteOnly),
        },
        MemberKind::Block(ty) => quote!(#ty<B>),
    };
    match &member.placement {
        Placement::Single(_) => scalar,
        Placement::Array(addresses) => {
            let size = Literal::usize_unsuffixed(addresses.len());
            quote!([#scalar; #size])
        }
    }
}

fn field(member: &Member) -> TokenStream {
    let doc = doc_attrs(&member.doc);
    let name = &member.name;
    let ty = member_type(member);
    quote! { #doc pub #name: #ty }
}

/// Wraps per-instance initializers into a scalar or an array expression.
fn placed(placement: &Placement, init: impl Fn(usize, u32) -> TokenStream) -> TokenStream {
    match placement {
        Placement::Single(address) => init(0, *address),
        Placement::Array(addresses) => {
            let elems = addresses.iter().enumerate().map(|(i, a)| init(i, *a));
            quote!([#(#elems),*])
        }
    }
}

fn address_init(member: &Member, access: &syn::Path) -> TokenStream {
    let name = &member.name;
    let value = placed(&member.placement, |_, local| {
        let local = int(local);
        match &member.kind {
            MemberKind::Register(leaf) => {
                let ty = match (leaf.read, leaf.write) {
                    (true, true) => quote!(ReadWrite),
                    (true, false) => quote!(ReadOnly),
                    _ => quote!(WriteOnly),
                };
                let mask = int(leaf.mask);
                quote!(#access::#ty::new(get_address(base, #local), #mask))
            }
            MemberKind::Block(ty) => quote!(#ty::<Hardware>::new(base + #local)),
        }
    });
    quote! { #name: #value }
}

fn generator_init(member: &Member, base: &TokenStream) -> TokenStream {
    let name = &member.name;
    let value = placed(&member.placement, |_, local| {
        let local = int(local);
        match &member.kind {
            MemberKind::Register(leaf) => {
                let mask = int(leaf.mask);
                let (read, write) = (bool_lit(leaf.read), bool_lit(leaf.write));
                quote!(generator.generate(get_address(#base, #local), #mask, #read, #write))
            }
            MemberKind::Block(ty) => {
                quote!(#ty::<Generated<G>>::generate(generator, #base + #local))
            }
        }
    });
    quote! { #name: #value }
}

fn rebind_init(member: &Member) -> TokenStream {
    let name = &member.name;
    let value = placed(&member.placement, |i, local| {
        let local = int(local);
        match &member.kind {
            MemberKind::Register(leaf) => {
                let mask = int(leaf.mask);
                let (read, write) = (bool_lit(leaf.read), bool_lit(leaf.write));
                quote!(generator.generate(get_address(other.__base, #local), #mask, #read, #write))
            }
            MemberKind::Block(ty) => {
                let source = match &member.placement {
                    Placement::Single(_) => quote!(other.#name),
                    Placement::Array(_) => {
                        let i = Literal::usize_unsuffixed(i);
                        quote!(other.#name[#i])
                    }
                };
                quote!(#ty::<Generated<G>>::rebind(generator, &#source))
            }
        }
    });
    quote! { #name: #value }
}

fn composite(c: &Composite, config: &GeneratorConfig) -> Result<TokenStream> {
    let name = &c.name;
    let doc = doc_attrs(&c.doc);
    let fields = c.members.iter().map(field);
    let binding = if config.address_constructor {
        quote!(B: Binding = Hardware)
    } else {
        quote!(B: Binding)
    };

    let address_ctor = if config.address_constructor {
        let access = access_path(config)?;
        let inits = c.members.iter().map(|m| address_init(m, &access));
        quote! {
            impl #name<Hardware> {
                /// Build the block at word address `base`.
                pub const fn new(base: u32) -> Self {
                    Self {
                        __base: base,
                        #(#inits,)*
                    }
                }
            }
        }
    } else {
        TokenStream::new()
    };

    let generator_ctor = if config.generator_constructor {
        let base = quote!(base);
        let generate_inits = c.members.iter().map(|m| generator_init(m, &base));
        let rebind_inits = c.members.iter().map(rebind_init);
        quote! {
            impl<G: RegisterGenerator> #name<Generated<G>> {
                /// Build the block at word address `base`, asking `generator`
                /// for every register in declaration order.
                pub fn generate(generator: &mut G, base: u32) -> Self {
                    Self {
                        __base: base,
                        #(#generate_inits,)*
                    }
                }

                /// Rebuild `other` with registers produced by `generator`.
                pub fn rebind<O: Binding>(generator: &mut G, other: &#name<O>) -> Self {
                    Self {
                        __base: other.__base,
                        #(#rebind_inits,)*
                    }
                }
            }
        }
    } else {
        TokenStream::new()
    };

    let bind = if config.generator_constructor {
        quote! {
            /// Rebuild this block with registers produced by `generator`.
            pub fn bind<G: RegisterGenerator>(&self, generator: &mut G) -> #name<Generated<G>> {
                #name::<Generated<G>>::rebind(generator, self)
            }
        }
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        #doc
        #[allow(non_camel_case_types, non_snake_case)]
        pub struct #name<#binding> {
            __base: u32,
            #(#fields,)*
        }

        impl<B: Binding> #name<B> {
            /// Word address this block was built at.
            pub const fn base(&self) -> u32 {
                self.__base
            }

            #bind
        }

        #address_ctor
        #generator_ctor
    })
}

fn root_instance(root: &RootInstance, config: &GeneratorConfig) -> TokenStream {
    let RootInstance { name, ty, .. } = root;
    let doc = doc_attrs(&root.doc);
    let base = int(root.base);
    let (alias, instance) = if config.address_constructor {
        (
            quote! {
                #[allow(non_camel_case_types)]
                pub type #name<B = Hardware> = #ty<B>;
            },
            quote! {
                #doc
                #[allow(non_upper_case_globals)]
                pub const #name: #ty = #ty::<Hardware>::new(#base);
            },
        )
    } else {
        (
            quote! {
                #[allow(non_camel_case_types)]
                pub type #name<B> = #ty<B>;
            },
            quote! {
                #doc
                #[allow(non_snake_case)]
                pub fn #name<G: RegisterGenerator>(generator: &mut G) -> #ty<Generated<G>> {
                    #ty::<Generated<G>>::generate(generator, #base)
                }
            },
        )
    };
    quote! {
        /// Type of the top-level block.
        #alias
        #instance
    }
}
