// Licensed under the Apache-2.0 license

//! Register declarations generated from `schema/example.xml`.
//!
//! `registers::GEM_AMC` is the memory-mapped instance. The same tree can be
//! rebuilt with any generator through `generate` and `rebind`.

pub mod access;

#[allow(clippy::all)]
pub mod registers {
    include!(concat!(env!("OUT_DIR"), "/registers.rs"));
}
