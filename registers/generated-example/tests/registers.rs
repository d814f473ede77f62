// Licensed under the Apache-2.0 license

//! Exercises the code generated from `schema/example.xml`.

use regmap_generated_example::access::{ReadOnly, ReadWrite, WriteOnly};
use regmap_generated_example::registers::{get_address, Generated, RegisterGenerator, GEM_AMC};
use regmap_generator::{flatten, schema, GeneratorConfig, ResolvedRegister};
use std::path::Path;

/// Register table resolved by the generator itself.
fn resolved() -> Vec<ResolvedRegister> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("schema/example.xml");
    let root = schema::load(&path).unwrap();
    let config = GeneratorConfig::default();
    flatten(&root, config.root_base, config.transform()).unwrap()
}

/// Hands out consecutive indices.
#[derive(Default)]
struct Counter {
    next: usize,
}

impl RegisterGenerator for Counter {
    type Register = usize;

    fn generate(&mut self, _address: u32, _mask: u32, _read: bool, _write: bool) -> usize {
        self.next += 1;
        self.next - 1
    }
}

#[test]
fn test_memory_mapped_tree() {
    assert_eq!(GEM_AMC.base(), 0);
    assert_eq!(GEM_AMC.GEM_SYSTEM.base(), 0x90_0000);

    let board_id: &ReadOnly = &GEM_AMC.GEM_SYSTEM.BOARD_ID;
    assert_eq!(board_id.address(), 0x6400_0000 + (0x90_0000 << 2));
    assert_eq!(board_id.mask(), 0xffff_ffff);

    let reset: &ReadWrite = &GEM_AMC.GEM_SYSTEM.CTRL.LINK_RESET;
    assert_eq!(reset.address(), get_address(0x90_0001, 0));
    assert_eq!(reset.mask(), 0x2);
    assert_eq!(reset.modify(0x1, 1), Some(0x3));

    let version = &GEM_AMC.GEM_SYSTEM.VERSION;
    assert_eq!(version.read(0x0102_0003), 0x0102);

    let oh = &GEM_AMC.OH.OH[2];
    assert_eq!(oh.base(), 0x40_0000 + 2 * 0x1_0000);
    assert_eq!(oh.VFAT[1].base(), oh.base() + 0x1100);
    let channel: &WriteOnly = &oh.VFAT[1].CHANNEL[3];
    assert_eq!(channel.address(), get_address(oh.base() + 0x1100, 0x13));
    assert_eq!(oh.FPGA.TTC[1].mask(), 0xff00);
}

fn same_type<T>(_: &T, _: &T) {}

#[test]
fn test_identical_blocks_share_a_type() {
    let trigger = &GEM_AMC.TRIGGER.FPGA;
    let link = &GEM_AMC.OH.OH[1].FPGA;
    same_type(trigger, link);
    assert_eq!(trigger.base(), 0x80_0200);
    assert_eq!(link.base(), 0x41_0000);
    assert_eq!(trigger.TTC[0].address(), get_address(0x80_0200, 0x10));
    assert_eq!(
        GEM_AMC.TRIGGER.OH.OH.LINK_ERRORS.address(),
        get_address(0x80_0100, 0)
    );
}

#[test]
fn test_collected_addresses_match_flatten() {
    let expected: Vec<_> = resolved()
        .iter()
        .map(|reg| (reg.address, reg.mask, reg.read, reg.write))
        .collect();

    let mut collected = Vec::new();
    {
        let mut collect = |address: u32, mask: u32, read: bool, write: bool| {
            collected.push((address, mask, read, write));
        };
        GEM_AMC::<Generated<_>>::rebind(&mut collect, &GEM_AMC);
    }
    assert_eq!(collected, expected);

    let mut generated = Vec::new();
    {
        let mut collect = |address: u32, mask: u32, read: bool, write: bool| {
            generated.push((address, mask, read, write));
        };
        GEM_AMC::<Generated<_>>::generate(&mut collect, GEM_AMC.base());
    }
    assert_eq!(generated, expected);
}

#[test]
fn test_count_registers() {
    let mut counter = Counter::default();
    let indexed = GEM_AMC.bind(&mut counter);
    assert_eq!(counter.next, resolved().len());

    // Indices follow declaration order.
    assert_eq!(indexed.GEM_SYSTEM.BOARD_ID, 0);
    assert_eq!(indexed.GEM_SYSTEM.CTRL.GLOBAL_RESET, 1);
    assert_eq!(indexed.GEM_SYSTEM.CTRL.LINK_RESET, 2);
    assert_eq!(indexed.GEM_SYSTEM.CTRL.SOFT_RESET, 3);
    assert_eq!(indexed.GEM_SYSTEM.NUM_OF_OH, 5);
    assert_eq!(indexed.OH.OH[0].FPGA.STATUS, 6);
    assert_eq!(indexed.OH.OH[0].FPGA.TTC, [7, 8]);
    assert_eq!(indexed.TRIGGER.OH.OH.LINK_ERRORS, counter.next - 1);
    assert_eq!(indexed.OH.OH[1].base(), GEM_AMC.OH.OH[1].base());
}

#[test]
fn test_rebind_subtree() {
    let vfat = &GEM_AMC.OH.OH[3].VFAT[2];
    let expected: Vec<u32> = resolved()
        .iter()
        .filter(|reg| reg.path.starts_with("GEM_AMC.OH.OH[3].VFAT[2]."))
        .map(|reg| reg.address)
        .collect();
    assert_eq!(expected.len(), 7);

    let mut seen = Vec::new();
    let mut collect = |address: u32, _mask: u32, _read: bool, _write: bool| {
        seen.push(address);
        address
    };
    let rebound = vfat.bind(&mut collect);
    assert_eq!(rebound.base(), vfat.base());
    assert_eq!(rebound.HW_ID, vfat.HW_ID.address());
    assert_eq!(rebound.CHANNEL[0], vfat.CHANNEL[0].address());
    assert_eq!(seen, expected);
}
