// Licensed under the Apache-2.0 license

//! Leaf access types bound by the generated `Hardware` binding.
//!
//! These only describe a register: its bus address and the bits it covers.
//! Bus transactions are left to the caller, which passes raw 32-bit words to
//! the masked helpers below.

/// Location and bit field of one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    address: u32,
    mask: u32,
}

impl Field {
    pub const fn new(address: u32, mask: u32) -> Self {
        Self { address, mask }
    }

    pub const fn address(&self) -> u32 {
        self.address
    }

    pub const fn mask(&self) -> u32 {
        self.mask
    }

    const fn shift(&self) -> u32 {
        if self.mask == 0 {
            0
        } else {
            self.mask.trailing_zeros()
        }
    }

    /// Value of the field within the raw word `raw`.
    pub const fn extract(&self, raw: u32) -> u32 {
        (raw & self.mask) >> self.shift()
    }

    /// Word to write back after storing `value` in the field, or `None` if
    /// `value` does not fit. Bits outside the mask are kept from `raw`.
    pub const fn insert(&self, raw: u32, value: u32) -> Option<u32> {
        let shift = self.shift();
        if value & !(self.mask >> shift) != 0 {
            return None;
        }
        Some((raw & !self.mask) | (value << shift))
    }
}

macro_rules! access_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name(Field);

        impl $name {
            pub const fn new(address: u32, mask: u32) -> Self {
                Self(Field::new(address, mask))
            }

            pub const fn field(&self) -> Field {
                self.0
            }

            pub const fn address(&self) -> u32 {
                self.0.address()
            }

            pub const fn mask(&self) -> u32 {
                self.0.mask()
            }
        }
    };
}

access_type!(
    /// A register that can only be read.
    ReadOnly
);
access_type!(
    /// A register that can only be written.
    WriteOnly
);
access_type!(
    /// A register that can be read and written.
    ReadWrite
);

impl ReadOnly {
    pub const fn read(&self, raw: u32) -> u32 {
        self.0.extract(raw)
    }
}

impl WriteOnly {
    /// Word to write. Write-only registers are never masked, so the word is
    /// `value` itself when it fits.
    pub const fn write(&self, value: u32) -> Option<u32> {
        self.0.insert(0, value)
    }
}

impl ReadWrite {
    pub const fn read(&self, raw: u32) -> u32 {
        self.0.extract(raw)
    }

    pub const fn modify(&self, raw: u32, value: u32) -> Option<u32> {
        self.0.insert(raw, value)
    }
}
