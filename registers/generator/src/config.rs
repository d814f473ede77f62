// Licensed under the Apache-2.0 license

//! Configuration for address resolution and code emission.
//!
//! [`GeneratorConfig`] controls the memory-map transform applied to every
//! register address, the module that provides the leaf access types, and
//! which constructor strategies are emitted for each generated block.
//!
//! It can be built in code or loaded from TOML; every field is optional in
//! TOML and falls back to the defaults below.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default origin of the target memory map.
pub const DEFAULT_ORIGIN: u32 = 0x6400_0000;

/// Default shift converting word addresses to byte addresses.
pub const DEFAULT_WORD_SHIFT: u32 = 2;

/// Default module path of the `ReadOnly`/`WriteOnly`/`ReadWrite` types.
pub const DEFAULT_ACCESS_PATH: &str = "crate::access";

/// Configuration for a compilation run.
///
/// # Example
///
/// ```
/// use regmap_generator::config::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_origin(0x1000_0000)
///     .with_access_path("my_hal::regs")
///     .with_generator_constructor(false);
/// assert_eq!(config.transform().absolute(0, 0x4), Some(0x1000_0010));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Added to every register address after the word shift.
    pub origin: u32,

    /// Left shift applied to `base + local` before adding the origin.
    pub word_shift: u32,

    /// Base address the root instance is constructed at.
    pub root_base: u32,

    /// Module path providing the leaf access types.
    pub access_path: String,

    /// Emit the address-based `new(base)` constructor.
    pub address_constructor: bool,

    /// Emit the generator-based `generate`/`rebind` constructors.
    pub generator_constructor: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            word_shift: DEFAULT_WORD_SHIFT,
            root_base: 0,
            access_path: DEFAULT_ACCESS_PATH.to_string(),
            address_constructor: true,
            generator_constructor: true,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&s)
    }

    /// Set the memory-map origin.
    pub fn with_origin(mut self, origin: u32) -> Self {
        self.origin = origin;
        self
    }

    /// Set the word shift.
    pub fn with_word_shift(mut self, shift: u32) -> Self {
        self.word_shift = shift;
        self
    }

    /// Set the base address of the root instance.
    pub fn with_root_base(mut self, base: u32) -> Self {
        self.root_base = base;
        self
    }

    /// Set the module path of the leaf access types.
    pub fn with_access_path(mut self, path: &str) -> Self {
        self.access_path = path.to_string();
        self
    }

    /// Enable or disable the address-based constructor.
    pub fn with_address_constructor(mut self, enabled: bool) -> Self {
        self.address_constructor = enabled;
        self
    }

    /// Enable or disable the generator-based constructors.
    pub fn with_generator_constructor(mut self, enabled: bool) -> Self {
        self.generator_constructor = enabled;
        self
    }

    /// The address transform described by this configuration.
    pub fn transform(&self) -> AddressTransform {
        AddressTransform {
            origin: self.origin,
            word_shift: self.word_shift,
        }
    }

    /// Check that the configuration can produce usable code.
    pub fn validate(&self) -> Result<()> {
        if !self.address_constructor && !self.generator_constructor {
            return Err(Error::InvalidConfig(
                "at least one constructor strategy must be enabled".to_string(),
            ));
        }
        if self.word_shift >= u32::BITS {
            return Err(Error::InvalidConfig(format!(
                "word_shift {} is too large",
                self.word_shift
            )));
        }
        syn::parse_str::<syn::Path>(&self.access_path).map_err(|_| {
            Error::InvalidConfig(format!("access_path \"{}\" is not a path", self.access_path))
        })?;
        Ok(())
    }
}

/// Maps a word address relative to the map root to a bus address:
/// `((base + local) << word_shift) + origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressTransform {
    pub origin: u32,
    pub word_shift: u32,
}

impl AddressTransform {
    /// Apply the transform, returning `None` on 32-bit overflow.
    pub fn absolute(&self, base: u32, local: u32) -> Option<u32> {
        let word = base.checked_add(local)?;
        let shifted = word.checked_shl(self.word_shift)?;
        // checked_shl only rejects oversized shifts; bits shifted out are lost.
        if shifted >> self.word_shift != word {
            return None;
        }
        shifted.checked_add(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.origin, 0x6400_0000);
        assert_eq!(config.word_shift, 2);
        assert_eq!(config.access_path, "crate::access");
        assert!(config.address_constructor);
        assert!(config.generator_constructor);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_transform() {
        let t = GeneratorConfig::default().transform();
        assert_eq!(t.absolute(0, 0x10), Some((0x10 << 2) + 0x6400_0000));
        assert_eq!(t.absolute(0x100, 0x2), Some((0x102 << 2) + 0x6400_0000));
        assert_eq!(t.absolute(0x4000_0000, 0), None);
        assert_eq!(t.absolute(u32::MAX, 1), None);
    }

    #[test]
    fn test_from_toml() {
        let config = GeneratorConfig::from_toml_str(
            r#"
origin = 0x2000_0000
access_path = "hal::access"
generator_constructor = false
"#,
        )
        .unwrap();
        assert_eq!(config.origin, 0x2000_0000);
        assert_eq!(config.word_shift, 2);
        assert_eq!(config.access_path, "hal::access");
        assert!(config.address_constructor);
        assert!(!config.generator_constructor);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("orign = 1"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_configs() {
        let none = GeneratorConfig::default()
            .with_address_constructor(false)
            .with_generator_constructor(false);
        assert!(matches!(none.validate(), Err(Error::InvalidConfig(_))));

        let bad_path = GeneratorConfig::default().with_access_path("not a path");
        assert!(matches!(bad_path.validate(), Err(Error::InvalidConfig(_))));

        let bad_shift = GeneratorConfig::default().with_word_shift(32);
        assert!(matches!(bad_shift.validate(), Err(Error::InvalidConfig(_))));
    }
}
