//! Catalog of per-device remappings onto the standard layout
//!
//! Each entry lists, for every standard button and axis, the raw index the
//! device reports it at. `-1` marks a control the device does not have.
//! Entries are matched in declaration order and the first hit wins, so the
//! table must not contain two entries for the same identity and environment.

use crate::gamepad::{strip_leading_zeros, VendorIdentity, AXIS_COUNT, BUTTON_COUNT};
use crate::host::platform::RuntimeIdentity;
use crate::mapping::error::CatalogError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Order value for a control missing on the device
pub const ABSENT: i16 = -1;

/// Remapping for one device model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub name: String,
    pub engine: Option<String>,
    pub runtime: Option<String>,
    pub vendor_id: String,
    pub product_id: String,
    pub buttons: [i16; BUTTON_COUNT],
    pub axes: [i16; AXIS_COUNT],
}

impl MappingEntry {
    /// Identity entry for devices that already report the standard layout
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            engine: None,
            runtime: None,
            vendor_id: String::new(),
            product_id: String::new(),
            buttons: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
            axes: [0, 1, 2, 3],
        }
    }

    /// Raw index feeding standard button `index`, `None` when absent
    pub fn button_source(&self, index: usize) -> Option<usize> {
        self.buttons.get(index).and_then(|source| source_index(*source))
    }

    /// Raw index feeding standard axis `index`, `None` when absent
    pub fn axis_source(&self, index: usize) -> Option<usize> {
        self.axes.get(index).and_then(|source| source_index(*source))
    }

    /// Whether this entry applies to the device and environment
    pub fn matches(&self, identity: &VendorIdentity, platform: &dyn RuntimeIdentity) -> bool {
        if let Some(engine) = &self.engine {
            if engine != platform.engine() {
                return false;
            }
        }
        if let Some(runtime) = &self.runtime {
            if runtime != platform.runtime() {
                return false;
            }
        }

        self.vendor_id == identity.vendor_id && self.product_id == identity.product_id
    }
}

fn source_index(source: i16) -> Option<usize> {
    usize::try_from(source).ok()
}

/// Serialized form of a catalog entry, as found under `[[mappings]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntryConfig {
    pub name: String,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default, alias = "browser")]
    pub runtime: Option<String>,
    pub vendor_id: String,
    pub product_id: String,
    pub buttons: Vec<i16>,
    pub axes: Vec<i16>,
}

impl TryFrom<MappingEntryConfig> for MappingEntry {
    type Error = CatalogError;

    fn try_from(config: MappingEntryConfig) -> Result<Self, Self::Error> {
        let vendor_id = strip_leading_zeros(config.vendor_id.trim());
        let product_id = strip_leading_zeros(config.product_id.trim());
        if vendor_id.is_empty() || product_id.is_empty() {
            return Err(CatalogError::MissingIdentity(config.name));
        }

        if let Some(index) = config
            .buttons
            .iter()
            .chain(config.axes.iter())
            .find(|index| **index < ABSENT)
        {
            return Err(CatalogError::InvalidIndex {
                name: config.name,
                index: *index,
            });
        }

        let buttons: [i16; BUTTON_COUNT] =
            config
                .buttons
                .as_slice()
                .try_into()
                .map_err(|_| CatalogError::ButtonCount {
                    name: config.name.clone(),
                    expected: BUTTON_COUNT,
                    got: config.buttons.len(),
                })?;
        let axes: [i16; AXIS_COUNT] =
            config
                .axes
                .as_slice()
                .try_into()
                .map_err(|_| CatalogError::AxisCount {
                    name: config.name.clone(),
                    expected: AXIS_COUNT,
                    got: config.axes.len(),
                })?;

        Ok(Self {
            name: config.name,
            engine: config.engine,
            runtime: config.runtime,
            vendor_id,
            product_id,
            buttons,
            axes,
        })
    }
}

/// Ordered, immutable set of mapping entries
#[derive(Debug, Clone)]
pub struct MappingCatalog {
    standard: MappingEntry,
    entries: Vec<MappingEntry>,
}

impl Default for MappingCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MappingCatalog {
    /// Curated entries for known non-standard devices
    pub fn builtin() -> Self {
        Self {
            standard: MappingEntry::standard(),
            entries: vec![n64_gecko(), n64_webkit(), xbox_gecko()],
        }
    }

    /// Built-in entries followed by validated user entries
    pub fn with_entries(
        extra: impl IntoIterator<Item = MappingEntryConfig>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        for config in extra {
            let entry = MappingEntry::try_from(config)?;
            debug!(
                "Adding catalog entry '{}' for {}:{}",
                entry.name, entry.vendor_id, entry.product_id
            );
            catalog.entries.push(entry);
        }
        Ok(catalog)
    }

    pub fn standard(&self) -> &MappingEntry {
        &self.standard
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// First entry matching the device identity in the given environment
    pub fn find_match(
        &self,
        identity: &VendorIdentity,
        platform: &dyn RuntimeIdentity,
    ) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches(identity, platform))
    }
}

// N64 adapter as seen by gecko
fn n64_gecko() -> MappingEntry {
    MappingEntry {
        name: "n64_gecko".to_string(),
        engine: Some("gecko".to_string()),
        runtime: None,
        vendor_id: "79".to_string(),
        product_id: "6".to_string(),
        buttons: [
            2,      // FACE_1: C-down
            1,      // FACE_2: C-right
            3,      // FACE_3: C-left
            0,      // FACE_4: C-up
            4,      // L_SHOULDER_1: L
            5,      // R_SHOULDER_1: R
            ABSENT, // L_SHOULDER_2
            ABSENT, // R_SHOULDER_2
            8,      // SELECT: B
            9,      // START
            ABSENT, // L_STICK_BUTTON
            ABSENT, // R_STICK_BUTTON
            12,     // DPAD_UP
            13,     // DPAD_DOWN
            14,     // DPAD_LEFT
            15,     // DPAD_RIGHT
            ABSENT, // VENDOR
        ],
        axes: [1, 2, ABSENT, ABSENT],
    }
}

// Same adapter on webkit, sticks start one index earlier
fn n64_webkit() -> MappingEntry {
    MappingEntry {
        name: "n64_webkit".to_string(),
        engine: Some("webkit".to_string()),
        axes: [0, 1, ABSENT, ABSENT],
        ..n64_gecko()
    }
}

fn xbox_gecko() -> MappingEntry {
    MappingEntry {
        name: "xbox_gecko".to_string(),
        engine: None,
        runtime: None,
        vendor_id: "45e".to_string(),
        product_id: "28e".to_string(),
        buttons: [0, 1, 2, 3, 4, 5, 15, 16, 9, 8, 6, 7, 11, 12, 13, 14, 10],
        axes: [0, 1, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::platform::PlatformIdentity;

    fn n64() -> VendorIdentity {
        VendorIdentity::new("79", "6")
    }

    fn entry_config() -> MappingEntryConfig {
        MappingEntryConfig {
            name: "arcade_stick".to_string(),
            engine: None,
            runtime: Some("gilrs".to_string()),
            vendor_id: "0f0d".to_string(),
            product_id: "0092".to_string(),
            buttons: (0..17).collect(),
            axes: vec![0, 1, -1, -1],
        }
    }

    #[test]
    fn engine_qualifier_selects_entry() {
        let catalog = MappingCatalog::builtin();

        let gecko = PlatformIdentity::for_runtime("firefox");
        let entry = catalog.find_match(&n64(), &gecko).expect("gecko entry");
        assert_eq!(entry.name, "n64_gecko");
        assert_eq!(entry.axes, [1, 2, ABSENT, ABSENT]);

        let webkit = PlatformIdentity::for_runtime("chrome");
        let entry = catalog.find_match(&n64(), &webkit).expect("webkit entry");
        assert_eq!(entry.name, "n64_webkit");
        assert_eq!(entry.axes, [0, 1, ABSENT, ABSENT]);
    }

    #[test]
    fn unqualified_entry_matches_any_environment() {
        let catalog = MappingCatalog::builtin();
        let xbox = VendorIdentity::new("45e", "28e");

        for platform in [
            PlatformIdentity::native(),
            PlatformIdentity::for_runtime("firefox"),
            PlatformIdentity::for_runtime("chrome"),
        ] {
            let entry = catalog.find_match(&xbox, &platform).expect("xbox entry");
            assert_eq!(entry.name, "xbox_gecko");
        }
    }

    #[test]
    fn unknown_or_empty_identity_has_no_match() {
        let catalog = MappingCatalog::builtin();
        let platform = PlatformIdentity::for_runtime("firefox");

        assert!(catalog.find_match(&VendorIdentity::default(), &platform).is_none());
        assert!(catalog
            .find_match(&VendorIdentity::new("79", "7"), &platform)
            .is_none());
        // Qualified entries never match a foreign engine
        assert!(catalog.find_match(&n64(), &PlatformIdentity::native()).is_none());
    }

    #[test]
    fn absent_sources_resolve_to_none() {
        let entry = n64_gecko();
        assert_eq!(entry.button_source(0), Some(2));
        assert_eq!(entry.button_source(6), None);
        assert_eq!(entry.axis_source(3), None);
        assert_eq!(entry.button_source(BUTTON_COUNT), None);
    }

    #[test]
    fn standard_entry_is_identity() {
        let catalog = MappingCatalog::builtin();
        let standard = catalog.standard();
        for idx in 0..BUTTON_COUNT {
            assert_eq!(standard.button_source(idx), Some(idx));
        }
        for idx in 0..AXIS_COUNT {
            assert_eq!(standard.axis_source(idx), Some(idx));
        }
    }

    #[test]
    fn user_entries_follow_builtins() {
        let catalog = MappingCatalog::with_entries([entry_config()]).expect("valid entry");
        let last = catalog.entries().last().expect("user entry");
        assert_eq!(last.name, "arcade_stick");
        // Only zeros followed by a digit are stripped
        assert_eq!(last.vendor_id, "0f0d");
        assert_eq!(last.product_id, "92");

        let stick = VendorIdentity::new("0f0d", "92");
        assert!(catalog
            .find_match(&stick, &PlatformIdentity::native())
            .is_some());
        assert!(catalog
            .find_match(&stick, &PlatformIdentity::for_runtime("chrome"))
            .is_none());
    }

    #[test]
    fn invalid_user_entries_are_rejected() {
        let mut short = entry_config();
        short.buttons.pop();
        assert_eq!(
            MappingCatalog::with_entries([short]).unwrap_err(),
            CatalogError::ButtonCount {
                name: "arcade_stick".to_string(),
                expected: BUTTON_COUNT,
                got: 16,
            }
        );

        let mut bad_axis = entry_config();
        bad_axis.axes = vec![0, 1, 2];
        assert!(matches!(
            MappingCatalog::with_entries([bad_axis]),
            Err(CatalogError::AxisCount { got: 3, .. })
        ));

        let mut negative = entry_config();
        negative.buttons[3] = -4;
        assert!(matches!(
            MappingCatalog::with_entries([negative]),
            Err(CatalogError::InvalidIndex { index: -4, .. })
        ));

        let mut anonymous = entry_config();
        anonymous.vendor_id = " ".to_string();
        assert_eq!(
            MappingCatalog::with_entries([anonymous]).unwrap_err(),
            CatalogError::MissingIdentity("arcade_stick".to_string())
        );
    }
}
