//! Vendor/product extraction from free-form device identifiers
//!
//! Hosts report identifiers in several shapes:
//!
//! ```text
//! 45e-28e-Xbox 360 Wired Controller          (dash separated)
//! USB Gamepad (Vendor: 0079 Product: 0006)   (labelled)
//! ```
//!
//! Parsing never fails. An identifier nothing recognises yields ids that
//! simply match no catalog entry.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static LABELLED_IDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)vendor: ([A-Za-z0-9_]+) product: ([A-Za-z0-9_]+)")
        .expect("labelled id pattern is valid")
});

static PAIRED_IDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9_]+)-([A-Za-z0-9_]+)")
        .expect("paired id pattern is valid")
});

/// Vendor and product id of a device model
///
/// Ids stay strings: hosts report them as hex-like tokens (`45e`, `28e`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorIdentity {
    pub vendor_id: String,
    pub product_id: String,
}

impl VendorIdentity {
    pub fn new(vendor_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            product_id: product_id.into(),
        }
    }

    /// Parses an identifier string, see [`parse_vendor_product`]
    pub fn parse(id: &str) -> Self {
        parse_vendor_product(id)
    }

    pub fn is_empty(&self) -> bool {
        self.vendor_id.is_empty() && self.product_id.is_empty()
    }
}

impl fmt::Display for VendorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vendor_id, self.product_id)
    }
}

/// Extracts vendor and product ids from a device identifier
///
/// Tries, in order: the labelled `Vendor: x Product: y` form (only when the
/// identifier has no dash), the first `a-b` token pair, then the first two
/// dash-separated segments.
pub fn parse_vendor_product(id: &str) -> VendorIdentity {
    let segments: Vec<&str> = id.split('-').collect();

    if segments.len() < 2 {
        if let Some(identity) = capture_pair(&LABELLED_IDS, id) {
            return identity;
        }
    }

    if let Some(identity) = capture_pair(&PAIRED_IDS, id) {
        return identity;
    }

    let mut segments = segments.into_iter();
    VendorIdentity {
        vendor_id: strip_leading_zeros(segments.next().unwrap_or_default()),
        product_id: strip_leading_zeros(segments.next().unwrap_or_default()),
    }
}

fn capture_pair(pattern: &Regex, id: &str) -> Option<VendorIdentity> {
    let captures = pattern.captures(id)?;
    let vendor = captures.get(1)?.as_str();
    let product = captures.get(2)?.as_str();

    Some(VendorIdentity {
        vendor_id: strip_leading_zeros(vendor),
        product_id: strip_leading_zeros(product),
    })
}

/// Drops leading zeros that are followed by another digit
///
/// `"0079"` becomes `"79"`, a lone `"0"` is kept.
pub fn strip_leading_zeros(token: &str) -> String {
    let mut rest = token;
    while rest.starts_with('0') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
        rest = &rest[1..];
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_dash_separated_ids() {
        assert_eq!(parse_vendor_product("79-6"), VendorIdentity::new("79", "6"));
        assert_eq!(
            parse_vendor_product("45e-28e-Xbox 360 Wired Controller"),
            VendorIdentity::new("45e", "28e")
        );
    }

    #[test]
    fn parses_labelled_ids_case_insensitively() {
        assert_eq!(
            parse_vendor_product("Vendor: 0079 Product: 0006"),
            VendorIdentity::new("79", "6")
        );
        assert_eq!(
            parse_vendor_product("USB Gamepad (VENDOR: 045e PRODUCT: 028e)"),
            VendorIdentity::new("45e", "28e")
        );
    }

    #[test]
    fn labelled_form_is_skipped_when_dashes_are_present() {
        // The dash pair wins even though a labelled pair exists
        assert_eq!(
            parse_vendor_product("Pad-One (Vendor: 0079 Product: 0006)"),
            VendorIdentity::new("Pad", "One")
        );
    }

    #[test]
    fn falls_back_to_raw_segments() {
        assert_eq!(
            parse_vendor_product("Xbox 360 Controller (XInput STANDARD GAMEPAD)"),
            VendorIdentity::new("Xbox 360 Controller (XInput STANDARD GAMEPAD)", "")
        );
        assert_eq!(parse_vendor_product(""), VendorIdentity::default());
        assert_eq!(
            parse_vendor_product("(x)-(y)"),
            VendorIdentity::new("(x)", "(y)")
        );
    }

    #[test]
    fn strips_only_zeros_followed_by_digits() {
        assert_eq!(strip_leading_zeros("0079"), "79");
        assert_eq!(strip_leading_zeros("0"), "0");
        assert_eq!(strip_leading_zeros("000"), "0");
        assert_eq!(strip_leading_zeros("045e"), "45e");
        assert_eq!(strip_leading_zeros("00ab"), "0ab");
        assert_eq!(strip_leading_zeros("abc"), "abc");
        assert_eq!(strip_leading_zeros(""), "");
    }

    proptest! {
        #[test]
        fn prop_parse_is_deterministic(id in ".{0,48}") {
            prop_assert_eq!(parse_vendor_product(&id), parse_vendor_product(&id));
        }

        #[test]
        fn prop_hex_pairs_lose_leading_zeros(vendor in 0u16..=0xffff, product in 0u16..=0xffff) {
            let id = format!("{:04x}-{:04x}-Some Pad", vendor, product);
            let identity = parse_vendor_product(&id);
            prop_assert_eq!(identity.vendor_id, strip_leading_zeros(&format!("{:04x}", vendor)));
            prop_assert_eq!(identity.product_id, strip_leading_zeros(&format!("{:04x}", product)));
        }

        #[test]
        fn prop_labelled_decimal_ids_round_to_numbers(vendor in 0u32..100_000, product in 0u32..100_000) {
            let id = format!("Pad (Vendor: {:06} Product: {:06})", vendor, product);
            let identity = parse_vendor_product(&id);
            prop_assert_eq!(identity.vendor_id, vendor.to_string());
            prop_assert_eq!(identity.product_id, product.to_string());
        }
    }
}
