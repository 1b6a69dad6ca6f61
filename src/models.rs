//! Core data models for hwids
//!
//! These are the records stored in a [`Registry`](crate::Registry) and the
//! summary shapes the CLI prints as JSON. Ids serialize as 4-digit lowercase
//! hex, the way they appear in `usb.ids` and in `lsusb` output.

use serde::{Serialize, Serializer};

/// Serialize a 16-bit id as `"046d"`
pub fn serialize_hex_id<S: Serializer>(id: &u16, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:04x}", id))
}

/// A top-level registry entry (USB vendor)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Vendor {
    #[serde(serialize_with = "serialize_hex_id")]
    pub id: u16,
    pub name: Box<str>,
    /// Offset of this vendor's first product in the shared product array
    #[serde(skip)]
    pub product_start: usize,
    /// Number of products owned by this vendor
    #[serde(skip)]
    pub product_count: usize,
}

impl Vendor {
    /// Range of this vendor's products in the shared product array
    pub fn product_range(&self) -> std::ops::Range<usize> {
        self.product_start..self.product_start + self.product_count
    }
}

/// A second-level registry entry (USB product), unique only within its vendor
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Product {
    #[serde(serialize_with = "serialize_hex_id")]
    pub id: u16,
    pub name: Box<str>,
}

/// A resolved vendor/product pair, as printed by `hwid product`
#[derive(Debug, Clone, Serialize)]
pub struct ProductMatch<'a> {
    #[serde(serialize_with = "serialize_hex_id")]
    pub vendor_id: u16,
    pub vendor: &'a str,
    #[serde(serialize_with = "serialize_hex_id")]
    pub product_id: u16,
    pub product: &'a str,
}

/// Summary of a loaded registry
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    /// Header `Version:` value, if present
    pub version: Option<String>,
    /// Header `Date:` value, if present
    pub date: Option<String>,
    pub vendors: usize,
    pub products: usize,
    /// Lines skipped while parsing (malformed, nested, or unrecognized)
    pub skipped_lines: usize,
}
