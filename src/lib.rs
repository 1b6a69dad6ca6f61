//! hwids: USB vendor and product name lookups
//!
//! hwids parses the Linux `usb.ids` registry into two flat, sorted arrays and
//! answers id -> name queries with binary search. Name -> id queries are
//! served from case-insensitive maps built lazily on first use.
//!
//! # Architecture
//!
//! - **Parser**: single pass over the text; rebuilds the vendor/product hierarchy
//! - **Registry**: immutable vendor and product arrays plus header metadata
//! - **Query**: binary-search lookups and ordered enumeration
//! - **Reverse index**: lazily built, cached name -> id maps
//!
//! # Example Usage
//!
//! ```
//! // The process-wide registry is parsed from the embedded snapshot on first use
//! assert_eq!(hwids::vendor_name(0x046d), Some("Logitech, Inc."));
//! assert_eq!(hwids::product_name(0x046d, 0x0802), Some("Webcam C200"));
//! assert_eq!(hwids::vendor_id_by_name("logitech, inc."), Some(0x046d));
//!
//! // Or parse any registry text yourself
//! let registry = hwids::Registry::parse("1d6b  Linux Foundation\n\t0002  2.0 root hub\n");
//! assert_eq!(registry.product_name(0x1d6b, 0x0002), Some("2.0 root hub"));
//! ```

pub mod cli;
pub mod error;
pub mod global;
pub mod models;
pub mod output;
pub(crate) mod parser;
pub mod query;
pub mod registry;
pub mod reverse;

// Re-export commonly used types
pub use error::RegistryError;
pub use global::{install, registry};
pub use models::{Product, RegistryStats, Vendor};
pub use registry::{Registry, EMBEDDED_USB_IDS};

/// Fingerprint of the embedded registry snapshot (blake3, 16 hex chars)
pub const DATA_FINGERPRINT: &str = env!("REGISTRY_DATA_FINGERPRINT");

/// Header `Version:` of the shared registry
pub fn version() -> Option<&'static str> {
    registry().version()
}

/// Header `Date:` of the shared registry
pub fn date() -> Option<&'static str> {
    registry().date()
}

/// Vendor name for `vendor_id`
pub fn vendor_name(vendor_id: u16) -> Option<&'static str> {
    registry().vendor_name(vendor_id)
}

/// Product name for `product_id` under `vendor_id`
pub fn product_name(vendor_id: u16, product_id: u16) -> Option<&'static str> {
    registry().product_name(vendor_id, product_id)
}

/// Vendor id for a vendor name, ignoring case
pub fn vendor_id_by_name(name: &str) -> Option<u16> {
    registry().vendor_id_by_name(name)
}

/// Product id for a product name under `vendor_id`, ignoring case
pub fn product_id_by_name(vendor_id: u16, name: &str) -> Option<u16> {
    registry().product_id_by_name(vendor_id, name)
}

/// All vendors as `(id, name)`, ascending by id
pub fn vendors() -> impl ExactSizeIterator<Item = (u16, &'static str)> + DoubleEndedIterator
{
    registry().vendors()
}

/// All products of a vendor as `(id, name)`, ascending by id
pub fn products(
    vendor_id: u16,
) -> impl ExactSizeIterator<Item = (u16, &'static str)> + DoubleEndedIterator {
    registry().products(vendor_id)
}
