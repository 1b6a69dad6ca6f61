//! Lazily built name -> id indexes
//!
//! Reverse lookups are rare compared to id lookups, so their maps are only
//! built on first use and then kept for the lifetime of the registry:
//!
//! - one map over all vendor names, built on the first vendor-name query;
//! - one map per vendor over that vendor's product names, built on the first
//!   product-name query against that vendor.
//!
//! Names are folded with `str::to_lowercase` on both sides, and when two
//! entries share a folded name the one that appears first wins.
//!
//! Each map sits in a `OnceLock`, so concurrent first callers block on a
//! single build and all see the same result. The per-vendor cells are handed
//! out from a mutex-guarded table; the mutex only covers fetching or
//! inserting the cell, never the build itself, so two vendors' maps can be
//! built at the same time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::registry::Registry;

/// Case-folded name -> id
pub(crate) type NameIndex = HashMap<String, u16>;

/// Reverse-lookup caches owned by a [`Registry`]
#[derive(Debug, Default)]
pub struct ReverseIndex {
    vendors: OnceLock<NameIndex>,
    products: Mutex<HashMap<u16, Arc<OnceLock<NameIndex>>>>,
}

impl ReverseIndex {
    fn product_cell(&self, vendor_id: u16) -> Arc<OnceLock<NameIndex>> {
        // The table only holds Arcs, a panic elsewhere cannot leave it half-written
        let mut cells = self.products.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(cells.entry(vendor_id).or_default())
    }

    fn built_product_indexes(&self) -> usize {
        let cells = self.products.lock().unwrap_or_else(|e| e.into_inner());
        cells.values().filter(|cell| cell.get().is_some()).count()
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

fn build_index<'a>(entries: impl Iterator<Item = (u16, &'a str)>) -> NameIndex {
    let mut index = NameIndex::new();
    for (id, name) in entries {
        index.entry(fold(name)).or_insert(id);
    }
    index
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

impl Registry {
    /// Resolve a vendor id from its name, ignoring case
    pub fn vendor_id_by_name(&self, name: &str) -> Option<u16> {
        if is_blank(name) {
            return None;
        }

        let index = self.reverse.vendors.get_or_init(|| {
            log::debug!("Building vendor name index ({} vendors)", self.vendors.len());
            build_index(self.vendors())
        });

        index.get(&fold(name)).copied()
    }

    /// Resolve a product id from its name within one vendor, ignoring case
    pub fn product_id_by_name(&self, vendor_id: u16, name: &str) -> Option<u16> {
        if is_blank(name) {
            return None;
        }

        let vendor = self.vendor(vendor_id)?;
        let cell = self.reverse.product_cell(vendor_id);
        let index = cell.get_or_init(|| {
            log::debug!(
                "Building product name index for vendor {:04x} ({} products)",
                vendor_id,
                vendor.product_count
            );
            build_index(
                self.products[vendor.product_range()]
                    .iter()
                    .map(|p| (p.id, &*p.name)),
            )
        });

        index.get(&fold(name)).copied()
    }

    /// Whether the vendor name index has been built yet
    pub fn is_vendor_index_built(&self) -> bool {
        self.reverse.vendors.get().is_some()
    }

    /// Number of vendors whose product name index has been built
    pub fn cached_product_indexes(&self) -> usize {
        self.reverse.built_product_indexes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    const SAMPLE: &str = "\
0001  Acme Corp.
\t0001  Rocket Skates
\t0002  Giant Magnet
\t0003  rocket skates
0002  ACME CORP.
0003  Émile Électronique
\t0010  Caméra
046d  Logitech, Inc.
\t0802  Webcam C200
\tc52b  Unifying Receiver
\tc534  Unifying Receiver
";

    #[test]
    fn test_vendor_id_by_name_case_insensitive() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.vendor_id_by_name("Logitech, Inc."), Some(0x046d));
        assert_eq!(registry.vendor_id_by_name("logitech, inc."), Some(0x046d));
        assert_eq!(registry.vendor_id_by_name("LOGITECH, INC."), Some(0x046d));
        assert_eq!(registry.vendor_id_by_name("émile électronique"), Some(0x0003));
    }

    #[test]
    fn test_vendor_id_by_name_first_occurrence_wins() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.vendor_id_by_name("acme corp."), Some(0x0001));
    }

    #[test]
    fn test_vendor_id_by_name_misses() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.vendor_id_by_name("Logitech"), None);
        assert_eq!(registry.vendor_id_by_name(" Logitech, Inc."), None);
    }

    #[test]
    fn test_blank_name_does_not_build_index() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.vendor_id_by_name(""), None);
        assert_eq!(registry.vendor_id_by_name("   "), None);
        assert!(!registry.is_vendor_index_built());

        assert_eq!(registry.product_id_by_name(0x046d, ""), None);
        assert_eq!(registry.product_id_by_name(0x046d, "\t"), None);
        assert_eq!(registry.cached_product_indexes(), 0);
    }

    #[test]
    fn test_vendor_index_built_once_on_demand() {
        let registry = Registry::parse(SAMPLE);
        assert!(!registry.is_vendor_index_built());

        let first = registry.vendor_id_by_name("acme corp.");
        assert!(registry.is_vendor_index_built());
        let second = registry.vendor_id_by_name("acme corp.");

        assert_eq!(first, second);
    }

    #[test]
    fn test_product_id_by_name() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.product_id_by_name(0x046d, "webcam c200"), Some(0x0802));
        assert_eq!(registry.product_id_by_name(0x0001, "GIANT MAGNET"), Some(0x0002));
        assert_eq!(registry.product_id_by_name(0x0003, "CAMÉRA"), Some(0x0010));
    }

    #[test]
    fn test_product_id_by_name_first_occurrence_wins() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.product_id_by_name(0x0001, "Rocket Skates"), Some(0x0001));
        assert_eq!(registry.product_id_by_name(0x046d, "Unifying Receiver"), Some(0xc52b));
    }

    #[test]
    fn test_product_id_by_name_is_scoped_to_vendor() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.product_id_by_name(0x0001, "Webcam C200"), None);
        assert_eq!(registry.product_id_by_name(0x0002, "Webcam C200"), None);
    }

    #[test]
    fn test_product_id_by_name_unknown_vendor() {
        let registry = Registry::parse(SAMPLE);

        assert_eq!(registry.product_id_by_name(0xdead, "Webcam C200"), None);
        assert_eq!(registry.cached_product_indexes(), 0);
    }

    #[test]
    fn test_product_indexes_cached_per_vendor() {
        let registry = Registry::parse(SAMPLE);

        registry.product_id_by_name(0x046d, "Webcam C200");
        assert_eq!(registry.cached_product_indexes(), 1);

        registry.product_id_by_name(0x046d, "Unifying Receiver");
        assert_eq!(registry.cached_product_indexes(), 1);

        registry.product_id_by_name(0x0001, "Giant Magnet");
        assert_eq!(registry.cached_product_indexes(), 2);
    }

    #[test]
    fn test_concurrent_first_access() {
        let registry = Registry::parse(SAMPLE);
        let threads = 8;
        let barrier = Barrier::new(threads);

        let results: Vec<(Option<u16>, Option<u16>)> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|i| {
                    let registry = &registry;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        let vendor_id = if i % 2 == 0 { 0x046d } else { 0x0001 };
                        let product = if i % 2 == 0 { "webcam c200" } else { "giant magnet" };
                        (
                            registry.vendor_id_by_name("Logitech, Inc."),
                            registry.product_id_by_name(vendor_id, product),
                        )
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, (vendor, product)) in results.into_iter().enumerate() {
            assert_eq!(vendor, Some(0x046d));
            let expected = if i % 2 == 0 { 0x0802 } else { 0x0002 };
            assert_eq!(product, Some(expected));
        }
        assert_eq!(registry.cached_product_indexes(), 2);
    }
}
