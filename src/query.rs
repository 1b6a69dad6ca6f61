//! Forward lookups and enumeration over a [`Registry`]
//!
//! Vendors are sorted by id and each vendor's products are sorted by id
//! within its range, so every forward lookup is one or two binary searches.
//! Enumerations borrow the stored arrays directly; nothing is rebuilt per
//! call.

use crate::models::{Product, Vendor};
use crate::registry::Registry;

/// Exact-match binary search over an ascending slice
///
/// Returns the index of the element whose key equals `id`, or `None`. No
/// insertion point is reported.
pub(crate) fn binary_search_by_id<T>(
    items: &[T],
    id: u16,
    key: impl Fn(&T) -> u16,
) -> Option<usize> {
    let mut lo = 0usize;
    let mut hi = items.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let candidate = key(&items[mid]);

        if candidate == id {
            return Some(mid);
        } else if candidate < id {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    None
}

impl Registry {
    /// Look up a vendor record by id
    pub fn vendor(&self, id: u16) -> Option<&Vendor> {
        binary_search_by_id(&self.vendors, id, |v| v.id).map(|i| &self.vendors[i])
    }

    /// Name of the vendor with the given id
    pub fn vendor_name(&self, id: u16) -> Option<&str> {
        self.vendor(id).map(|v| &*v.name)
    }

    /// All products of a vendor, empty when the vendor is unknown
    pub fn vendor_products(&self, vendor_id: u16) -> &[Product] {
        match self.vendor(vendor_id) {
            Some(vendor) => &self.products[vendor.product_range()],
            None => &[],
        }
    }

    /// Look up a product record within its vendor
    pub fn product(&self, vendor_id: u16, product_id: u16) -> Option<&Product> {
        let vendor = self.vendor(vendor_id)?;
        let products = &self.products[vendor.product_range()];
        binary_search_by_id(products, product_id, |p| p.id).map(|i| &products[i])
    }

    /// Name of a product, resolved through its vendor
    pub fn product_name(&self, vendor_id: u16, product_id: u16) -> Option<&str> {
        self.product(vendor_id, product_id).map(|p| &*p.name)
    }

    /// Every vendor as `(id, name)`, ascending by id
    pub fn vendors(
        &self,
    ) -> impl ExactSizeIterator<Item = (u16, &str)> + DoubleEndedIterator + '_ {
        self.vendors.iter().map(|v| (v.id, &*v.name))
    }

    /// Every product of a vendor as `(id, name)`, ascending by id
    ///
    /// Yields nothing for an unknown vendor or a vendor without products.
    pub fn products(
        &self,
        vendor_id: u16,
    ) -> impl ExactSizeIterator<Item = (u16, &str)> + DoubleEndedIterator + '_ {
        self.vendor_products(vendor_id).iter().map(|p| (p.id, &*p.name))
    }
}
