//! Single-pass streaming parser for the `usb.ids` text format
//!
//! The format is line oriented and encodes a two-level hierarchy through
//! leading tabs:
//!
//! ```text
//! # Version: 2024.07.04
//! # Date:    2024-07-04 20:34:05
//! 046d  Logitech, Inc.
//! 	0802  Webcam C200
//! 		00  interface line (ignored)
//! C 03  Human Interface Device   (class sections are ignored)
//! ```
//!
//! The parser is a small state machine fed one line at a time. It keeps the
//! currently open vendor in a [`VendorBuilder`] and only turns it into an
//! immutable [`Vendor`] once the next vendor line (or end of input) fixes its
//! product count. Lines are inspected as borrowed slices; the only
//! allocations are the names and header values that end up in the registry.
//!
//! Parsing is best effort: malformed lines are counted and skipped, never
//! reported as errors.

use std::borrow::Cow;
use std::io::BufRead;

use crate::error::{RegistryError, Result};
use crate::models::{Product, Vendor};

/// Indentation marker for product lines (one) and interface lines (two)
const INDENT: char = '\t';
const VERSION_MARKER: &str = "Version:";
const DATE_MARKER: &str = "Date:";
/// `HHHH` + one whitespace + at least one name character
const MIN_ENTRY_LEN: usize = 6;

/// Output of a completed parse, ready to be owned by a `Registry`
#[derive(Debug, Default)]
pub struct ParsedRegistry {
    pub(crate) vendors: Vec<Vendor>,
    pub(crate) products: Vec<Product>,
    pub(crate) version: Option<String>,
    pub(crate) date: Option<String>,
    pub(crate) skipped_lines: usize,
}

/// The vendor currently accumulating products
#[derive(Debug)]
struct VendorBuilder {
    id: u16,
    name: Box<str>,
    product_start: usize,
}

impl VendorBuilder {
    /// Freeze the vendor once every product line following it has been seen
    fn close(self, products_len: usize) -> Vendor {
        Vendor {
            id: self.id,
            name: self.name,
            product_start: self.product_start,
            product_count: products_len - self.product_start,
        }
    }
}

/// Line-by-line registry parser
#[derive(Debug, Default)]
pub struct RegistryParser {
    vendors: Vec<Vendor>,
    products: Vec<Product>,
    open: Option<VendorBuilder>,
    version: Option<String>,
    date: Option<String>,
    skipped_lines: usize,
}

impl RegistryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of registry text (trailing `\n` / `\r\n` allowed)
    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.trim().is_empty() {
            return;
        }

        if let Some(comment) = line.strip_prefix('#') {
            self.header_line(comment);
            return;
        }

        if let Some(payload) = line.strip_prefix(INDENT) {
            if payload.starts_with(INDENT) {
                // Interface lines (two or more tabs) are not kept
                self.skipped_lines += 1;
            } else {
                self.product_line(payload);
            }
            return;
        }

        if line.len() >= MIN_ENTRY_LEN && line.as_bytes()[0].is_ascii_hexdigit() {
            if let Some((id, name)) = parse_entry(line) {
                self.open_vendor(id, name);
                return;
            }
        }

        self.skipped_lines += 1;
    }

    /// Close the last vendor and hand back the finished arrays
    pub fn finish(mut self) -> ParsedRegistry {
        self.close_open_vendor();

        let (vendors, products) = if is_sorted(&self.vendors, &self.products) {
            (self.vendors, self.products)
        } else {
            log::warn!(
                "Registry text is not sorted by id (or repeats ids); normalizing {} vendors",
                self.vendors.len()
            );
            normalize(self.vendors, self.products)
        };

        log::debug!(
            "Parsed registry: {} vendors, {} products, {} lines skipped",
            vendors.len(),
            products.len(),
            self.skipped_lines
        );

        ParsedRegistry {
            vendors,
            products,
            version: self.version,
            date: self.date,
            skipped_lines: self.skipped_lines,
        }
    }

    fn header_line(&mut self, comment: &str) {
        let text = comment.trim_start();

        if self.version.is_none() {
            if let Some(value) = text.strip_prefix(VERSION_MARKER) {
                self.version = Some(value.trim().to_string());
                return;
            }
        }

        if self.date.is_none() {
            if let Some(value) = text.strip_prefix(DATE_MARKER) {
                self.date = Some(value.trim().to_string());
            }
        }
    }

    fn product_line(&mut self, payload: &str) {
        if self.open.is_none() {
            // Orphan product before the first vendor
            self.skipped_lines += 1;
            return;
        }

        match parse_entry(payload) {
            Some((id, name)) => self.products.push(Product {
                id,
                name: name.into(),
            }),
            None => self.skipped_lines += 1,
        }
    }

    fn open_vendor(&mut self, id: u16, name: &str) {
        self.close_open_vendor();
        self.open = Some(VendorBuilder {
            id,
            name: name.into(),
            product_start: self.products.len(),
        });
    }

    fn close_open_vendor(&mut self) {
        if let Some(builder) = self.open.take() {
            self.vendors.push(builder.close(self.products.len()));
        }
    }
}

/// Parse `HHHH<whitespace>name`, returning the id and trimmed name
fn parse_entry(payload: &str) -> Option<(u16, &str)> {
    if payload.len() < MIN_ENTRY_LEN {
        return None;
    }

    let hex = payload.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let rest = &payload[4..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let name = rest.trim();
    if name.is_empty() {
        return None;
    }

    let id = u16::from_str_radix(hex, 16).ok()?;
    Some((id, name))
}

fn is_sorted(vendors: &[Vendor], products: &[Product]) -> bool {
    vendors.windows(2).all(|w| w[0].id < w[1].id)
        && vendors
            .iter()
            .all(|v| products[v.product_range()].windows(2).all(|w| w[0].id < w[1].id))
}

/// Sort vendors and each vendor's products by id, keeping the first
/// occurrence of any repeated id, and rebuild the shared product array so
/// ranges stay contiguous and in vendor order.
fn normalize(vendors: Vec<Vendor>, products: Vec<Product>) -> (Vec<Vendor>, Vec<Product>) {
    let mut order: Vec<usize> = (0..vendors.len()).collect();
    // Stable sort: among equal ids the earliest vendor stays first
    order.sort_by_key(|&i| vendors[i].id);
    order.dedup_by_key(|i| vendors[*i].id);

    let mut slots: Vec<Option<Product>> = products.into_iter().map(Some).collect();
    let mut out_vendors = Vec::with_capacity(order.len());
    let mut out_products = Vec::with_capacity(slots.len());

    for i in order {
        let vendor = &vendors[i];
        let mut owned: Vec<Product> = slots[vendor.product_range()]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        owned.sort_by_key(|p| p.id);
        owned.dedup_by_key(|p| p.id);

        let product_start = out_products.len();
        out_products.extend(owned);
        out_vendors.push(Vendor {
            id: vendor.id,
            name: vendor.name.clone(),
            product_start,
            product_count: out_products.len() - product_start,
        });
    }

    (out_vendors, out_products)
}

/// Parse registry text held in memory
pub fn parse_str(text: &str) -> ParsedRegistry {
    let mut parser = RegistryParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Parse registry text from a reader, one line at a time
///
/// Invalid UTF-8 is replaced rather than rejected; names in older copies of
/// `usb.ids` were Latin-1.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<ParsedRegistry> {
    let mut parser = RegistryParser::new();
    let mut buf = Vec::with_capacity(256);
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| RegistryError::Read {
                line: line_no + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line: Cow<'_, str> = String::from_utf8_lossy(&buf);
        parser.feed_line(&line);
    }

    Ok(parser.finish())
}
