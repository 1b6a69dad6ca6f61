//! Immutable indexed store for a parsed registry
//!
//! A [`Registry`] owns two flat arrays: vendors sorted by id, and the products
//! of every vendor laid out back to back. Each vendor points into the product
//! array with a start offset and a count, so a registry is three allocations
//! plus one boxed string per name no matter how many vendors it holds.
//!
//! Lookups live in [`crate::query`] and [`crate::reverse`]; this module only
//! deals with construction and metadata.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{RegistryError, Result};
use crate::models::{Product, RegistryStats, Vendor};
use crate::parser::{self, ParsedRegistry};
use crate::reverse::ReverseIndex;

/// Snapshot of `usb.ids` compiled into the library
pub const EMBEDDED_USB_IDS: &str = include_str!("../data/usb.ids");

/// Format of the header `Date:` value
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parsed, read-only USB ID registry
#[derive(Debug)]
pub struct Registry {
    pub(crate) vendors: Vec<Vendor>,
    pub(crate) products: Vec<Product>,
    version: Option<String>,
    date: Option<String>,
    skipped_lines: usize,
    pub(crate) reverse: ReverseIndex,
}

impl Registry {
    /// Parse registry text held in memory
    pub fn parse(text: &str) -> Self {
        Self::from_parsed(parser::parse_str(text))
    }

    /// Parse the registry snapshot embedded in the library
    pub fn embedded() -> Self {
        Self::parse(EMBEDDED_USB_IDS)
    }

    /// Parse registry text from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        parser::parse_reader(reader).map(Self::from_parsed)
    }

    /// Load a registry file such as `/usr/share/hwdata/usb.ids`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RegistryError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loading registry from {}", path.display());
        // A file that opens but cannot be read is just as unavailable
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            RegistryError::Read { source, .. } => RegistryError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    fn from_parsed(parsed: ParsedRegistry) -> Self {
        Self {
            vendors: parsed.vendors,
            products: parsed.products,
            version: parsed.version,
            date: parsed.date,
            skipped_lines: parsed.skipped_lines,
            reverse: ReverseIndex::default(),
        }
    }

    /// Header `Version:` value, e.g. `2024.07.04`
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Header `Date:` value, e.g. `2024-07-04 20:34:05`
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Header date as a timestamp, if present and well formed
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        let date = self.date.as_deref()?;
        match NaiveDateTime::parse_from_str(date, DATE_FORMAT) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::debug!("Registry date '{}' is not a timestamp: {}", date, e);
                None
            }
        }
    }

    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            version: self.version.clone(),
            date: self.date.clone(),
            vendors: self.vendors.len(),
            products: self.products.len(),
            skipped_lines: self.skipped_lines,
        }
    }
}
