//! CLI argument parsing and command handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::models::{ProductMatch, RegistryStats};
use crate::output;
use crate::registry::Registry;

/// hwid: look up USB vendor and product names
#[derive(Parser, Debug)]
#[command(
    name = "hwid",
    version,
    about = "Look up USB vendor and product names in the usb.ids registry",
    long_about = "hwid resolves USB vendor and product ids to names (and back) using a \
                  copy of the usb.ids registry compiled into the binary, or any usb.ids \
                  file passed with --ids-file.\n\n\
                  Ids are hexadecimal, with or without a 0x prefix: 046d, 0x046D."
)]
pub struct Cli {
    /// Enable verbose logging (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read this usb.ids file instead of the embedded copy
    #[arg(long, value_name = "PATH", global = true)]
    pub ids_file: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output (only with --json)
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the name of a vendor
    ///
    /// Example:
    ///   hwid vendor 046d          # Logitech, Inc.
    Vendor {
        /// Vendor id (hex)
        #[arg(value_parser = parse_hex_id)]
        vendor: u16,
    },

    /// Show the name of a product
    ///
    /// Example:
    ///   hwid product 046d 0802    # Webcam C200
    Product {
        /// Vendor id (hex)
        #[arg(value_parser = parse_hex_id)]
        vendor: u16,

        /// Product id (hex)
        #[arg(value_parser = parse_hex_id)]
        product: u16,
    },

    /// Find a vendor id by name (case-insensitive, exact)
    ///
    /// Example:
    ///   hwid find-vendor "logitech, inc."
    FindVendor {
        /// Vendor name
        name: String,
    },

    /// Find a product id by name within a vendor (case-insensitive, exact)
    ///
    /// Example:
    ///   hwid find-product 046d "webcam c200"
    FindProduct {
        /// Vendor id (hex)
        #[arg(value_parser = parse_hex_id)]
        vendor: u16,

        /// Product name
        name: String,
    },

    /// List all vendors, or the products of one vendor
    List {
        /// Vendor id (hex); omit to list vendors
        #[arg(value_parser = parse_hex_id)]
        vendor: Option<u16>,
    },

    /// Show registry version, date and size
    Info,
}

/// Parse a 16-bit hex id such as `046d` or `0x046D`
pub fn parse_hex_id(s: &str) -> std::result::Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("'{}' is not a 16-bit hex id (expected e.g. 046d or 0x046D)", s));
    }

    u16::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

/// `hwid info` report
#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    #[serde(flatten)]
    stats: RegistryStats,
    source: String,
    /// Only known for the embedded snapshot
    fingerprint: Option<&'a str>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Setup logging based on verbosity
        let log_level = match self.verbose {
            0 => "warn",   // Default: only warnings and errors
            1 => "info",   // -v: show info messages
            2 => "debug",  // -vv: show debug messages
            _ => "trace",  // -vvv: show trace messages
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .init();

        let registry = load_registry(self.ids_file.as_ref())?;
        let format = OutputFormat {
            json: self.json,
            pretty: self.pretty,
        };

        if self.pretty && !self.json {
            output::warn("--pretty has no effect without --json");
        }

        match self.command {
            Command::Vendor { vendor } => handle_vendor(registry, vendor, format),
            Command::Product { vendor, product } => {
                handle_product(registry, vendor, product, format)
            }
            Command::FindVendor { name } => handle_find_vendor(registry, &name, format),
            Command::FindProduct { vendor, name } => {
                handle_find_product(registry, vendor, &name, format)
            }
            Command::List { vendor } => handle_list(registry, vendor, format),
            Command::Info => handle_info(registry, self.ids_file.as_ref(), format),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OutputFormat {
    json: bool,
    pretty: bool,
}

impl OutputFormat {
    fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", json_output);
        Ok(())
    }
}

/// Install the registry named by `--ids-file`, or fall back to the embedded one
fn load_registry(ids_file: Option<&PathBuf>) -> Result<&'static Registry> {
    match ids_file {
        Some(path) => {
            log::info!("Using registry file {}", path.display());
            let registry = Registry::from_path(path)
                .with_context(|| format!("Failed to load registry from {}", path.display()))?;
            crate::install(registry).context("Failed to install registry")
        }
        None => Ok(crate::registry()),
    }
}

fn handle_vendor(registry: &Registry, vendor_id: u16, format: OutputFormat) -> Result<()> {
    log::info!("Looking up vendor {:04x}", vendor_id);

    let vendor = registry
        .vendor(vendor_id)
        .with_context(|| format!("Vendor {:04x} not found", vendor_id))?;

    if format.json {
        format.print(vendor)
    } else {
        println!("{}", vendor.name);
        Ok(())
    }
}

fn handle_product(
    registry: &Registry,
    vendor_id: u16,
    product_id: u16,
    format: OutputFormat,
) -> Result<()> {
    log::info!("Looking up product {:04x}:{:04x}", vendor_id, product_id);

    let vendor = registry
        .vendor_name(vendor_id)
        .with_context(|| format!("Vendor {:04x} not found", vendor_id))?;
    let product = registry
        .product_name(vendor_id, product_id)
        .with_context(|| format!("Product {:04x}:{:04x} not found", vendor_id, product_id))?;

    if format.json {
        format.print(&ProductMatch {
            vendor_id,
            vendor,
            product_id,
            product,
        })
    } else {
        println!("{} {}", vendor, product);
        Ok(())
    }
}

fn handle_find_vendor(registry: &Registry, name: &str, format: OutputFormat) -> Result<()> {
    log::info!("Resolving vendor name '{}'", name);

    let vendor = registry
        .vendor_id_by_name(name)
        .and_then(|id| registry.vendor(id))
        .with_context(|| format!("No vendor named '{}'", name))?;

    if format.json {
        format.print(vendor)
    } else {
        println!("{:04x}  {}", vendor.id, vendor.name);
        Ok(())
    }
}

fn handle_find_product(
    registry: &Registry,
    vendor_id: u16,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    log::info!("Resolving product name '{}' under vendor {:04x}", name, vendor_id);

    let vendor = registry
        .vendor_name(vendor_id)
        .with_context(|| format!("Vendor {:04x} not found", vendor_id))?;
    let product = registry
        .product_id_by_name(vendor_id, name)
        .and_then(|id| registry.product(vendor_id, id))
        .with_context(|| format!("No product named '{}' under vendor {:04x}", name, vendor_id))?;

    if format.json {
        format.print(&ProductMatch {
            vendor_id,
            vendor,
            product_id: product.id,
            product: &*product.name,
        })
    } else {
        println!("{:04x}:{:04x}  {}", vendor_id, product.id, product.name);
        Ok(())
    }
}

fn handle_list(registry: &Registry, vendor_id: Option<u16>, format: OutputFormat) -> Result<()> {
    match vendor_id {
        None => {
            log::info!("Listing {} vendors", registry.vendor_count());
            if format.json {
                return format.print(registry.vendors.as_slice());
            }
            for (id, name) in registry.vendors() {
                println!("{:04x}  {}", id, name);
            }
        }
        Some(vendor_id) => {
            if registry.vendor(vendor_id).is_none() {
                anyhow::bail!("Vendor {:04x} not found", vendor_id);
            }
            log::info!("Listing products of vendor {:04x}", vendor_id);
            if format.json {
                return format.print(registry.vendor_products(vendor_id));
            }
            for (id, name) in registry.products(vendor_id) {
                println!("{:04x}  {}", id, name);
            }
        }
    }

    Ok(())
}

/// The bundled data is a subset of upstream, so say so
fn source_label(ids_file: Option<&PathBuf>) -> String {
    match ids_file {
        Some(path) => path.display().to_string(),
        None => "embedded (excerpt)".to_string(),
    }
}

fn handle_info(
    registry: &Registry,
    ids_file: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let report = InfoReport {
        stats: registry.stats(),
        source: source_label(ids_file),
        fingerprint: ids_file.is_none().then_some(crate::DATA_FINGERPRINT),
    };

    if format.json {
        return format.print(&report);
    }

    println!("USB ID Registry");
    println!("===============");
    println!("Source:         {}", report.source);
    println!("Version:        {}", report.stats.version.as_deref().unwrap_or("(none)"));
    match (report.stats.date.as_deref(), registry.date_time()) {
        (Some(_), Some(parsed)) => println!("Date:           {}", parsed),
        (Some(raw), None) => println!("Date:           {} (unparsed)", raw),
        (None, _) => println!("Date:           (none)"),
    }
    println!("Vendors:        {}", report.stats.vendors);
    println!("Products:       {}", report.stats.products);
    println!("Skipped lines:  {}", report.stats.skipped_lines);
    if let Some(fingerprint) = report.fingerprint {
        println!("Fingerprint:    {}", fingerprint);
    }

    Ok(())
}
