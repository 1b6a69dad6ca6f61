//! Fixture-Based Registry Tests
//!
//! Each file under `tests/corpus/` exercises one family of inputs through the
//! file loader:
//! - unsorted.ids: out-of-order and repeated ids
//! - crlf.ids: Windows line endings
//! - malformed.ids: lines that must be skipped
//! - classes_only.ids: class sections without any vendor


use hwids::{Registry, RegistryError};
use test_helpers::*;

// ==================== Normalization Tests ====================

#[test]
fn test_unsorted_fixture_is_normalized() {
    let registry = load_fixture("unsorted.ids");

    assert_eq!(vendor_ids(&registry), vec![0x0100, 0x0200, 0x0300]);
    assert_eq!(product_ids(&registry, 0x0300), vec![0x0010, 0x0020]);
    assert_registry_ordered(&registry);
}

#[test]
fn test_unsorted_fixture_lookups() {
    let registry = load_fixture("unsorted.ids");

    assert_eq!(registry.vendor_name(0x0300), Some("Third"));
    assert_eq!(registry.product_name(0x0300, 0x0010), Some("Third-A"));
    assert_eq!(registry.product_name(0x0300, 0x0020), Some("Third-B"));
}

#[test]
fn test_unsorted_fixture_first_duplicate_wins() {
    let registry = load_fixture("unsorted.ids");

    assert_eq!(registry.vendor_name(0x0100), Some("First"));
    assert_eq!(product_ids(&registry, 0x0100), vec![0x0001]);
    assert_eq!(registry.product_name(0x0100, 0x0002), None);
    assert_eq!(registry.vendor_id_by_name("first again"), None);
}

// ==================== Line Ending Tests ====================

#[test]
fn test_crlf_fixture() {
    let registry = load_fixture("crlf.ids");

    assert_eq!(registry.version(), Some("2010.10.10"));
    assert_eq!(registry.date(), Some("2010-10-10 10:10:10"));
    assert!(registry.date_time().is_some());
    assert_eq!(registry.vendor_name(0x0a5c), Some("Broadcom Corp."));
    assert_eq!(
        registry.product_name(0x0a5c, 0x21e8),
        Some("BCM20702A0 Bluetooth 4.0")
    );
    assert_eq!(
        registry.product_id_by_name(0x0a5c, "bcm5880 secure applications processor"),
        Some(0x5800)
    );
}

// ==================== Malformed Input Tests ====================

#[test]
fn test_malformed_fixture_keeps_valid_lines() {
    let registry = load_fixture("malformed.ids");

    assert_eq!(vendor_ids(&registry), vec![0x0001, 0x0002]);
    assert_eq!(product_ids(&registry, 0x0001), vec![0x0003]);
    assert_eq!(product_ids(&registry, 0x0002), Vec::<u16>::new());
    assert_eq!(registry.product_name(0x0001, 0x0003), Some("Valid Product"));
}

#[test]
fn test_malformed_fixture_counts_skipped_lines() {
    let stats = load_fixture("malformed.ids").stats();

    assert_eq!(stats.vendors, 2);
    assert_eq!(stats.products, 1);
    assert_eq!(stats.skipped_lines, 8);
    assert_eq!(stats.version, None);
}

#[test]
fn test_classes_only_fixture() {
    let registry = load_fixture("classes_only.ids");

    assert!(registry.is_empty());
    assert_eq!(registry.version(), Some("2015.05.05"));
    assert_eq!(registry.date(), None);
    assert_eq!(registry.vendors().count(), 0);
    assert_eq!(registry.vendor_id_by_name("Audio"), None);
}

// ==================== Loader Tests ====================

#[test]
fn test_missing_fixture_is_source_unavailable() {
    let err = Registry::from_path(corpus_path("does_not_exist.ids")).unwrap_err();

    assert!(matches!(err, RegistryError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("does_not_exist.ids"));
}

#[test]
fn test_directory_is_not_a_registry() {
    // Opening a directory succeeds on Unix, reading it does not
    let dir = corpus_path("");
    let err = Registry::from_path(&dir).unwrap_err();

    match err {
        RegistryError::SourceUnavailable { path, .. } => assert_eq!(path, dir),
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[test]
fn test_file_and_memory_parses_agree() {
    let from_file = load_fixture("unsorted.ids");
    let text = std::fs::read_to_string(corpus_path("unsorted.ids")).unwrap();
    let from_memory = Registry::parse(&text);

    assert_eq!(
        from_file.vendors().collect::<Vec<_>>(),
        from_memory.vendors().collect::<Vec<_>>()
    );
    assert_eq!(from_file.stats().skipped_lines, from_memory.stats().skipped_lines);
}
