//! Program source assembly from assets.

use std::fs;
use std::io::{self, Read};
use crate::asset::{self, AssetInfo, AssetLocator, FileLocator, MemoryLocator};
use crate::standard::ProgramSource;


#[test]
fn include_comes_first_and_order_is_kept() {
    let locator = MemoryLocator::new()
        .with("lib/Noise.clh", "float noise(float x);")
        .with("Particles.cl", "__kernel void step() {}");

    let source = ProgramSource::new()
        .include("#define COUNT 1024\n")
        .resource("lib/Noise.clh")
        .resource("Particles.cl")
        .assemble(&locator);

    assert_eq!(source, "#define COUNT 1024\nfloat noise(float x);\n__kernel void step() {}\n");
}

#[test]
fn missing_resources_are_skipped() {
    let locator = MemoryLocator::new().with("b.cl", "b");
    let source = ProgramSource::new()
        .resources(vec!["a.cl", "b.cl", "c.cl"])
        .assemble(&locator);
    assert_eq!(source, "b\n");
}

#[test]
fn invalid_utf8_is_replaced() {
    let locator = MemoryLocator::new()
        .with("bad.cl", vec![0x66u8, 0xFF, 0xFE, 0x0A])
        .with("good.cl", "good");
    let source = ProgramSource::new()
        .resources(vec!["bad.cl", "good.cl"])
        .assemble(&locator);
    assert_eq!(source, "f\u{FFFD}\u{FFFD}\ngood\n");
}

#[test]
fn line_terminators() {
    let locator = MemoryLocator::new()
        .with("mac.cl", "a\rb\r\rc\r")
        .with("mixed.cl", "d\r\ne\n\r\nf");
    let source = ProgramSource::new()
        .resources(vec!["mac.cl", "mixed.cl"])
        .assemble(&locator);
    assert_eq!(source, "a\nb\n\nc\nd\ne\n\nf\n");
}

#[test]
fn unreadable_resources_are_skipped() {
    let chain: Vec<Box<dyn AssetLocator>> = vec![
        Box::new(BrokenLocator),
        Box::new(MemoryLocator::new().with("good.cl", "good")),
    ];
    let source = ProgramSource::new()
        .include("// head\n")
        .resources(vec!["failing.cl", "truncated.cl", "good.cl"])
        .assemble(&chain);
    assert_eq!(source, "// head\ngood\n");
}

#[test]
fn empty_resource_list() {
    let source = ProgramSource::new().include("X").assemble(&MemoryLocator::new());
    assert_eq!(source, "X");
    assert!(ProgramSource::new().resource_keys().is_empty());
}

#[test]
fn file_locator_searches_roots_in_order() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    fs::create_dir_all(second.path().join("Shaders")).unwrap();
    fs::write(first.path().join("Common.clh"), "first\n").unwrap();
    fs::write(second.path().join("Common.clh"), "second\n").unwrap();
    fs::write(second.path().join("Shaders").join("Blur.cl"), "blur\nkernel\n").unwrap();

    let locator = FileLocator::new().root(first.path()).root(second.path());
    assert_eq!(locator.roots().len(), 2);

    let source = ProgramSource::new()
        .resource("Common.clh")
        .resource("Shaders/Blur.cl")
        .assemble(&locator);
    assert_eq!(source, "first\nblur\nkernel\n");
}

#[test]
fn file_locator_keeps_keys_inside_roots() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("assets");
    fs::create_dir_all(&root).unwrap();
    fs::write(outer.path().join("secret.cl"), "secret").unwrap();

    let locator = FileLocator::new().root(&root);
    assert!(locator.locate("../secret.cl").is_none());
    assert!(locator.locate("missing.cl").is_none());
}

#[test]
fn chained_locators() {
    let chain: Vec<Box<dyn AssetLocator>> = vec![
        Box::new(MemoryLocator::new().with("a.cl", "from memory")),
        Box::new(MemoryLocator::new().with("a.cl", "shadowed").with("b.cl", "fallback")),
    ];

    let source = ProgramSource::new().resources(vec!["a.cl", "b.cl"]).assemble(&chain);
    assert_eq!(source, "from memory\nfallback\n");
}

struct FailingAsset;

impl AssetInfo for FailingAsset {
    fn key(&self) -> &str { "failing.cl" }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

/// Yields one line, then fails.
struct TruncatedAsset;

impl AssetInfo for TruncatedAsset {
    fn key(&self) -> &str { "truncated.cl" }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        let tail = TruncatedReader;
        Ok(Box::new(Read::chain(&b"first line\n"[..], tail)))
    }
}

struct TruncatedReader;

impl Read for TruncatedReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection reset"))
    }
}

struct BrokenLocator;

impl AssetLocator for BrokenLocator {
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>> {
        match key {
            "failing.cl" => Some(Box::new(FailingAsset)),
            "truncated.cl" => Some(Box::new(TruncatedAsset)),
            _ => None,
        }
    }
}

#[test]
fn read_source_lines_reports_open_errors() {
    assert!(asset::read_source_lines(&FailingAsset).is_err());
    assert!(asset::read_source_lines(&TruncatedAsset).is_err());

    let locator = MemoryLocator::new().with("crlf.cl", "a\r\nb");
    let info = locator.locate("crlf.cl").unwrap();
    assert_eq!(info.key(), "crlf.cl");
    assert_eq!(asset::read_source_lines(&*info).unwrap(), "a\nb\n");
}
