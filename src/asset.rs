//! Asset resolution for program source files.
//!
//! Program sources are looked up by asset key (a `/`-separated relative path
//! such as `"Shaders/Particles.cl"`) through an `AssetLocator`. The engine's
//! asset manager implements the trait; `FileLocator` and `MemoryLocator`
//! cover the common cases.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};


/// A located asset which can be opened for reading.
pub trait AssetInfo {
    /// Returns the key the asset was located with.
    fn key(&self) -> &str;

    /// Opens a new stream over the asset contents.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}


/// Resolves asset keys.
pub trait AssetLocator {
    /// Returns the asset for `key`, or `None` if it does not exist.
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>>;
}

impl<'l, L> AssetLocator for &'l L where L: AssetLocator + ?Sized {
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>> {
        (**self).locate(key)
    }
}

/// Chains locators. The first locator to find a key wins.
impl AssetLocator for Vec<Box<dyn AssetLocator>> {
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>> {
        self.iter().filter_map(|loc| loc.locate(key)).next()
    }
}


/// Locates assets below a list of root directories, searched in order.
#[derive(Clone, Debug, Default)]
pub struct FileLocator {
    roots: Vec<PathBuf>,
}

impl FileLocator {
    pub fn new() -> FileLocator {
        FileLocator { roots: Vec::new() }
    }

    /// Adds a root directory searched after the existing ones.
    pub fn root<P: Into<PathBuf>>(mut self, root: P) -> FileLocator {
        self.roots.push(root.into());
        self
    }

    /// Returns the root directories.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl AssetLocator for FileLocator {
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>> {
        let rel = Path::new(key.trim_start_matches('/'));

        // Keys never escape their root.
        if rel.components().any(|c| match c { Component::Normal(_) | Component::CurDir => false, _ => true }) {
            return None;
        }

        self.roots.iter()
            .map(|root| root.join(rel))
            .find(|path| path.is_file())
            .map(|path| Box::new(FileAsset { key: key.to_owned(), path }) as Box<dyn AssetInfo>)
    }
}

struct FileAsset {
    key: String,
    path: PathBuf,
}

impl AssetInfo for FileAsset {
    fn key(&self) -> &str {
        &self.key
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}


/// Locates assets held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocator {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryLocator {
    pub fn new() -> MemoryLocator {
        MemoryLocator { assets: HashMap::new() }
    }

    /// Adds or replaces an asset.
    pub fn insert<K: Into<String>, D: Into<Vec<u8>>>(&mut self, key: K, data: D) {
        self.assets.insert(key.into(), data.into());
    }

    /// Builder-style `insert`.
    pub fn with<K: Into<String>, D: Into<Vec<u8>>>(mut self, key: K, data: D) -> MemoryLocator {
        self.insert(key, data);
        self
    }
}

impl AssetLocator for MemoryLocator {
    fn locate(&self, key: &str) -> Option<Box<dyn AssetInfo + '_>> {
        self.assets.get_key_value(key)
            .map(|(k, data)| Box::new(MemoryAsset { key: k, data }) as Box<dyn AssetInfo + '_>)
    }
}

struct MemoryAsset<'a> {
    key: &'a str,
    data: &'a [u8],
}

impl<'a> AssetInfo for MemoryAsset<'a> {
    fn key(&self) -> &str {
        self.key
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data)))
    }
}


/// Reads an asset as text, line by line, terminating every line with `\n`.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Invalid UTF-8 sequences are
/// replaced with U+FFFD. Fails only on I/O errors.
pub fn read_source_lines(info: &dyn AssetInfo) -> io::Result<String> {
    let mut reader = BufReader::new(info.open()?);
    let mut text = String::new();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        for line in buf.split(|&b| b == b'\r') {
            text.push_str(&String::from_utf8_lossy(line));
            text.push('\n');
        }
    }

    Ok(text)
}
