//! Programs and program source assembly.

use crate::asset::{self, AssetLocator};
use crate::error::Result as OclResult;


/// A program object from which kernels are created.
///
/// A freshly created program holds only its source and must be built before
/// use.
pub trait Program {
    /// Returns the complete source text the program was created from.
    fn source(&self) -> &str;

    /// Compiles and links the program for all devices of its context.
    ///
    /// `options` are passed to the compiler verbatim (e.g. `"-D N=64"`).
    fn build(&mut self, options: &str) -> OclResult<()>;

    /// Returns true once `build` has succeeded.
    fn is_built(&self) -> bool;

    /// Returns the names of the kernels declared by a built program.
    fn kernel_names(&self) -> OclResult<Vec<String>>;
}


/// Assembles program source text from an include string followed by a list
/// of asset files.
///
/// ### Order of Inclusion
///
/// 1. The include string (typically `#define`s for compile time constants)
/// 2. The contents of each resource, in the order added. Library files
///    conventionally end with `.clh`, the main kernel file with `.cl`.
///
/// Resources which cannot be located or read are skipped with a warning.
/// Repeated resources are included repeatedly.
#[must_use = "builders do nothing unless '::assemble' is called"]
#[derive(Clone, Debug, Default)]
pub struct ProgramSource {
    include: String,
    resources: Vec<String>,
}

impl ProgramSource {
    /// Returns a new, empty, source assembler.
    pub fn new() -> ProgramSource {
        ProgramSource { include: String::new(), resources: Vec::with_capacity(8) }
    }

    /// Sets the include string placed before all resources.
    pub fn include<S: Into<String>>(mut self, include: S) -> ProgramSource {
        self.include = include.into();
        self
    }

    /// Appends an asset key to the list of resources.
    pub fn resource<S: Into<String>>(mut self, key: S) -> ProgramSource {
        self.resources.push(key.into());
        self
    }

    /// Appends several asset keys to the list of resources.
    pub fn resources<I, S>(mut self, keys: I) -> ProgramSource
            where I: IntoIterator<Item = S>, S: Into<String> {
        self.resources.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Returns the resource keys in inclusion order.
    pub fn resource_keys(&self) -> &[String] {
        &self.resources
    }

    /// Loads every resource through `locator` and returns the final source.
    pub fn assemble<L: AssetLocator + ?Sized>(&self, locator: &L) -> String {
        let mut src = String::with_capacity(self.include.len() + 4096 * self.resources.len());
        src.push_str(&self.include);

        for key in &self.resources {
            let info = match locator.locate(key) {
                Some(info) => info,
                None => {
                    warn!("unable to load source file '{}'", key);
                    continue;
                },
            };

            match asset::read_source_lines(&*info) {
                Ok(text) => src.push_str(&text),
                Err(err) => warn!("unable to load source file '{}': {}", key, err),
            }
        }

        src
    }
}
