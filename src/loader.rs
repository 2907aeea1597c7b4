//! Template loading boundary.
//!
//! The engine never touches the filesystem directly; it goes through
//! [`TemplateLoader`] so resolution can run against a mock in tests and the
//! existence probe stays the single I/O seam of path fallback.

use std::fs;
use std::io;
use std::path::Path;

/// Capability to probe and read template files.
pub trait TemplateLoader {
    /// Returns `true` if a template exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the template at `path`. Called only for paths `exists` accepted,
    /// but may still fail (permissions, race, corruption).
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Loader backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTemplateLoader;

impl TemplateLoader for FsTemplateLoader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
