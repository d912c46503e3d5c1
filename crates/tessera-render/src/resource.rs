//! Resolution of resource names to files.
//!
//! Backends never open files by raw name: they ask a [`ResourceLoader`] to
//! turn the name into a path first, so an application can search its own
//! data directories.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};

/// Turns a resource name into a path that can be opened.
pub trait ResourceLoader: Debug + Send + Sync {
    fn resolve(&self, name: &str) -> RenderResult<PathBuf>;
}

/// A single place resources may live in.
pub trait ResourceLocation: Debug + Send + Sync {
    /// Path of `name` in this location, if it exists here.
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// A directory on the local file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemLocation {
    root: PathBuf,
}

impl FileSystemLocation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLocation for FileSystemLocation {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.root.join(name);
        candidate.is_file().then_some(candidate)
    }
}

/// Searches an ordered list of locations; the first hit wins.
///
/// Absolute paths that exist are accepted as-is without consulting the
/// locations.
#[derive(Debug, Default)]
pub struct ResourceLocator {
    locations: Vec<Box<dyn ResourceLocation>>,
}

impl ResourceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A locator searching only the process working directory.
    pub fn working_directory() -> Self {
        let mut locator = Self::new();
        locator.add_location(FileSystemLocation::new("."));
        locator
    }

    pub fn add_location(&mut self, location: impl ResourceLocation + 'static) {
        self.locations.push(Box::new(location));
    }

    pub fn with_location(mut self, location: impl ResourceLocation + 'static) -> Self {
        self.add_location(location);
        self
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

impl ResourceLoader for ResourceLocator {
    fn resolve(&self, name: &str) -> RenderResult<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() && direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        self.locations
            .iter()
            .find_map(|location| location.locate(name))
            .ok_or_else(|| {
                RenderError::resource(
                    name,
                    format!("not found in {} resource location(s)", self.locations.len()),
                )
            })
    }
}
