use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::{Error, ErrorKind};

/// The ordered list of directories templates are looked up in.
///
/// Every activated theme contributes its directory.  The most recently
/// activated theme is always searched first, themes that were active before
/// stay behind it as fallbacks so that a theme only needs to carry the
/// templates it overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateLocations {
    paths: Vec<PathBuf>,
}

impl TemplateLocations {
    /// Creates an empty list of locations.
    pub fn new() -> TemplateLocations {
        TemplateLocations::default()
    }

    /// Moves `dir` to the front of the search order.
    pub fn activate(&mut self, dir: PathBuf) {
        self.paths.retain(|x| x != &dir);
        self.paths.insert(0, dir);
    }

    /// Returns the directories in search order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Returns the directory of the active theme.
    pub fn active(&self) -> Option<&Path> {
        self.paths.first().map(|x| x.as_path())
    }

    /// Returns the number of locations.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if no location was activated yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the first file that exists for the given template name.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.paths
            .iter()
            .filter_map(|dir| safe_join(dir, name))
            .find(|path| path.is_file())
    }

    /// Loads the source of a template by walking the locations in order.
    ///
    /// Missing files fall through to the next location, `Ok(None)` is
    /// returned if no location has the template.
    pub fn load(&self, name: &str) -> Result<Option<String>, Error> {
        for dir in &self.paths {
            let path = match safe_join(dir, name) {
                Some(path) => path,
                None => return Ok(None),
            };
            match fs::read_to_string(path) {
                Ok(result) => return Ok(Some(result)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(
                        Error::new(ErrorKind::InvalidOperation, "could not read template")
                            .with_source(err),
                    )
                }
            }
        }
        Ok(None)
    }
}

/// Safely joins a `/` separated name onto a base directory.
///
/// Segments that start with a dot or contain a backslash are refused which
/// keeps lookups from escaping the base directory.
pub fn safe_join(base: &Path, name: &str) -> Option<PathBuf> {
    let mut rv = base.to_path_buf();
    for segment in name.split('/') {
        if segment.starts_with('.') || segment.contains('\\') {
            return None;
        }
        rv.push(segment);
    }
    Some(rv)
}

/// Resolves the directory of a theme below the themes base directory.
///
/// Returns the path that was looked at together with a flag telling if it is
/// an existing directory.
pub(crate) fn resolve_theme_dir(base: &Path, name: &str) -> (PathBuf, bool) {
    if name.is_empty() || name.split('/').any(str::is_empty) {
        return (base.join(name), false);
    }
    match safe_join(base, name) {
        Some(path) => {
            let exists = path.is_dir();
            (path, exists)
        }
        None => (base.join(name), false),
    }
}

/// Creates a loader function for an environment over a snapshot of the
/// template locations.
pub(crate) fn locations_loader(
    locations: TemplateLocations,
) -> impl for<'a> Fn(&'a str) -> Result<Option<String>, Error> + Send + Sync + 'static {
    move |name| locations.load(name)
}
