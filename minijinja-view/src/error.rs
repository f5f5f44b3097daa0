use std::fmt;
use std::path::PathBuf;

use minijinja::value::ValueKind;

/// Represents a failure of the view layer.
///
/// All of these are considered fatal for the request that triggered them:
/// they indicate a deployment or configuration defect and hosts usually turn
/// them into an internal server error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The view could not be set up from its configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    /// A requested theme directory does not exist.
    #[error("theme {name:?} does not exist in {}", .path.display())]
    ThemeNotFound {
        /// The requested theme.
        name: String,
        /// The directory that was looked up.
        path: PathBuf,
    },
    /// The template to render could not be found in any template location.
    #[error("template {name:?} not found in {}", DisplayPaths(.paths))]
    TemplateNotFound {
        /// The template name including the file extension.
        name: String,
        /// The template locations that were searched.
        paths: Vec<PathBuf>,
    },
    /// The engine failed while compiling or rendering a template.
    #[error("failed to render template {name:?}")]
    Render {
        /// The template name including the file extension.
        name: String,
        /// The underlying engine error.
        #[source]
        source: minijinja::Error,
    },
    /// A mapping of view variables was expected.
    #[error("view variables must be a map, got {kind}")]
    InvalidContext {
        /// The kind of value that was passed instead.
        kind: ValueKind,
    },
}

/// Describes what is wrong with a [`ViewConfig`](crate::ViewConfig).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configured default theme does not exist.
    #[error("failed to load the default theme {name:?} from {}", .path.display())]
    DefaultTheme {
        /// The configured default theme.
        name: String,
        /// The directory that was looked up.
        path: PathBuf,
    },
    /// The delimiter configuration was rejected by the engine.
    #[error("could not configure template syntax")]
    Syntax(#[source] minijinja::Error),
    /// A function listed for registration is not known.
    #[error("cannot register unknown function {0:?}")]
    UnknownFunction(String),
    /// A filter listed for registration is not known.
    #[error("cannot register unknown filter {0:?}")]
    UnknownFilter(String),
    /// Only UTF-8 templates are supported.
    #[error("unsupported charset {0:?}")]
    Charset(String),
    /// Unknown auto escape mode.
    #[error("unsupported autoescape mode {0:?}")]
    AutoEscape(String),
    /// An environment variable override could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnvVar {
        /// Name of the environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The cache directory could not be created.
    #[error("could not create cache directory {}", .path.display())]
    CacheDir {
        /// The resolved cache directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file could not be read.
    #[error("could not read configuration file {}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for a view config.
    #[cfg(feature = "toml")]
    #[error("could not parse configuration file {}", .path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

struct DisplayPaths<'a>(&'a [PathBuf]);

impl fmt::Display for DisplayPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, path) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        f.write_str("]")
    }
}
