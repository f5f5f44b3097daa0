use std::env;
#[cfg(feature = "toml")]
use std::path::Path;
use std::path::PathBuf;

use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The delimiters of the template syntax.
///
/// The defaults are the regular Jinja2 delimiters.  Other styles can be
/// configured when the defaults collide with other languages in the
/// templates, for instance ERB style:
///
/// ```toml
/// [delimiters]
/// comment-start = "<%#"
/// comment-end = "#%>"
/// block-start = "<%"
/// block-end = "%>"
/// variable-start = "<%="
/// variable-end = "%>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Delimiters {
    pub comment_start: String,
    pub comment_end: String,
    pub block_start: String,
    pub block_end: String,
    pub variable_start: String,
    pub variable_end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            comment_start: "{#".to_string(),
            comment_end: "#}".to_string(),
            block_start: "{%".to_string(),
            block_end: "%}".to_string(),
            variable_start: "{{".to_string(),
            variable_end: "}}".to_string(),
        }
    }
}

impl Delimiters {
    /// Builds the engine syntax configuration.
    pub fn make_syntax(&self) -> Result<SyntaxConfig, ConfigError> {
        SyntaxConfig::builder()
            .block_delimiters(self.block_start.clone(), self.block_end.clone())
            .variable_delimiters(self.variable_start.clone(), self.variable_end.clone())
            .comment_delimiters(self.comment_start.clone(), self.comment_end.clone())
            .build()
            .map_err(ConfigError::Syntax)
    }
}

/// Options that are applied to the template environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EnvironmentOptions {
    /// Keep compiled templates around between renders.
    pub cache: bool,
    pub debug: bool,
    /// Only `utf-8` is supported.
    pub charset: String,
    /// One of `none`, `html` or `auto` (escape by file extension).
    pub autoescape: String,
    /// Fail on undefined variables instead of rendering them empty.
    pub strict_variables: bool,
    /// Recompile templates on every render.  Defaults to the debug flag.
    pub auto_reload: Option<bool>,
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        EnvironmentOptions {
            cache: false,
            debug: false,
            charset: "utf-8".to_string(),
            autoescape: "none".to_string(),
            strict_variables: false,
            auto_reload: None,
            trim_blocks: false,
            lstrip_blocks: false,
            keep_trailing_newline: false,
        }
    }
}

impl EnvironmentOptions {
    /// Returns `true` if compiled templates need to be dropped before each
    /// render.
    pub fn reload_on_render(&self) -> bool {
        !self.cache || self.auto_reload.unwrap_or(self.debug)
    }

    pub fn apply_to_env(&self, env: &mut Environment<'_>) -> Result<(), ConfigError> {
        if !self.charset.eq_ignore_ascii_case("utf-8") && !self.charset.eq_ignore_ascii_case("utf8")
        {
            return Err(ConfigError::Charset(self.charset.clone()));
        }
        match self.autoescape.as_str() {
            "none" => env.set_auto_escape_callback(|_| AutoEscape::None),
            "html" => env.set_auto_escape_callback(|_| AutoEscape::Html),
            "auto" => {}
            other => return Err(ConfigError::AutoEscape(other.to_string())),
        }
        env.set_debug(self.debug);
        env.set_undefined_behavior(if self.strict_variables {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        env.set_trim_blocks(self.trim_blocks);
        env.set_lstrip_blocks(self.lstrip_blocks);
        env.set_keep_trailing_newline(self.keep_trailing_newline);
        Ok(())
    }
}

/// Holds the configuration of a [`View`](crate::View).
///
/// All fields have defaults so a config only needs to name what differs:
///
/// ```
/// # use minijinja_view::ViewConfig;
/// let config = ViewConfig {
///     base_dir: "site".into(),
///     default_theme: "light".into(),
///     ..Default::default()
/// };
/// assert_eq!(config.themes_base_path(), std::path::Path::new("site/themes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewConfig {
    /// Extension appended to template and layout names.
    pub template_file_ext: String,
    pub delimiters: Delimiters,
    pub environment: EnvironmentOptions,
    /// Directory for cached output, relative to `base_dir`.
    pub cache_dir: PathBuf,
    /// The root of the application.
    pub base_dir: PathBuf,
    /// The application directory, relative to `base_dir`.
    pub app_dir: PathBuf,
    /// Resolve `themes_base_dir` below `app_dir` instead of `base_dir`.
    pub include_app_path: bool,
    /// Directory holding one sub directory per theme.
    pub themes_base_dir: PathBuf,
    pub default_theme: String,
    pub default_layout: String,
    pub default_template: String,
    /// Names of functions from the [`Extensions`](crate::Extensions) to install.
    pub register_functions: Vec<String>,
    /// Names of filters from the [`Extensions`](crate::Extensions) to install.
    pub register_filters: Vec<String>,
    /// Separator placed between the sections of the page title.
    pub title_separator: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            template_file_ext: ".html".to_string(),
            delimiters: Delimiters::default(),
            environment: EnvironmentOptions::default(),
            cache_dir: PathBuf::from("storage/minijinja/cache"),
            base_dir: PathBuf::from("."),
            app_dir: PathBuf::from("app"),
            include_app_path: false,
            themes_base_dir: PathBuf::from("themes"),
            default_theme: "default".to_string(),
            default_layout: "index".to_string(),
            default_template: "index".to_string(),
            register_functions: Vec::new(),
            register_filters: Vec::new(),
            title_separator: "|".to_string(),
        }
    }
}

impl ViewConfig {
    /// Loads a config from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    #[cfg(feature = "toml")]
    pub fn load_from_toml(path: &Path) -> Result<ViewConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from `MINIJINJA_VIEW_*` environment variables.
    pub fn update_from_env(&mut self) -> Result<(), ConfigError> {
        self.update_from_lookup(|key| env::var(key).ok())
    }

    /// Applies overrides through a lookup function.
    ///
    /// This is what [`update_from_env`](Self::update_from_env) uses with the
    /// process environment.
    pub fn update_from_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(theme) = lookup("MINIJINJA_VIEW_THEME") {
            self.default_theme = theme;
        }
        if let Some(layout) = lookup("MINIJINJA_VIEW_LAYOUT") {
            self.default_layout = layout;
        }
        if let Some(template) = lookup("MINIJINJA_VIEW_TEMPLATE") {
            self.default_template = template;
        }
        if let Some(ext) = lookup("MINIJINJA_VIEW_TEMPLATE_EXT") {
            self.template_file_ext = ext;
        }
        if let Some(separator) = lookup("MINIJINJA_VIEW_TITLE_SEPARATOR") {
            self.title_separator = separator;
        }
        if let Some(dir) = lookup("MINIJINJA_VIEW_THEMES_DIR") {
            self.themes_base_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("MINIJINJA_VIEW_BASE_DIR") {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("MINIJINJA_VIEW_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(autoescape) = lookup("MINIJINJA_VIEW_AUTOESCAPE") {
            self.environment.autoescape = autoescape;
        }
        if let Some(cache) = lookup("MINIJINJA_VIEW_CACHE") {
            self.environment.cache = parse_env_bool(&cache, "MINIJINJA_VIEW_CACHE")?;
        }
        if let Some(debug) = lookup("MINIJINJA_VIEW_DEBUG") {
            self.environment.debug = parse_env_bool(&debug, "MINIJINJA_VIEW_DEBUG")?;
        }
        if let Some(strict) = lookup("MINIJINJA_VIEW_STRICT") {
            self.environment.strict_variables = parse_env_bool(&strict, "MINIJINJA_VIEW_STRICT")?;
        }
        if let Some(reload) = lookup("MINIJINJA_VIEW_AUTO_RELOAD") {
            self.environment.auto_reload =
                Some(parse_env_bool(&reload, "MINIJINJA_VIEW_AUTO_RELOAD")?);
        }
        Ok(())
    }

    /// Returns the directory holding the themes.
    pub fn themes_base_path(&self) -> PathBuf {
        if self.include_app_path {
            self.base_dir.join(&self.app_dir).join(&self.themes_base_dir)
        } else {
            self.base_dir.join(&self.themes_base_dir)
        }
    }

    /// Returns the resolved cache directory.
    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache_dir)
    }

    /// Returns the template name of a layout, `layouts/{name}{ext}`.
    pub fn layout_path(&self, name: &str) -> String {
        format!("layouts/{}{}", name, self.template_file_ext)
    }

    /// Appends the template file extension to a template name.
    pub fn template_path(&self, name: &str) -> String {
        format!("{}{}", name, self.template_file_ext)
    }
}

fn parse_env_bool(s: &str, var: &'static str) -> Result<bool, ConfigError> {
    match s.to_lowercase().as_str() {
        "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidEnvVar {
            var,
            value: s.to_string(),
        }),
    }
}
