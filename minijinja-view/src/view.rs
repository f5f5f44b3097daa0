use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, ErrorKind, Template};
use serde::Serialize;
use tracing::{debug, error};

use crate::config::ViewConfig;
use crate::error::{ConfigError, Error};
use crate::extensions::Extensions;
use crate::loader::{locations_loader, resolve_theme_dir, TemplateLocations};
use crate::meta::{MetaTag, MetaTags};
use crate::title::{self, TitleParts};

/// Global holding the page title.
pub const TITLE_KEY: &str = "title";
/// Global holding the compiled meta tags.
pub const META_KEY: &str = "meta";
/// Global holding the template name of the active layout.
pub const LAYOUT_KEY: &str = "_layout";

/// Where a view variable is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Passed as context to the rendered template only.
    #[default]
    Local,
    /// Registered with the environment and visible to every render.
    Global,
}

/// Manages theme, layout, variables, title and meta tags for rendering a
/// page.
///
/// A view is meant to be created per request.  It is configured in any
/// order through its setters and finally rendered with [`render`](Self::render)
/// or streamed with [`display`](Self::display):
///
/// ```no_run
/// # fn test() -> Result<(), minijinja_view::Error> {
/// use minijinja_view::{View, ViewConfig};
///
/// let mut view = View::new(ViewConfig::default())?;
/// view.set_theme("dark")?
///     .set_layout("blog")
///     .set_title("Hello World")
///     .set_meta("description", "A first post")
///     .set("author", "Jane");
/// let html = view.render_template("posts/show")?;
/// # Ok(()) }
/// ```
///
/// Templates get the local variables as context.  Global variables, the
/// `title`, the compiled `meta` tags and the `_layout` template name are
/// registered as globals of the environment, so a page template usually
/// starts with `{% extends _layout %}`.
pub struct View {
    config: ViewConfig,
    env: Environment<'static>,
    themes_base_dir: PathBuf,
    cache_dir: Option<PathBuf>,
    locations: TemplateLocations,
    theme: String,
    layout: String,
    template: String,
    locals: IndexMap<String, Value>,
    globals: IndexMap<String, Value>,
    meta: MetaTags,
    rendered: bool,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("theme", &self.theme)
            .field("layout", &self.layout)
            .field("template", &self.template)
            .field("locations", &self.locations)
            .field("locals", &self.locals)
            .field("globals", &self.globals)
            .field("meta", &self.meta)
            .field("rendered", &self.rendered)
            .finish()
    }
}

impl View {
    /// Creates a view with the default [`Extensions`].
    pub fn new(config: ViewConfig) -> Result<View, Error> {
        View::with_extensions(config, &Extensions::default())
    }

    /// Creates a view installing the configured functions and filters from
    /// the given registry.
    ///
    /// Fails with a configuration error if the default theme does not exist,
    /// if the delimiters or environment options are rejected, or if a
    /// function or filter to register is unknown.
    pub fn with_extensions(config: ViewConfig, extensions: &Extensions) -> Result<View, Error> {
        View::create(config, extensions).map_err(|err| {
            error!("failed to set up view: {}", err);
            Error::Configuration(err)
        })
    }

    fn create(config: ViewConfig, extensions: &Extensions) -> Result<View, ConfigError> {
        let themes_base_dir = config.themes_base_path();

        let mut env = Environment::new();
        config.environment.apply_to_env(&mut env)?;
        env.set_syntax(config.delimiters.make_syntax()?);
        extensions.install(
            &mut env,
            &config.register_functions,
            &config.register_filters,
        )?;

        let cache_dir = if config.environment.cache {
            let path = config.cache_path();
            std::fs::create_dir_all(&path).map_err(|source| ConfigError::CacheDir {
                path: path.clone(),
                source,
            })?;
            Some(path)
        } else {
            None
        };

        let (theme_dir, exists) = resolve_theme_dir(&themes_base_dir, &config.default_theme);
        if !exists {
            return Err(ConfigError::DefaultTheme {
                name: config.default_theme.clone(),
                path: theme_dir,
            });
        }

        let mut rv = View {
            env,
            themes_base_dir,
            cache_dir,
            locations: TemplateLocations::new(),
            theme: String::new(),
            layout: String::new(),
            template: String::new(),
            locals: IndexMap::new(),
            globals: IndexMap::new(),
            meta: MetaTags::new(),
            rendered: false,
            config,
        };
        let default_theme = rv.config.default_theme.clone();
        let default_layout = rv.config.default_layout.clone();
        let default_template = rv.config.default_template.clone();
        rv.activate_theme(default_theme, theme_dir);
        rv.set_layout(default_layout).set_template(default_template);
        rv.set_global(TITLE_KEY, "").set_global(META_KEY, "");
        Ok(rv)
    }

    /// Switches to another theme.
    ///
    /// The theme directory must exist below the themes base directory.  Its
    /// templates take precedence over the ones of previously active themes.
    /// On failure the active theme stays untouched.
    pub fn set_theme(&mut self, name: &str) -> Result<&mut Self, Error> {
        let (dir, exists) = resolve_theme_dir(&self.themes_base_dir, name);
        if !exists {
            error!(
                "requested theme {} has not been loaded because it does not exist",
                name
            );
            return Err(Error::ThemeNotFound {
                name: name.to_string(),
                path: dir,
            });
        }
        self.activate_theme(name.to_string(), dir);
        Ok(self)
    }

    fn activate_theme(&mut self, name: String, dir: PathBuf) {
        debug!(theme = %name, path = %dir.display(), "activating theme");
        self.locations.activate(dir);
        self.env
            .set_loader(locations_loader(self.locations.clone()));
        self.env.clear_templates();
        self.theme = name;
    }

    /// Sets the layout.
    ///
    /// This exposes `layouts/{name}{ext}` as `_layout` global.
    pub fn set_layout<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.layout = name.into();
        let path = self.config.layout_path(&self.layout);
        debug!(layout = %self.layout, "setting layout");
        self.set_global(LAYOUT_KEY, path)
    }

    /// Sets the template to render, without the file extension.
    ///
    /// The template is not looked up until the view is rendered.
    pub fn set_template<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.template = name.into();
        self
    }

    /// Sets a local variable.
    pub fn set<K: Into<String>, V: Serialize>(&mut self, key: K, value: V) -> &mut Self {
        self.set_scoped(key, value, Scope::Local)
    }

    /// Sets a global variable.
    pub fn set_global<K: Into<String>, V: Serialize>(&mut self, key: K, value: V) -> &mut Self {
        self.set_scoped(key, value, Scope::Global)
    }

    /// Sets a variable in the given scope.
    pub fn set_scoped<K: Into<String>, V: Serialize>(
        &mut self,
        key: K,
        value: V,
        scope: Scope,
    ) -> &mut Self {
        self.insert_value(key.into(), Value::from_serialize(&value), scope);
        self
    }

    /// Sets many variables in the same scope.
    pub fn set_all<I, K, V>(&mut self, iter: I, scope: Scope) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        for (key, value) in iter {
            self.set_scoped(key, value, scope);
        }
        self
    }

    /// Sets all entries of a serializable map, for instance one created
    /// with [`context!`](minijinja::context).
    ///
    /// Anything that does not serialize into a map is rejected.
    pub fn set_context<S: Serialize>(&mut self, ctx: S, scope: Scope) -> Result<&mut Self, Error> {
        let ctx = Value::from_serialize(&ctx);
        let kind = ctx.kind();
        if kind != ValueKind::Map {
            error!("cannot set view variables from {}", kind);
            return Err(Error::InvalidContext { kind });
        }
        let keys = ctx
            .try_iter()
            .map_err(|_| Error::InvalidContext { kind })?;
        for key in keys {
            let value = ctx.get_item(&key).unwrap_or_default();
            let key = match key.as_str() {
                Some(key) => key.to_string(),
                None => key.to_string(),
            };
            self.insert_value(key, value, scope);
        }
        Ok(self)
    }

    fn insert_value(&mut self, key: String, value: Value, scope: Scope) {
        match scope {
            Scope::Local => {
                self.locals.insert(key, value);
            }
            Scope::Global => {
                self.env.add_global(key.clone(), value.clone());
                self.globals.insert(key, value);
            }
        }
    }

    /// Removes a local variable.
    ///
    /// Globals cannot be removed individually.
    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.locals.shift_remove(key);
        self
    }

    /// Looks up a variable, globals first, then locals.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.globals.get(key).or_else(|| self.locals.get(key))
    }

    /// Returns the local variables.
    pub fn locals(&self) -> &IndexMap<String, Value> {
        &self.locals
    }

    /// Returns the global variables.
    pub fn globals(&self) -> &IndexMap<String, Value> {
        &self.globals
    }

    /// Sets the title.
    ///
    /// If a title was set already the new parts are appended, which makes
    /// this equivalent to [`append_title`](Self::append_title).  Multiple parts
    /// are joined with the title separator.  Passing no parts does nothing.
    pub fn set_title<P: TitleParts>(&mut self, parts: P) -> &mut Self {
        self.append_title(parts)
    }

    /// Appends parts to the title.
    pub fn append_title<P: TitleParts>(&mut self, parts: P) -> &mut Self {
        let separator = self.config.title_separator.clone();
        if let Some(segment) = title::join_segment(parts.into_title_parts(), &separator) {
            let title = title::append(self.title(), segment, &separator);
            self.set_global(TITLE_KEY, title);
        }
        self
    }

    /// Prepends parts to the title.
    pub fn prepend_title<P: TitleParts>(&mut self, parts: P) -> &mut Self {
        let separator = self.config.title_separator.clone();
        if let Some(segment) = title::join_segment(parts.into_title_parts(), &separator) {
            let title = title::prepend(self.title(), segment, &separator);
            self.set_global(TITLE_KEY, title);
        }
        self
    }

    /// Returns the current title unless it's empty.
    pub fn title(&self) -> Option<String> {
        let value = self.globals.get(TITLE_KEY)?;
        if value.is_none() || value.is_undefined() {
            return None;
        }
        let rv = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        (!rv.is_empty()).then_some(rv)
    }

    /// Sets a meta tag using the `name` attribute.
    pub fn set_meta<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) -> &mut Self {
        self.meta.insert(MetaTag::new(name, value));
        self
    }

    /// Sets a meta tag with a custom attribute such as `property`.
    pub fn set_meta_with<N, V, A>(&mut self, name: N, value: V, attribute: A) -> &mut Self
    where
        N: Into<String>,
        V: Into<String>,
        A: Into<String>,
    {
        self.meta
            .insert(MetaTag::with_attribute(name, value, attribute));
        self
    }

    /// Removes the named meta tags.  An empty list removes all of them.
    pub fn unset_meta<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = names.into_iter().peekable();
        if names.peek().is_none() {
            self.meta.clear();
        } else {
            for name in names {
                self.meta.remove(name.as_ref());
            }
        }
        self
    }

    /// Removes all meta tags.
    pub fn clear_meta(&mut self) -> &mut Self {
        self.meta.clear();
        self
    }

    /// Returns all meta tags.
    pub fn meta(&self) -> &MetaTags {
        &self.meta
    }

    /// Looks up a meta tag by name.
    pub fn get_meta(&self, name: &str) -> Option<&MetaTag> {
        self.meta.get(name)
    }

    /// Compiles all meta tags into HTML.
    pub fn compile_meta(&self) -> String {
        self.meta.compile()
    }

    /// Compiles a single meta tag into HTML.
    pub fn compile_meta_tag(&self, name: &str) -> Option<String> {
        self.meta.get(name).map(MetaTag::to_html)
    }

    /// Renders the active template.
    pub fn render(&mut self) -> Result<String, Error> {
        let name = self.prepare_render();
        let tmpl = self.load(&name)?;
        tmpl.render(&self.locals)
            .map_err(|err| self.render_failed(&name, err))
    }

    /// Renders a template, making it the active one.
    ///
    /// An empty name renders the active template.
    pub fn render_template(&mut self, name: &str) -> Result<String, Error> {
        if !name.is_empty() {
            self.set_template(name);
        }
        self.render()
    }

    /// Renders the active template into a writer.
    pub fn display<W: io::Write>(&mut self, w: W) -> Result<(), Error> {
        let name = self.prepare_render();
        let tmpl = self.load(&name)?;
        tmpl.render_to_write(&self.locals, w)
            .map(|_| ())
            .map_err(|err| self.render_failed(&name, err))
    }

    /// Renders a template into a writer, making it the active one.
    ///
    /// An empty name renders the active template.
    pub fn display_template<W: io::Write>(&mut self, name: &str, w: W) -> Result<(), Error> {
        if !name.is_empty() {
            self.set_template(name);
        }
        self.display(w)
    }

    /// Publishes the meta tags, marks the view as rendered and returns the
    /// template name to load.
    fn prepare_render(&mut self) -> String {
        let meta = self.compile_meta();
        self.set_global(META_KEY, meta);
        self.rendered = true;
        if self.config.environment.reload_on_render() {
            self.env.clear_templates();
        }
        let name = self.config.template_path(&self.template);
        debug!(template = %name, theme = %self.theme, "rendering template");
        name
    }

    fn load(&self, name: &str) -> Result<Template<'_, '_>, Error> {
        self.env.get_template(name).map_err(|err| {
            if err.kind() == ErrorKind::TemplateNotFound {
                error!(
                    "template {} not found in theme {} ({} locations)",
                    name,
                    self.theme,
                    self.locations.len()
                );
                Error::TemplateNotFound {
                    name: name.to_string(),
                    paths: self.locations.paths().to_vec(),
                }
            } else {
                self.render_failed(name, err)
            }
        })
    }

    fn render_failed(&self, name: &str, err: minijinja::Error) -> Error {
        error!("failed to render template {}: {:#}", name, err);
        Error::Render {
            name: name.to_string(),
            source: err,
        }
    }

    /// Returns the file a template name resolves to, if any.
    pub fn resolve_template_path(&self, name: &str) -> Option<PathBuf> {
        self.locations.find(&self.config.template_path(name))
    }

    /// Returns the name of the active theme.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns the name of the active layout.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Returns the name of the active template, without extension.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns `true` once a render was attempted.
    ///
    /// The flag is raised before the template is loaded, so it is also set
    /// when rendering failed.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Returns the template locations in search order.
    pub fn template_locations(&self) -> &TemplateLocations {
        &self.locations
    }

    /// Returns the directory holding the themes.
    pub fn themes_base_dir(&self) -> &Path {
        &self.themes_base_dir
    }

    /// Returns the cache directory if caching is enabled.
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Returns the config the view was created from.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns the underlying environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }
}
