//! MiniJinja-View adds theme and page management on top of
//! [MiniJinja](https://github.com/mitsuhiko/minijinja).
//!
//! A [`View`] is created per request from a [`ViewConfig`].  It keeps track of
//! the active theme (a directory of templates below the themes directory), the
//! layout, the template to render, local and global variables, the page title
//! and the HTML meta tags of the page.  Rendering hands everything over to a
//! MiniJinja [`Environment`](minijinja::Environment).
//!
//! A themes directory looks like this:
//!
//! ```text
//! themes/
//!   default/
//!     layouts/index.html
//!     index.html
//!   dark/
//!     layouts/index.html
//! ```
//!
//! Templates of the active theme are looked up first, templates missing from
//! it are taken from themes that were active before, usually the default
//! theme.
//!
//! ## Example
//!
//! ```no_run
//! # fn test() -> Result<(), minijinja_view::Error> {
//! use minijinja_view::{context, Scope, View, ViewConfig};
//!
//! let mut view = View::new(ViewConfig::default())?;
//! view.set_title("Blog")
//!     .prepend_title("Hello World")
//!     .set_meta("description", "A first post")
//!     .set_meta_with("og:title", "Hello World", "property")
//!     .set_global("site_name", "Example");
//! view.set_context(context! { post => "Lorem ipsum" }, Scope::Local)?;
//! println!("{}", view.render_template("posts/show")?);
//! # Ok(()) }
//! ```
//!
//! The layout template receives the title as `title`, the compiled meta tags
//! as `meta` and its own name as `_layout`:
//!
//! ```jinja
//! <title>{{ title }}</title>
//! {{ meta }}
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod extensions;
pub mod helpers;
mod loader;
mod meta;
mod title;
mod view;

pub use self::config::{Delimiters, EnvironmentOptions, ViewConfig};
pub use self::error::{ConfigError, Error};
pub use self::extensions::Extensions;
pub use self::loader::{safe_join, TemplateLocations};
pub use self::meta::{MetaTag, MetaTags, DEFAULT_META_ATTRIBUTE};
pub use self::title::TitleParts;
pub use self::view::{Scope, View, LAYOUT_KEY, META_KEY, TITLE_KEY};

pub use minijinja;
pub use minijinja::{context, Value};
