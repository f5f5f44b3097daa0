//! Shorthand functions for the most common view operations.
//!
//! These take the view explicitly, so they work with whatever request scoped
//! view a handler was handed.
use serde::Serialize;

use crate::error::Error;
use crate::view::{Scope, View};

/// Renders a template with the given data as local variables.
///
/// `data` is usually a map or [`context!`](minijinja::context).  A unit or
/// `None` value sets no variables.
pub fn render_template<S: Serialize>(view: &mut View, name: &str, data: S) -> Result<String, Error> {
    let data = minijinja::Value::from_serialize(&data);
    view.set_template(name);
    if !data.is_none() && !data.is_undefined() {
        view.set_context(data, Scope::Local)?;
    }
    view.render()
}

/// Switches the theme.
pub fn set_theme<'v>(view: &'v mut View, name: &str) -> Result<&'v mut View, Error> {
    view.set_theme(name)
}

/// Sets the layout.
pub fn set_layout<'v>(view: &'v mut View, name: &str) -> &'v mut View {
    view.set_layout(name)
}

/// Sets the page title, appending to an existing one either way.
pub fn set_page_title<'v>(view: &'v mut View, title: &str, append: bool) -> &'v mut View {
    if append {
        view.append_title(title)
    } else {
        view.set_title(title)
    }
}

/// Appends to the page title.
pub fn append_page_title<'v>(view: &'v mut View, title: &str) -> &'v mut View {
    view.append_title(title)
}

/// Prepends to the page title.
pub fn prepend_page_title<'v>(view: &'v mut View, title: &str) -> &'v mut View {
    view.prepend_title(title)
}

/// Sets a meta tag.  `attribute` defaults to `name`.
pub fn set_page_meta<'v>(
    view: &'v mut View,
    name: &str,
    value: &str,
    attribute: Option<&str>,
) -> &'v mut View {
    match attribute {
        Some(attribute) => view.set_meta_with(name, value, attribute),
        None => view.set_meta(name, value),
    }
}
