use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// The attribute used for meta tags unless another one is given.
pub const DEFAULT_META_ATTRIBUTE: &str = "name";

/// Describes a single HTML `<meta>` tag.
///
/// The `attribute` names the attribute that carries the tag's name.  It is
/// `name` for regular tags and usually `property` for Open Graph tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    /// The name of the tag, for instance `description`.
    pub name: String,
    /// The content of the tag.
    pub value: String,
    /// The attribute holding the name.
    pub attribute: String,
}

impl MetaTag {
    /// Creates a tag using the `name` attribute.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> MetaTag {
        MetaTag::with_attribute(name, value, DEFAULT_META_ATTRIBUTE)
    }

    /// Creates a tag with an explicit attribute.
    pub fn with_attribute<N, V, A>(name: N, value: V, attribute: A) -> MetaTag
    where
        N: Into<String>,
        V: Into<String>,
        A: Into<String>,
    {
        MetaTag {
            name: name.into(),
            value: value.into(),
            attribute: attribute.into(),
        }
    }

    /// Compiles the tag into a line of HTML.
    ///
    /// Name, value and attribute are emitted as given, no escaping is
    /// performed.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MetaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "<meta {}=\"{}\" content=\"{}\">",
            self.attribute, self.name, self.value
        )
    }
}

/// An insertion ordered collection of meta tags keyed by name.
///
/// Setting a tag with a name that already exists replaces the old tag but
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetaTags {
    tags: IndexMap<String, MetaTag>,
}

impl MetaTags {
    /// Creates an empty collection.
    pub fn new() -> MetaTags {
        MetaTags::default()
    }

    /// Inserts or replaces a tag, returning the replaced one.
    pub fn insert(&mut self, tag: MetaTag) -> Option<MetaTag> {
        self.tags.insert(tag.name.clone(), tag)
    }

    /// Looks up a tag by name.
    pub fn get(&self, name: &str) -> Option<&MetaTag> {
        self.tags.get(name)
    }

    /// Removes a tag by name.
    pub fn remove(&mut self, name: &str) -> Option<MetaTag> {
        self.tags.shift_remove(name)
    }

    /// Removes all tags.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over the tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MetaTag> {
        self.tags.values()
    }

    /// Compiles all tags into HTML, one tag per line.
    pub fn compile(&self) -> String {
        self.iter().map(MetaTag::to_html).collect()
    }
}

impl<'a> IntoIterator for &'a MetaTags {
    type Item = &'a MetaTag;
    type IntoIter = indexmap::map::Values<'a, String, MetaTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    #[test]
    fn test_to_html() {
        assert_eq!(MetaTag::new("a", "1").to_html(), "<meta name=\"a\" content=\"1\">\n");
        assert_eq!(
            MetaTag::with_attribute("og:title", "Home", "property").to_html(),
            "<meta property=\"og:title\" content=\"Home\">\n"
        );
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut tags = MetaTags::new();
        tags.insert(MetaTag::new("description", "x"));
        tags.insert(MetaTag::new("keywords", "a, b"));
        let old = tags.insert(MetaTag::new("description", "y"));

        assert_eq!(old.map(|x| x.value), Some("x".to_string()));
        assert_eq!(tags.len(), 2);
        assert_eq!(
            tags.compile(),
            "<meta name=\"description\" content=\"y\">\n<meta name=\"keywords\" content=\"a, b\">\n"
        );
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut tags = MetaTags::new();
        tags.insert(MetaTag::new("a", "1"));
        tags.insert(MetaTag::new("b", "2"));
        tags.insert(MetaTag::new("c", "3"));
        tags.remove("b");
        let names: Vec<_> = tags.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(tags.remove("b").is_none());
    }
}
