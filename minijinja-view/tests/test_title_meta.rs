use std::fs;

use minijinja_view::{MetaTag, View, ViewConfig};
use similar_asserts::assert_eq;
use tempfile::TempDir;

fn create_view(separator: &str) -> (TempDir, View) {
    let dir = tempfile::tempdir().unwrap();
    let theme = dir.path().join("themes").join("default");
    fs::create_dir_all(&theme).unwrap();
    fs::write(theme.join("index.html"), "{{ title }}|{{ meta }}").unwrap();
    let config = ViewConfig {
        base_dir: dir.path().to_path_buf(),
        title_separator: separator.to_string(),
        ..Default::default()
    };
    let view = View::new(config).unwrap();
    (dir, view)
}

fn title_of(view: &View) -> Option<String> {
    view.get("title").and_then(|x| x.as_str()).map(|x| x.to_string())
}

#[test]
fn test_append_and_prepend() {
    let (_dir, mut view) = create_view("|");
    view.append_title("A").append_title("B");
    assert_eq!(title_of(&view).as_deref(), Some("A | B"));
    view.prepend_title("C");
    assert_eq!(title_of(&view).as_deref(), Some("C | A | B"));
    assert_eq!(view.title().as_deref(), Some("C | A | B"));
}

#[test]
fn test_set_title_joins_parts() {
    let (_dir, mut view) = create_view("|");
    view.set_title(["X", "Y"]);
    assert_eq!(title_of(&view).as_deref(), Some("X | Y"));

    // setting again appends, like append_title
    view.set_title(vec!["Z".to_string()]);
    assert_eq!(title_of(&view).as_deref(), Some("X | Y | Z"));
}

#[test]
fn test_prepend_multiple_parts() {
    let (_dir, mut view) = create_view("-");
    view.set_title("Site");
    view.prepend_title(&["Post", "Blog"][..]);
    assert_eq!(title_of(&view).as_deref(), Some("Post - Blog - Site"));
}

#[test]
fn test_empty_title_parts() {
    let (_dir, mut view) = create_view("|");
    view.set_title(Vec::<String>::new());
    assert_eq!(view.get("title").and_then(|x| x.as_str()), Some(""));
    assert_eq!(view.title(), None);

    view.set_title("A").append_title(Vec::<&str>::new());
    view.prepend_title(Vec::<&str>::new());
    assert_eq!(title_of(&view).as_deref(), Some("A"));
}

#[test]
fn test_none_title_is_replaced() {
    let (_dir, mut view) = create_view("|");
    view.set_global("title", ());
    view.append_title("A");
    assert_eq!(title_of(&view).as_deref(), Some("A"));
}

#[test]
fn test_title_is_rendered() {
    let (_dir, mut view) = create_view("|");
    view.set_title("Home").prepend_title("Page");
    assert_eq!(view.render().unwrap(), "Page | Home|");
}

#[test]
fn test_meta_upsert() {
    let (_dir, mut view) = create_view("|");
    view.set_meta("description", "x").set_meta("description", "y");

    assert_eq!(view.meta().len(), 1);
    assert_eq!(
        view.get_meta("description"),
        Some(&MetaTag::new("description", "y"))
    );
    assert_eq!(view.get_meta("keywords"), None);
}

#[test]
fn test_compile_meta() {
    let (_dir, mut view) = create_view("|");
    view.set_meta("a", "1");
    assert_eq!(view.compile_meta(), "<meta name=\"a\" content=\"1\">\n");

    view.set_meta_with("og:type", "article", "property");
    assert_eq!(
        view.compile_meta(),
        "<meta name=\"a\" content=\"1\">\n<meta property=\"og:type\" content=\"article\">\n"
    );
    assert_eq!(
        view.compile_meta_tag("og:type").as_deref(),
        Some("<meta property=\"og:type\" content=\"article\">\n")
    );
    assert_eq!(view.compile_meta_tag("missing"), None);
}

#[test]
fn test_meta_is_not_escaped() {
    let (_dir, mut view) = create_view("|");
    view.set_meta("description", "\"quoted\" & <b>");
    assert_eq!(
        view.compile_meta(),
        "<meta name=\"description\" content=\"\"quoted\" & <b>\">\n"
    );
}

#[test]
fn test_unset_meta() {
    let (_dir, mut view) = create_view("|");
    view.set_meta("a", "1").set_meta("b", "2").set_meta("c", "3");

    view.unset_meta(["b", "missing"]);
    let names: Vec<_> = view.meta().iter().map(|x| x.name.clone()).collect();
    assert_eq!(names, vec!["a".to_string(), "c".to_string()]);

    view.unset_meta(Vec::<&str>::new());
    assert!(view.meta().is_empty());
    assert_eq!(view.get_meta("a"), None);
    assert_eq!(view.compile_meta(), "");

    view.set_meta("d", "4").clear_meta();
    assert!(view.meta().is_empty());
}

#[test]
fn test_meta_is_published_on_render() {
    let (_dir, mut view) = create_view("|");
    view.set_title("T").set_meta("a", "1");
    assert_eq!(view.get("meta").and_then(|x| x.as_str()), Some(""));
    assert_eq!(view.render().unwrap(), "T|<meta name=\"a\" content=\"1\">\n");

    view.unset_meta(["a"]);
    assert_eq!(view.render().unwrap(), "T|");
    assert_eq!(view.get("meta").and_then(|x| x.as_str()), Some(""));
}
