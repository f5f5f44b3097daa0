/// Conversion into the parts of a title segment.
///
/// This is implemented for single strings as well as for slices, arrays and
/// vectors of strings which allows calling the title methods with one or with
/// many parts:
///
/// ```
/// # use minijinja_view::TitleParts;
/// assert_eq!("Blog".into_title_parts(), vec!["Blog".to_string()]);
/// assert_eq!(["Post", "Blog"].into_title_parts().len(), 2);
/// ```
pub trait TitleParts {
    /// Converts the value into its title parts.
    fn into_title_parts(self) -> Vec<String>;
}

impl TitleParts for &str {
    fn into_title_parts(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl TitleParts for String {
    fn into_title_parts(self) -> Vec<String> {
        vec![self]
    }
}

impl TitleParts for &String {
    fn into_title_parts(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> TitleParts for &[S] {
    fn into_title_parts(self) -> Vec<String> {
        self.iter().map(|x| x.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> TitleParts for [S; N] {
    fn into_title_parts(self) -> Vec<String> {
        self.iter().map(|x| x.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> TitleParts for Vec<S> {
    fn into_title_parts(self) -> Vec<String> {
        self.iter().map(|x| x.as_ref().to_string()).collect()
    }
}

/// Joins parts into one segment, `None` if there are no parts.
pub(crate) fn join_segment(parts: Vec<String>, separator: &str) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&format!(" {} ", separator)))
    }
}

pub(crate) fn append(current: Option<String>, segment: String, separator: &str) -> String {
    match current {
        Some(current) => format!("{} {} {}", current, separator, segment),
        None => segment,
    }
}

pub(crate) fn prepend(current: Option<String>, segment: String, separator: &str) -> String {
    match current {
        Some(current) => format!("{} {} {}", segment, separator, current),
        None => segment,
    }
}
