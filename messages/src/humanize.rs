/// Turn an attribute or model identifier into a sentence subject.
///
/// A trailing `_id` is dropped, underscores become spaces, and only the first
/// character is capitalized.
///
/// ```rust
/// use messages::humanize;
///
/// assert_eq!(humanize("title"), "Title");
/// assert_eq!(humanize("first_name"), "First name");
/// assert_eq!(humanize("author_id"), "Author");
/// ```
pub fn humanize(name: &str) -> String {
    let name = name.strip_suffix("_id").filter(|s| !s.is_empty()).unwrap_or(name);

    let words = name
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
