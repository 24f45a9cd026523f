/// URL-safe slug from a pool name: lowercase alphanumerics with single
/// hyphens between words.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn collapses_separators_and_lowercases() {
        assert_eq!(slugify("2025 Bowl Buster!"), "2025-bowl-buster");
        assert_eq!(slugify("  March   Madness  "), "march-madness");
        assert_eq!(slugify("Squares (Q4)"), "squares-q4");
    }

    #[test]
    fn empty_and_symbol_only_names_give_empty_slugs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
