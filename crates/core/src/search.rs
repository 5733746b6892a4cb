//! Free-text search term classification.

/// A user-supplied search box value, classified once at the edge.
///
/// A purely numeric term is treated as an id lookup; anything else becomes a
/// case-insensitive substring match over the entity's text columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchTerm {
    #[default]
    Empty,
    Numeric(i32),
    Text(String),
}

impl SearchTerm {
    /// Classify raw input. Digit strings that overflow `i32` fall back to text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let term = raw.trim();
        if term.is_empty() {
            return Self::Empty;
        }
        if term.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = term.parse::<i32>()
        {
            return Self::Numeric(id);
        }
        Self::Text(term.to_owned())
    }

    /// Convenience for optional query parameters.
    #[must_use]
    pub fn from_option(raw: Option<&str>) -> Self {
        raw.map_or(Self::Empty, Self::parse)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The term as typed, for echoing back into the search box.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Numeric(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        }
    }

    /// `ILIKE` pattern matching `text` anywhere, with wildcards escaped.
    #[must_use]
    pub fn like_pattern(text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('%');
        for c in text.chars() {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('%');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_terms() {
        assert_eq!(SearchTerm::parse(""), SearchTerm::Empty);
        assert_eq!(SearchTerm::parse("   "), SearchTerm::Empty);
        assert_eq!(SearchTerm::parse(" 42 "), SearchTerm::Numeric(42));
        assert_eq!(SearchTerm::parse("ABC-12"), SearchTerm::Text("ABC-12".into()));
        assert_eq!(SearchTerm::parse("-5"), SearchTerm::Text("-5".into()));
    }

    #[test]
    fn overflowing_digits_are_text() {
        assert_eq!(
            SearchTerm::parse("99999999999"),
            SearchTerm::Text("99999999999".into())
        );
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(SearchTerm::like_pattern("red"), "%red%");
        assert_eq!(SearchTerm::like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(SearchTerm::like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn optional_input() {
        assert!(SearchTerm::from_option(None).is_empty());
        assert_eq!(SearchTerm::from_option(Some("7")).display(), "7");
    }
}
