use std::borrow::Cow;

/// Escape character data.
pub fn text(raw: &str) -> Cow<'_, str> {
    escape(raw, false)
}

/// Escape a double-quoted attribute value.
pub fn attribute(raw: &str) -> Cow<'_, str> {
    escape(raw, true)
}

fn escape(raw: &str, in_attribute: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| match c {
        '&' | '<' | '>' => true,
        '"' | '\n' | '\r' | '\t' => in_attribute,
        _ => false,
    };
    if !raw.chars().any(needs_escape) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            '\r' if in_attribute => out.push_str("&#13;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(text("GF@x"), Cow::Borrowed("GF@x")));
    }

    #[test]
    fn markup_characters() {
        assert_eq!(text("a<b>&c\"d"), "a&lt;b&gt;&amp;c\"d");
        assert_eq!(attribute("a<b>&c\"d"), "a&lt;b&gt;&amp;c&quot;d");
        assert_eq!(attribute("x\ty"), "x&#9;y");
    }

    #[test]
    fn escapes_in_source_strings_pass_through() {
        assert_eq!(text("a\\065b"), "a\\065b");
    }
}
