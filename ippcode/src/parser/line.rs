use std::ops::Range;

/// A whitespace-delimited word with its byte span in the whole source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Range<usize>,
}

/// The tokens of one non-blank source line.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub tokens: Vec<Token<'a>>,
}

impl<'a> Line<'a> {
    /// The instruction name (always present: blank lines are never produced).
    pub fn head(&self) -> &Token<'a> {
        &self.tokens[0]
    }

    pub fn operands(&self) -> &[Token<'a>] {
        &self.tokens[1..]
    }

    /// Span from the first to the last token.
    pub fn span(&self) -> Range<usize> {
        let start = self.tokens[0].span.start;
        let end = self.tokens[self.tokens.len() - 1].span.end;
        start..end
    }
}

/// Iterate over the lines of `source` that carry something besides whitespace
/// and comments.
pub fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    source
        .split('\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let start = offset;
            offset += raw.len() + 1;
            let tokens = tokenize(raw, start);
            if tokens.is_empty() {
                None
            } else {
                Some(Line {
                    number: index + 1,
                    tokens,
                })
            }
        })
}

/// Split one raw line into tokens. Everything from the first `#` on is a
/// comment. `offset` is the byte position of `raw` within the source.
pub fn tokenize(raw: &str, offset: usize) -> Vec<Token<'_>> {
    let code = match raw.find('#') {
        Some(hash) => &raw[..hash],
        None => raw,
    };

    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in code.char_indices() {
        if is_separator(c) {
            if let Some(s) = start.take() {
                tokens.push(token(code, s, i, offset));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(token(code, s, code.len(), offset));
    }
    tokens
}

fn token(code: &str, start: usize, end: usize, offset: usize) -> Token<'_> {
    Token {
        text: &code[start..end],
        span: offset + start..offset + end,
    }
}

fn is_separator(c: char) -> bool {
    // ASCII whitespace plus vertical tab and NUL
    c.is_ascii_whitespace() || c == '\x0B' || c == '\0'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(raw: &str) -> Vec<&str> {
        tokenize(raw, 0).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(texts("  ADD\tGF@x   int@1 int@2\r"), vec!["ADD", "GF@x", "int@1", "int@2"]);
    }

    #[test]
    fn strips_comments() {
        assert_eq!(texts("WRITE GF@x # print it"), vec!["WRITE", "GF@x"]);
        assert_eq!(texts("WRITE string@a#b"), vec!["WRITE", "string@a"]);
        assert!(texts("# only a comment").is_empty());
        assert!(texts("   \t ").is_empty());
    }

    #[test]
    fn spans_are_source_offsets() {
        let tokens = tokenize(" MOVE GF@x", 10);
        assert_eq!(tokens[0].span, 11..15);
        assert_eq!(tokens[1].span, 16..20);
    }

    #[test]
    fn lines_skip_blank_and_comment_lines() {
        let source = "# header follows\n.IPPcode22\n\n  # nothing\nBREAK\n";
        let lines: Vec<Line<'_>> = lines(source).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 2);
        assert_eq!(lines[0].head().text, ".IPPcode22");
        assert_eq!(lines[1].number, 5);
        assert_eq!(&source[lines[1].span()], "BREAK");
        assert!(lines[1].operands().is_empty());
    }
}
