//! Path expression parsing.
//!
//! `Address.City`, `Team.Streak[0]`, `Scores["2024"][1]`, `[3].Name`.

// == Path Token ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Named member access
    Member(String),
    /// Indexer access with the raw bracket text
    Index(String),
}

// == Parse ==
/// Splits a path into tokens, or `None` if it is malformed.
///
/// A segment is an optional member name followed by any number of
/// `[index]` suffixes; it must contain at least one of the two. Dots inside
/// brackets do not split segments.
pub fn parse(path: &str) -> Option<Vec<PathToken>> {
    let mut tokens = Vec::new();
    let mut rest = path;

    loop {
        let name_end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
        let name = rest[..name_end].trim();
        rest = &rest[name_end..];

        let mut has_token = !name.is_empty();
        if has_token {
            tokens.push(PathToken::Member(name.to_string()));
        }

        while let Some(after_open) = rest.strip_prefix('[') {
            let close = after_open.find(']')?;
            tokens.push(PathToken::Index(after_open[..close].trim().to_string()));
            rest = &after_open[close + 1..];
            has_token = true;
        }

        if !has_token {
            return None;
        }

        match rest.strip_prefix('.') {
            Some(next) => rest = next,
            None if rest.is_empty() => return Some(tokens),
            // stray `]` or text after an indexer
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> PathToken {
        PathToken::Member(name.to_string())
    }

    fn index(raw: &str) -> PathToken {
        PathToken::Index(raw.to_string())
    }

    #[test]
    fn test_parse_members() {
        assert_eq!(parse("Name"), Some(vec![member("Name")]));
        assert_eq!(
            parse("Address.City"),
            Some(vec![member("Address"), member("City")])
        );
        assert_eq!(parse(" Address . City "), Some(vec![member("Address"), member("City")]));
    }

    #[test]
    fn test_parse_indexers() {
        assert_eq!(
            parse("Team.Streak[0]"),
            Some(vec![member("Team"), member("Streak"), index("0")])
        );
        assert_eq!(
            parse("Grid[1][2].Label"),
            Some(vec![member("Grid"), index("1"), index("2"), member("Label")])
        );
        assert_eq!(parse("[3].Name"), Some(vec![index("3"), member("Name")]));
        assert_eq!(
            parse("Scores[\"a.b\"]"),
            Some(vec![member("Scores"), index("\"a.b\"")])
        );
    }

    #[test]
    fn test_parse_malformed() {
        for path in [
            "", "   ", ".", "A.", ".A", "A..B", "A[0", "A]", "A[0]B", "A[0]]", "A.[",
        ] {
            assert_eq!(parse(path), None, "{path:?} should not parse");
        }
    }

    #[test]
    fn test_parse_empty_index_is_kept() {
        // Rejected later by the indexer conversion, not by the grammar
        assert_eq!(parse("A[]"), Some(vec![member("A"), index("")]));
    }
}
