//! Include directive parser
//!
//! Recognizes `{{#include PATH[:FIRST][:LAST] ...}}` markers inside a line of a
//! shell block:
//! - `PATH` runs up to the first `:` or `}`; spaces are part of the path
//! - `FIRST` / `LAST` are optional 1-based line numbers, each preceded by `:`
//! - anything after the bounds and before the closing `}}` is annotation and
//!   is ignored
//! - the bytes following `}}` up to the next `{` (or end of line, terminator
//!   included) are the directive's trailing text
//!
//! Lines are handled as raw bytes so documents that are not valid UTF-8 pass
//! through untouched.

use regex::bytes::Regex;
use std::sync::OnceLock;

/// One side of an include line range, as written in the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// No bound given
    Absent,
    /// An explicit line number
    Line(usize),
    /// Bound text that is not a usable line number; the default applies
    Malformed(String),
}

impl Bound {
    fn parse(group: Option<&[u8]>) -> Self {
        let Some(raw) = group else {
            return Bound::Absent;
        };
        // The pattern guarantees a leading ':' followed by ASCII digits only
        let digits = String::from_utf8_lossy(&raw[1..]);
        match digits.parse::<usize>() {
            Ok(n) => Bound::Line(n),
            Err(_) => Bound::Malformed(digits.into_owned()),
        }
    }

    /// The explicit line number, if one was given and parsed.
    pub fn line(&self) -> Option<usize> {
        match self {
            Bound::Line(n) => Some(*n),
            Bound::Absent | Bound::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Bound::Malformed(_))
    }
}

/// A parsed `{{#include ...}}` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Path as written, not yet resolved
    pub path: String,
    pub first: Bound,
    pub last: Bound,
    /// Bytes following the directive on the same line, written after the
    /// included content
    pub trailing: Vec<u8>,
}

impl IncludeDirective {
    /// First line to copy (1-based, inclusive).
    pub fn first_line(&self) -> usize {
        self.first.line().unwrap_or(1).max(1)
    }

    /// Last line to copy (1-based, inclusive); `None` reads to end of file.
    pub fn last_line(&self) -> Option<usize> {
        self.last.line()
    }
}

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u)\{\{#include ([^:}]*)(:[0-9]*)?(:[0-9]*)?[^}]*\}\}([^{]*)")
            .expect("include regex is valid")
    })
}

/// Find every include directive on a line, left to right.
///
/// Returns an empty vec when the line has none, in which case the caller
/// copies the line verbatim. Text before the first directive is not part of
/// any directive and is not returned.
pub fn parse_directives(line: &[u8]) -> Vec<IncludeDirective> {
    include_re()
        .captures_iter(line)
        .map(|caps| IncludeDirective {
            path: caps
                .get(1)
                .map_or_else(String::new, |m| String::from_utf8_lossy(m.as_bytes()).into_owned()),
            first: Bound::parse(caps.get(2).map(|m| m.as_bytes())),
            last: Bound::parse(caps.get(3).map(|m| m.as_bytes())),
            trailing: caps.get(4).map_or_else(Vec::new, |m| m.as_bytes().to_vec()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(line: &str) -> IncludeDirective {
        let mut found = parse_directives(line.as_bytes());
        assert_eq!(found.len(), 1, "expected one directive in {:?}", line);
        found.remove(0)
    }

    #[test]
    fn test_no_directive() {
        assert!(parse_directives(b"echo hello\n").is_empty());
        assert!(parse_directives(b"echo {{ not an include }}\n").is_empty());
        assert!(parse_directives(b"").is_empty());
    }

    #[test]
    fn test_plain_include() {
        let d = one("{{#include ./snippets/body.sh}}\n");
        assert_eq!(d.path, "./snippets/body.sh");
        assert_eq!(d.first, Bound::Absent);
        assert_eq!(d.last, Bound::Absent);
        assert_eq!(d.first_line(), 1);
        assert_eq!(d.last_line(), None);
        // the line terminator belongs to the trailing text
        assert_eq!(d.trailing, b"\n");
    }

    #[test]
    fn test_first_only() {
        let d = one("{{#include f.sh:4}}");
        assert_eq!(d.first, Bound::Line(4));
        assert_eq!(d.last, Bound::Absent);
        assert_eq!(d.first_line(), 4);
        assert_eq!(d.last_line(), None);
        assert!(d.trailing.is_empty());
    }

    #[test]
    fn test_first_and_last() {
        let d = one("{{#include f.sh:2:3}} # tail\n");
        assert_eq!(d.path, "f.sh");
        assert_eq!(d.first_line(), 2);
        assert_eq!(d.last_line(), Some(3));
        assert_eq!(d.trailing, b" # tail\n");
    }

    #[test]
    fn test_annotation_ignored() {
        let d = one("{{#include f.sh:1:2 anchor=setup}}\n");
        assert_eq!(d.path, "f.sh");
        assert_eq!(d.last_line(), Some(2));
        assert_eq!(d.trailing, b"\n");
    }

    #[test]
    fn test_path_with_spaces() {
        let d = one("{{#include my snippets/body.sh:2}} # tail\n");
        assert_eq!(d.path, "my snippets/body.sh");
        assert_eq!(d.first_line(), 2);
        assert_eq!(d.trailing, b" # tail\n");

        // without bounds, everything up to `}}` is the path
        let d = one("{{#include my snippets/body.sh}}\n");
        assert_eq!(d.path, "my snippets/body.sh");
        assert_eq!(d.first, Bound::Absent);
    }

    #[test]
    fn test_single_space_after_include() {
        let d = one("{{#include  f.sh}}");
        assert_eq!(d.path, " f.sh");
        assert!(parse_directives(b"{{#include\tf.sh}}").is_empty());
    }

    #[test]
    fn test_malformed_bound_falls_back() {
        let d = one("{{#include f.sh:abc}}");
        assert_eq!(d.path, "f.sh");
        assert!(d.first.is_malformed());
        assert_eq!(d.first_line(), 1);
        assert_eq!(d.last_line(), None);

        let d = one("{{#include f.sh:}}");
        assert_eq!(d.first, Bound::Malformed(String::new()));

        let d = one("{{#include f.sh:2:99999999999999999999999999}}");
        assert_eq!(d.first_line(), 2);
        assert!(d.last.is_malformed());
        assert_eq!(d.last_line(), None);
    }

    #[test]
    fn test_zero_first_is_one() {
        assert_eq!(one("{{#include f.sh:0:2}}").first_line(), 1);
    }

    #[test]
    fn test_multiple_directives() {
        let found = parse_directives(b"{{#include a.sh}} and {{#include b.sh:1:1}} end\n");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].path, "a.sh");
        assert_eq!(found[0].trailing, b" and ");
        assert_eq!(found[1].path, "b.sh");
        assert_eq!(found[1].trailing, b" end\n");
    }

    #[test]
    fn test_trailing_stops_at_brace() {
        let d = one("{{#include a.sh}} x ${HOME}\n");
        assert_eq!(d.trailing, b" x $");
    }

    #[test]
    fn test_leading_text_not_captured() {
        let d = one("echo pre {{#include a.sh}} post\n");
        assert_eq!(d.path, "a.sh");
        assert_eq!(d.trailing, b" post\n");
    }

    #[test]
    fn test_non_utf8_line() {
        let mut line = b"{{#include a.sh}} \xff\xfe".to_vec();
        line.push(b'\n');
        let found = parse_directives(&line);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trailing, b" \xff\xfe\n");
    }
}
