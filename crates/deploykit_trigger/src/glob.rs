//! Watch-path patterns.
//!
//! Patterns and paths are split on `/` and matched segment by segment:
//!
//! - `**` as a whole segment matches zero or more segments, so `src/**`
//!   matches `src`, `src/a` and `src/a/b`. Inside a segment it acts as `*`.
//! - `*` matches any run of characters within a segment, `?` exactly one.
//! - `[abc]`, `[a-z]`, `[!a]` and `[^a]` match one character in (or not in)
//!   the class. A `]` right after the opening bracket is a member; an
//!   unterminated `[` is a literal.
//! - `\c` matches `c` literally.
//!
//! Matching is case-sensitive and never fails: anything that does not parse
//! as a wildcard is taken literally. Paths are not normalized.
//!
//! Unlike shell globbing, `*`, `?` and `**` also match names starting with
//! `.`, so `*` covers `.env` and `src/**` covers `src/.cache/x`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class { negated: bool, ranges: Vec<(char, char)> },
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::AnyChar => true,
            Token::AnyRun => false,
            Token::Class { negated, ranges } => {
                ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)) != *negated
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Globstar,
    Tokens(Vec<Token>),
}

/// Parse a bracket class starting just after `[`.
///
/// Returns the token and the number of chars consumed including the
/// closing `]`, or `None` when the class is unterminated.
fn parse_class(chars: &[char]) -> Option<(Token, usize)> {
    let mut i = 0;
    let negated = matches!(chars.first(), Some('!') | Some('^'));
    if negated {
        i += 1;
    }

    let mut members = Vec::new();
    let mut first = true;
    loop {
        let c = *chars.get(i)?;
        if c == ']' && !first {
            break;
        }
        first = false;

        let c = if c == '\\' {
            i += 1;
            *chars.get(i)?
        } else {
            c
        };
        members.push(c);
        i += 1;
    }

    // Fold `a-z` triples into ranges; a `-` at either end stays literal.
    let mut ranges = Vec::new();
    let mut j = 0;
    while j < members.len() {
        if j + 2 < members.len() && members[j + 1] == '-' {
            let (lo, hi) = (members[j], members[j + 2]);
            if lo <= hi {
                ranges.push((lo, hi));
            }
            j += 3;
        } else {
            ranges.push((members[j], members[j]));
            j += 1;
        }
    }

    Some((Token::Class { negated, ranges }, i + 1))
}

fn parse_segment(segment: &str) -> Segment {
    if segment == "**" {
        return Segment::Globstar;
    }

    let chars: Vec<char> = segment.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                tokens.push(Token::Literal(chars.get(i + 1).copied().unwrap_or('\\')));
                i += 2;
            }
            '*' => {
                if tokens.last() != Some(&Token::AnyRun) {
                    tokens.push(Token::AnyRun);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => match parse_class(&chars[i + 1..]) {
                Some((class, consumed)) => {
                    tokens.push(class);
                    i += 1 + consumed;
                }
                None => {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            },
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }

    Segment::Tokens(tokens)
}

/// Match one path segment, backtracking only to the last `*`.
fn match_tokens(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnyRun) => {
                backtrack = Some((t, s));
                t += 1;
            }
            Some(token) if token.matches(text[s]) => {
                t += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((star, from)) => {
                    backtrack = Some((star, from + 1));
                    t = star + 1;
                    s = from + 1;
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyRun)
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Globstar, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Tokens(tokens), rest)) => match path.split_first() {
            Some((head, tail)) => {
                let text: Vec<char> = head.chars().collect();
                match_tokens(tokens, &text) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// A compiled watch-path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPattern {
    source: String,
    segments: Vec<Segment>,
}

impl WatchPattern {
    /// Compile a pattern. Never fails.
    pub fn new(pattern: &str) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        for segment in pattern.split('/').map(parse_segment) {
            if segment == Segment::Globstar && segments.last() == Some(&Segment::Globstar) {
                continue;
            }
            segments.push(segment);
        }

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').collect();
        match_segments(&self.segments, &parts)
    }
}

impl fmt::Display for WatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
