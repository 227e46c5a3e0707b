//! Route pattern matching.
//!
//! # Responsibilities
//! - Match request paths against segment glob patterns
//! - `*` matches exactly one segment, a trailing `**` matches zero or more
//! - Expose a specificity key so the most specific pattern wins
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching
//! - Specificity replaces registration order: the same table always matches
//!   the same route no matter how it was built

/// One pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` — any single segment.
    Any,
}

/// A compiled path pattern such as `/api/tickets/*/comments/**`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    /// Trailing `**`: the pattern also matches any deeper suffix.
    matches_rest: bool,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut matches_rest = false;
        for part in pattern.split('/') {
            if part.is_empty() {
                continue;
            }
            match part {
                "**" => {
                    matches_rest = true;
                    break;
                }
                "*" => segments.push(Segment::Any),
                literal => segments.push(Segment::Literal(literal.to_string())),
            }
        }
        Self {
            raw: pattern.to_string(),
            segments,
            matches_rest,
        }
    }

    /// Returns true if the request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if self.matches_rest {
            if parts.len() < self.segments.len() {
                return false;
            }
        } else if parts.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(parts.iter())
            .all(|(segment, part)| match segment {
                Segment::Literal(literal) => literal == part,
                Segment::Any => true,
            })
    }

    /// Sort key for longest-pattern-wins: more fixed segments first, then
    /// more literal segments, then raw length as a stable tie-break.
    pub fn specificity(&self) -> (usize, usize, usize) {
        let literals = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();
        (self.segments.len(), literals, self.raw.len())
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_glob_matches_zero_or_more() {
        let pattern = PathPattern::new("/api/tickets/**");
        assert!(pattern.matches("/api/tickets"));
        assert!(pattern.matches("/api/tickets/1"));
        assert!(pattern.matches("/api/tickets/1/history"));
        assert!(!pattern.matches("/api/users/1"));
        assert!(!pattern.matches("/api"));
    }

    #[test]
    fn single_wildcard_matches_one_segment() {
        let pattern = PathPattern::new("/api/tickets/*/comments/**");
        assert!(pattern.matches("/api/tickets/42/comments"));
        assert!(pattern.matches("/api/tickets/42/comments/9"));
        assert!(!pattern.matches("/api/tickets/comments"));
        assert!(!pattern.matches("/api/tickets/42"));
    }

    #[test]
    fn nested_pattern_is_more_specific() {
        let nested = PathPattern::new("/api/tickets/*/comments/**");
        let broad = PathPattern::new("/api/tickets/**");
        assert!(nested.specificity() > broad.specificity());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let pattern = PathPattern::new("/api/users/**");
        assert!(pattern.matches("/api/users/"));
        assert!(pattern.matches("/api/users/me/"));
    }
}
