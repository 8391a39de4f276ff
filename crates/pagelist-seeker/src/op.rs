//! Comparison operators for filter conditions.

use std::str::FromStr;

/// Comparison operator for a filter condition.
///
/// - `Eq`: equality-set test. How a token list matches depends on the
///   combinator: full containment under AND, intersection under OR.
/// - `Contains`: equality-set test where a token list always matches by
///   intersection. The field name is looked up lower-cased.
/// - `Matches`: regular expression against the raw field text.
/// - `StartsWith`: literal prefix of the raw field text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equality set (the default for authored filter rows).
    #[default]
    Eq,
    /// Equality set with intersection semantics.
    Contains,
    /// Regular expression match.
    Matches,
    /// Prefix match.
    StartsWith,
}

impl Op {
    /// Returns `true` if this operator compares lower-cased tokens.
    pub fn is_membership_op(self) -> bool {
        matches!(self, Op::Eq | Op::Contains)
    }

    /// Returns `true` if this operator tests the raw, case-sensitive text.
    pub fn is_text_op(self) -> bool {
        matches!(self, Op::Matches | Op::StartsWith)
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Contains => "contains",
            Op::Matches => "matches",
            Op::StartsWith => "startswith",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" | "equals" => Ok(Op::Eq),
            "contains" => Ok(Op::Contains),
            "matches" | "regex" => Ok(Op::Matches),
            "startswith" | "starts-with" | "prefix" => Ok(Op::StartsWith),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}
