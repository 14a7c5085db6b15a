//! Clause grammar for YANG `length` and `range` arguments.
//!
//! Both share the shape `low [.. high]`, `|`-separated, with the sentinels
//! `min`/`max` (and `-INF`/`INF` for ranges). Numeric tokens are kept as
//! their source text; the emitter never needs their numeric value, only
//! whether a bound is a sentinel. The part patterns are carried over from
//! pyang's syntax definitions.

use once_cell::sync::Lazy;
use regex::Regex;

static LENGTH_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<low>min|max|[0-9]+)\s*(?:\.\.\s*(?P<high>min|max|[0-9]+))?")
        .expect("length regex")
});

static RANGE_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<low>-INF|min|max|[+-]?[0-9]+(?:\.[0-9]+)?)\s*(?:\.\.\s*(?P<high>INF|min|max|[+-]?[0-9]+(?:\.[0-9]+)?))?",
    )
    .expect("range regex")
});

/// One end of a clause. Sentinels mean "no explicit bound".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
    NegInf,
    Inf,
    Value(String),
}

impl Bound {
    fn parse(token: &str) -> Bound {
        match token {
            "min" => Bound::Min,
            "max" => Bound::Max,
            "-INF" => Bound::NegInf,
            "INF" => Bound::Inf,
            other => Bound::Value(other.to_string()),
        }
    }

    /// Sentinel in low position: no explicit lower bound.
    pub fn is_low_sentinel(&self) -> bool {
        matches!(self, Bound::Min | Bound::NegInf)
    }

    /// Sentinel in high position: no explicit upper bound.
    pub fn is_high_sentinel(&self) -> bool {
        matches!(self, Bound::Max | Bound::Inf)
    }

    /// Source text of a concrete bound; sentinels render as UNBOUNDED.
    pub fn render(&self) -> &str {
        match self {
            Bound::Value(v) => v,
            _ => "UNBOUNDED",
        }
    }
}

/// `low` alone is a single admissible value (range) or a plain upper bound
/// (length); `low .. high` is a real interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub low: Bound,
    pub high: Option<Bound>,
}

impl Clause {
    pub fn is_single_value(&self) -> bool {
        self.high.is_none()
    }
}

pub fn parse_length_expr(arg: &str) -> Vec<Clause> {
    parse_parts(&LENGTH_PART_RE, arg)
}

pub fn parse_range_expr(arg: &str) -> Vec<Clause> {
    parse_parts(&RANGE_PART_RE, arg)
}

fn parse_parts(re: &Regex, arg: &str) -> Vec<Clause> {
    re.captures_iter(arg)
        .map(|caps| Clause {
            low: Bound::parse(caps.name("low").map(|m| m.as_str()).unwrap_or("")),
            high: caps.name("high").map(|m| Bound::parse(m.as_str())),
        })
        .collect()
}
