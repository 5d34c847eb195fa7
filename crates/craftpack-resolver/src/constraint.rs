//! Version constraint parsing and matching.
//!
//! A single constraint is an optional operator followed by a version:
//! `=1.2.0`, `>1.2.0`, `>=1.2.0`, `<2.0.0`, `<=2.0.0`, `~1.2.0`, `^1.2.0`.
//! A bare version means `=`; `*` or an empty string matches anything.
//! A constraint set is a whitespace-separated list ANDed together
//! (`>=1.2.0 <2.0.0`). There is no OR syntax.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ResolutionError;
use crate::version::{compare, parse_version, Version};

/// Comparison operator of a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    /// Same major and minor, patch may float up.
    Tilde,
    /// Same major (same major and minor below 1.0), minor/patch may float up.
    Caret,
    Any,
}

impl Op {
    /// Recognized prefixes, longest first so `>=` wins over `>`.
    const PREFIXES: [(&'static str, Op); 7] = [
        (">=", Op::Ge),
        ("<=", Op::Le),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
        ("~", Op::Tilde),
        ("^", Op::Caret),
    ];

    fn from_token(token: &str) -> Option<Op> {
        Self::PREFIXES
            .iter()
            .find(|(p, _)| *p == token)
            .map(|(_, op)| *op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Tilde => "~",
            Op::Caret => "^",
            Op::Any => "*",
        })
    }
}

/// A single version predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub op: Op,
    /// `None` only for [`Op::Any`].
    pub version: Option<Version>,
    pub raw: String,
}

impl Constraint {
    pub fn any() -> Self {
        Self {
            op: Op::Any,
            version: None,
            raw: "*".to_string(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ResolutionError> {
        parse_constraint(s)
    }

    pub fn matches(&self, version: &Version) -> bool {
        matches(self, version)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse one constraint token.
pub fn parse_constraint(s: &str) -> Result<Constraint, ResolutionError> {
    let s = s.trim();
    if s.is_empty() || s == "*" {
        return Ok(Constraint::any());
    }

    let (op, rest) = Op::PREFIXES
        .iter()
        .find_map(|(prefix, op)| s.strip_prefix(*prefix).map(|rest| (*op, rest)))
        .unwrap_or((Op::Eq, s));

    let version = parse_version(rest).map_err(|e| {
        ResolutionError::invalid_constraint(format!("invalid constraint '{s}'"))
            .with_details(e.message)
    })?;

    Ok(Constraint {
        op,
        version: Some(version),
        raw: s.to_string(),
    })
}

/// Test a version against one constraint.
pub fn matches(constraint: &Constraint, version: &Version) -> bool {
    let Some(target) = &constraint.version else {
        return true;
    };
    let ord = compare(version, target);
    match constraint.op {
        Op::Any => true,
        Op::Eq => ord == Ordering::Equal,
        Op::Gt => ord == Ordering::Greater,
        Op::Ge => ord != Ordering::Less,
        Op::Lt => ord == Ordering::Less,
        Op::Le => ord != Ordering::Greater,
        Op::Tilde => {
            version.major == target.major
                && version.minor == target.minor
                && ord != Ordering::Less
        }
        Op::Caret => {
            let same_line = if target.major == 0 {
                version.major == 0 && version.minor == target.minor
            } else {
                version.major == target.major
            };
            same_line && ord != Ordering::Less
        }
    }
}

/// A set of constraints that must all hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConstraints {
    pub constraints: Vec<Constraint>,
    pub raw: String,
}

impl VersionConstraints {
    pub fn parse(s: &str) -> Result<Self, ResolutionError> {
        parse_version_constraints(s)
    }

    /// `true` iff every constraint matches. An empty set matches anything.
    pub fn matches_all(&self, version: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(version))
    }

    /// `true` when the set places no restriction on versions.
    pub fn is_any(&self) -> bool {
        self.constraints.iter().all(|c| c.op == Op::Any)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl fmt::Display for VersionConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            f.write_str("*")
        } else {
            f.write_str(&self.raw)
        }
    }
}

/// Parse a whitespace-separated constraint list.
///
/// A lone operator token is joined with the token after it, so
/// `>= 1.2.0 < 2.0.0` reads the same as `>=1.2.0 <2.0.0`.
pub fn parse_version_constraints(s: &str) -> Result<VersionConstraints, ResolutionError> {
    let mut constraints = Vec::new();
    let mut tokens = s.split_whitespace();
    while let Some(token) = tokens.next() {
        let constraint = match (Op::from_token(token), tokens.clone().next()) {
            (Some(_), Some(next)) => {
                tokens.next();
                parse_constraint(&format!("{token}{next}"))?
            }
            _ => parse_constraint(token)?,
        };
        constraints.push(constraint);
    }
    Ok(VersionConstraints {
        constraints,
        raw: s.trim().to_string(),
    })
}

/// `matches_all` as a free function.
pub fn matches_all(constraints: &VersionConstraints, version: &Version) -> bool {
    constraints.matches_all(version)
}

#[derive(Clone, Copy)]
struct Bound<'a> {
    version: &'a Version,
    strict: bool,
}

/// Heuristic check that two constraint sets can hold at the same time.
///
/// Range operators (`>`, `>=`, `<`, `<=`) from both sets are merged into one
/// `[min, max]` interval; every `=` constraint is then checked against every
/// other constraint in the merged set. `~` and `^` only take part through that
/// `=` check, so two non-overlapping tilde ranges are reported compatible.
pub fn is_compatible(a: &VersionConstraints, b: &VersionConstraints) -> bool {
    let merged: Vec<&Constraint> = a.iter().chain(b.iter()).collect();

    let mut lower: Option<Bound<'_>> = None;
    let mut upper: Option<Bound<'_>> = None;
    for c in &merged {
        let Some(version) = &c.version else {
            continue;
        };
        match c.op {
            Op::Gt | Op::Ge => {
                let strict = c.op == Op::Gt;
                lower = Some(match lower {
                    Some(cur) => match version.cmp(cur.version) {
                        Ordering::Greater => Bound { version, strict },
                        Ordering::Equal => Bound {
                            version,
                            strict: cur.strict || strict,
                        },
                        Ordering::Less => cur,
                    },
                    None => Bound { version, strict },
                });
            }
            Op::Lt | Op::Le => {
                let strict = c.op == Op::Lt;
                upper = Some(match upper {
                    Some(cur) => match version.cmp(cur.version) {
                        Ordering::Less => Bound { version, strict },
                        Ordering::Equal => Bound {
                            version,
                            strict: cur.strict || strict,
                        },
                        Ordering::Greater => cur,
                    },
                    None => Bound { version, strict },
                });
            }
            _ => {}
        }
    }

    for (i, c) in merged.iter().enumerate() {
        if c.op != Op::Eq {
            continue;
        }
        let Some(pinned) = &c.version else {
            continue;
        };
        let all_hold = merged
            .iter()
            .enumerate()
            .all(|(j, other)| i == j || other.matches(pinned));
        if !all_hold {
            return false;
        }
    }

    if let (Some(lo), Some(hi)) = (lower, upper) {
        match lo.version.cmp(hi.version) {
            Ordering::Greater => return false,
            Ordering::Equal if lo.strict || hi.strict => return false,
            _ => {}
        }
    }

    true
}
