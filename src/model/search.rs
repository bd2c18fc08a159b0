//! Free-text search over JSON rows
//!
//! A query wrapped in double quotes is matched case-sensitively with the
//! quotes removed; anything else is matched case-insensitively. Keys that
//! start with `_` are internal bookkeeping and are never searched.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Prefix of keys that are never searched or displayed
pub const RESERVED_PREFIX: char = '_';

/// A compiled row test, compared by identity rather than by behaviour
#[derive(Clone)]
pub struct Predicate(Rc<dyn Fn(&Value) -> bool>);

impl Predicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self(Rc::new(test))
    }

    /// Predicate that accepts every row
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, value: &Value) -> bool {
        (self.0)(value)
    }

    /// True if both handles point at the same compiled test
    pub fn same(&self, other: &Predicate) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({:p})", Rc::as_ptr(&self.0))
    }
}

/// A parsed search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    case_sensitive: bool,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        let quoted = query.len() >= 2 && query.starts_with('"') && query.ends_with('"');
        if quoted {
            Self {
                term: query[1..query.len() - 1].to_string(),
                case_sensitive: true,
            }
        } else {
            Self {
                term: query.to_lowercase(),
                case_sensitive: false,
            }
        }
    }

    #[cfg(test)]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[cfg(test)]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Recursively look for the term in any string inside `value`
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX))
                .any(|(_, v)| self.matches(v)),
            Value::Array(items) => items.iter().any(|v| self.matches(v)),
            Value::String(s) => {
                if self.case_sensitive {
                    s.contains(&self.term)
                } else {
                    s.to_lowercase().contains(&self.term)
                }
            }
            _ => false,
        }
    }
}

/// Compile a query into a predicate; an empty query accepts everything
pub fn compile(query: &str) -> Predicate {
    let parsed = SearchQuery::parse(query);
    if parsed.term.is_empty() {
        return Predicate::always();
    }
    Predicate::new(move |value| parsed.matches(value))
}
