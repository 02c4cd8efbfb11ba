//! Operations whose replayed results must not be substituted

use crate::category::MockCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(exact) => exact == value,
            Pattern::Prefix(prefix) => value.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    category: Option<String>,
    operation: Pattern,
}

/// Ignore rules in one of the forms `operation`, `Category:operation`,
/// with an optional trailing `*` on the operation for prefix matches.
///
/// An ignored operation is still looked up while replaying, but its
/// recorded result never replaces the real call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    rules: Vec<Rule>,
}

impl IgnoreList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref().trim();
                if entry.is_empty() {
                    return None;
                }
                let rule = match entry.split_once(':') {
                    Some((category, operation)) => Rule {
                        category: Some(category.trim().to_string()),
                        operation: Pattern::parse(operation.trim()),
                    },
                    None => Rule {
                        category: None,
                        operation: Pattern::parse(entry),
                    },
                };
                Some(rule)
            })
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_ignored(&self, category: &MockCategory, operation: &str) -> bool {
        self.rules.iter().any(|rule| {
            let category_matches = rule
                .category
                .as_deref()
                .is_none_or(|name| name.eq_ignore_ascii_case(category.as_str()));
            category_matches && rule.operation.matches(operation)
        })
    }
}
