//! Metadata filter predicates for similarity queries.
//!
//! Filters are a small tagged union so that only well-formed predicates can
//! be constructed: single equality constraints, or a conjunction of them.
//! [`Filter::to_where_clause`] renders the JSON grammar the index expects;
//! [`Filter::matches`] evaluates the predicate for in-process backends.

use serde_json::{Value, json};

use crate::document::EntryMetadata;

/// A metadata predicate attached to a similarity query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Requires `field` to equal `value` exactly.
    Equals {
        /// The metadata field name.
        field: String,
        /// The required value.
        value: String,
    },
    /// Requires every inner clause to hold.
    And(Vec<Filter>),
}

impl Filter {
    /// Build an equality clause.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals { field: field.into(), value: value.into() }
    }

    /// Build a conjunction of clauses.
    pub fn and(clauses: Vec<Filter>) -> Self {
        Filter::And(clauses)
    }

    /// Compose equality constraints into a predicate.
    ///
    /// Zero constraints yield `None` (an unfiltered query); one yields a
    /// single [`Filter::Equals`]; two or more yield a [`Filter::And`] of
    /// equality clauses in input order.
    pub fn from_constraints(constraints: &[(String, String)]) -> Option<Filter> {
        match constraints {
            [] => None,
            [(field, value)] => Some(Filter::equals(field, value)),
            many => Some(Filter::And(
                many.iter().map(|(f, v)| Filter::equals(f, v)).collect(),
            )),
        }
    }

    /// Render the predicate in the index's JSON where-clause grammar.
    ///
    /// Equality renders as `{"field": "value"}`; conjunctions wrap their
    /// clauses as `{"$and": [...]}`.
    pub fn to_where_clause(&self) -> Value {
        match self {
            Filter::Equals { field, value } => {
                let mut clause = serde_json::Map::new();
                clause.insert(field.clone(), Value::String(value.clone()));
                Value::Object(clause)
            }
            Filter::And(clauses) => {
                let inner: Vec<Value> =
                    clauses.iter().map(Filter::to_where_clause).collect();
                json!({ "$and": inner })
            }
        }
    }

    /// Evaluate the predicate against stored entry metadata.
    ///
    /// `section` is the only indexed field; constraints on any other field
    /// match nothing.
    pub fn matches(&self, metadata: &EntryMetadata) -> bool {
        match self {
            Filter::Equals { field, value } => {
                field == "section" && metadata.section == *value
            }
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(metadata)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(f, v)| (f.to_string(), v.to_string())).collect()
    }

    #[test]
    fn zero_constraints_is_unfiltered() {
        assert_eq!(Filter::from_constraints(&[]), None);
    }

    #[test]
    fn one_constraint_is_a_bare_equality() {
        let filter =
            Filter::from_constraints(&constraints(&[("section", "Funding")])).unwrap();
        assert_eq!(filter, Filter::equals("section", "Funding"));
        assert_eq!(filter.to_where_clause(), json!({"section": "Funding"}));
    }

    #[test]
    fn two_constraints_become_a_conjunction() {
        let filter = Filter::from_constraints(&constraints(&[
            ("section", "Funding"),
            ("section", "Intro"),
        ]))
        .unwrap();
        assert_eq!(
            filter.to_where_clause(),
            json!({"$and": [{"section": "Funding"}, {"section": "Intro"}]})
        );
    }

    #[test]
    fn equality_matches_stored_section() {
        let meta = EntryMetadata { section: "Funding".into() };
        assert!(Filter::equals("section", "Funding").matches(&meta));
        assert!(!Filter::equals("section", "Intro").matches(&meta));
        assert!(!Filter::equals("author", "Funding").matches(&meta));
    }

    #[test]
    fn conjunction_requires_every_clause() {
        let meta = EntryMetadata { section: "Funding".into() };
        let both = Filter::and(vec![
            Filter::equals("section", "Funding"),
            Filter::equals("section", "Funding"),
        ]);
        let mixed = Filter::and(vec![
            Filter::equals("section", "Funding"),
            Filter::equals("section", "Intro"),
        ]);
        assert!(both.matches(&meta));
        assert!(!mixed.matches(&meta));
    }
}
