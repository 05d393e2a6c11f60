//! Operation outcomes
//!
//! Orchestrator calls return `WrapperResult<Outcome<T>>`: the error side
//! carries fatal configuration problems, the outcome carries everything
//! operational. An outcome is complete, partial (some relation could not be
//! resolved), or empty with the reason no record came back.

use std::fmt;

use crate::record::Record;
use crate::schema::Cardinality;

/// Why an operation produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The server answered with a non-success status
    Status(u16),
    /// The response body was empty
    EmptyBody,
    /// The response body was not valid JSON
    MalformedJson(String),
    /// The request never produced a response
    Transport(String),
    /// The JSON held nothing that could be applied to a record
    NothingToApply,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::Status(status) => write!(f, "server responded with status {}", status),
            EmptyReason::EmptyBody => write!(f, "response body was empty"),
            EmptyReason::MalformedJson(details) => write!(f, "malformed JSON: {}", details),
            EmptyReason::Transport(details) => write!(f, "request failed: {}", details),
            EmptyReason::NothingToApply => write!(f, "response held nothing to apply"),
        }
    }
}

/// A relation that could not be fully resolved during wrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationIssue {
    /// One element of a relation value could not be upserted
    ElementSkipped {
        relation: String,
        index: Option<usize>,
        reason: String,
    },
    /// The JSON shape does not fit the association, so nothing was attached
    Unassignable {
        relation: String,
        cardinality: Cardinality,
    },
}

impl fmt::Display for RelationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationIssue::ElementSkipped {
                relation,
                index: Some(index),
                reason,
            } => write!(f, "skipped {}[{}]: {}", relation, index, reason),
            RelationIssue::ElementSkipped {
                relation, reason, ..
            } => write!(f, "skipped {}: {}", relation, reason),
            RelationIssue::Unassignable {
                relation,
                cardinality,
            } => write!(f, "could not attach {} ({} association)", relation, cardinality),
        }
    }
}

/// Result of an operation that went through the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Partial { value: T, issues: Vec<RelationIssue> },
    Empty(EmptyReason),
}

impl<T> Outcome<T> {
    /// `Complete` when there are no issues, `Partial` otherwise
    pub fn with_issues(value: T, issues: Vec<RelationIssue>) -> Self {
        if issues.is_empty() {
            Outcome::Complete(value)
        } else {
            Outcome::Partial { value, issues }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Complete(value) | Outcome::Partial { value, .. } => Some(value),
            Outcome::Empty(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Complete(value) | Outcome::Partial { value, .. } => Some(value),
            Outcome::Empty(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Outcome::Partial { .. })
    }

    pub fn issues(&self) -> &[RelationIssue] {
        match self {
            Outcome::Partial { issues, .. } => issues,
            _ => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            Outcome::Empty(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Complete(value) => Outcome::Complete(f(value)),
            Outcome::Partial { value, issues } => Outcome::Partial {
                value: f(value),
                issues,
            },
            Outcome::Empty(reason) => Outcome::Empty(reason),
        }
    }
}

/// Records produced by a fetch: one for an object payload, many for an array
#[derive(Debug, Clone, PartialEq)]
pub enum Models {
    One(Record),
    Many(Vec<Record>),
}

impl Models {
    pub fn len(&self) -> usize {
        match self {
            Models::One(_) => 1,
            Models::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<&Record> {
        match self {
            Models::One(record) => vec![record],
            Models::Many(records) => records.iter().collect(),
        }
    }

    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Models::One(record) => vec![record],
            Models::Many(records) => records,
        }
    }
}

impl Outcome<Models> {
    /// Fetched records; an empty outcome yields none
    pub fn records(&self) -> Vec<&Record> {
        self.value().map(Models::records).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityId;

    #[test]
    fn test_with_issues() {
        let complete: Outcome<u8> = Outcome::with_issues(1, Vec::new());
        assert_eq!(complete, Outcome::Complete(1));
        assert!(complete.issues().is_empty());

        let issue = RelationIssue::Unassignable {
            relation: "plan".to_string(),
            cardinality: Cardinality::ToOne,
        };
        let partial = Outcome::with_issues(1, vec![issue.clone()]);
        assert!(partial.is_partial());
        assert_eq!(partial.value(), Some(&1));
        assert_eq!(partial.issues(), &[issue]);
    }

    #[test]
    fn test_empty() {
        let empty: Outcome<u8> = Outcome::Empty(EmptyReason::Status(500));
        assert!(empty.is_empty());
        assert!(empty.value().is_none());
        assert_eq!(empty.empty_reason(), Some(&EmptyReason::Status(500)));
        assert_eq!(empty.map(|v| v + 1), Outcome::Empty(EmptyReason::Status(500)));
    }

    #[test]
    fn test_models_records() {
        let one = Outcome::Complete(Models::One(Record::new(EntityId(0))));
        assert_eq!(one.records().len(), 1);

        let none: Outcome<Models> = Outcome::Empty(EmptyReason::MalformedJson("eof".into()));
        assert!(none.records().is_empty());

        let many = Models::Many(vec![Record::new(EntityId(0)), Record::new(EntityId(0))]);
        assert_eq!(many.len(), 2);
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn test_display() {
        let issue = RelationIssue::ElementSkipped {
            relation: "tasks".to_string(),
            index: Some(1),
            reason: "not an object".to_string(),
        };
        assert_eq!(issue.to_string(), "skipped tasks[1]: not an object");
        assert!(EmptyReason::Status(404).to_string().contains("404"));
    }
}
