//! Evaluation result triples handed to the UI layer
//!
//! The engine emits `(label, value, category)` triples; turning them into
//! tree nodes, icons, and formatted text is entirely the debugger
//! frontend's responsibility.

use crate::objects::object::PyObject;
use crate::proxy::RemoteProxy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the UI should categorize a child entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCategory {
    /// A data member or container element
    Property,
    /// A synthetic method-like entry such as `len()`
    Method,
}

/// The value side of an evaluation result
#[derive(Clone)]
pub enum ChildValue {
    /// An already-computed scalar (e.g. a container length)
    Int(i64),
    /// A lazy proxy the UI may expand further
    Object(PyObject),
}

impl fmt::Debug for ChildValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildValue::Int(value) => write!(f, "Int({value})"),
            ChildValue::Object(object) => write!(f, "Object({})", object.address()),
        }
    }
}

/// One child entry of an expanded value
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub label: Option<String>,
    pub value: ChildValue,
    pub category: ResultCategory,
}

impl EvaluationResult {
    /// A labeled method-like pseudo-child
    pub fn method(label: impl Into<String>, value: ChildValue) -> Self {
        EvaluationResult {
            label: Some(label.into()),
            value,
            category: ResultCategory::Method,
        }
    }

    /// A labeled property child
    pub fn property(label: impl Into<String>, value: ChildValue) -> Self {
        EvaluationResult {
            label: Some(label.into()),
            value,
            category: ResultCategory::Property,
        }
    }

    /// An unlabeled container element
    pub fn element(value: ChildValue) -> Self {
        EvaluationResult {
            label: None,
            value,
            category: ResultCategory::Property,
        }
    }
}
