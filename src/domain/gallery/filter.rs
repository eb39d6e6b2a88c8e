// SPDX-License-Identifier: MPL-2.0
//! Backend-neutral record filter expressions.
//!
//! The domain decides *what* to filter on; adapters render the expression in
//! their own query language (see `infrastructure::pocketbase::filter`).

/// A literal compared against a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `field = value`. Dotted fields traverse relations (`owner.public`).
    Eq { field: String, value: FilterValue },
    /// Any of the inner expressions matches.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq_text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn eq_bool(field: impl Into<String>, value: bool) -> Self {
        Self::Eq {
            field: field.into(),
            value: FilterValue::Bool(value),
        }
    }

    #[must_use]
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }
}
