//! Comparison constraints.
//!
//! All eight kinds share one implementation parameterised by [`Comparison`].
//! Messages are templated from the configured comparison value, not from
//! the input: `{{ value }}` and `{{ compared_value }}` both read the
//! configured value. The identity kinds are the exception and put the input
//! into `{{ value }}`.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::foundation::message::{COMPARED_VALUE, COMPARED_VALUE_TYPE, VALUE};
use crate::foundation::{ConfigError, ConstraintError, Message, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

/// The relation a [`Compare`] constraint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Loosely equal.
    EqualTo,
    /// Not loosely equal.
    NotEqualTo,
    /// Strictly equal.
    IdenticalTo,
    /// Not strictly equal.
    NotIdenticalTo,
    /// Strictly greater.
    GreaterThan,
    /// Greater or equal.
    GreaterThanOrEqual,
    /// Strictly less.
    LessThan,
    /// Less or equal.
    LessThanOrEqual,
}

impl Comparison {
    const fn default_message(self) -> &'static str {
        match self {
            Self::EqualTo => "This value should be equal to {{ compared_value }}.",
            Self::NotEqualTo => "This value should not be equal to {{ compared_value }}.",
            Self::IdenticalTo => {
                "This value should be identical to {{ compared_value_type }} {{ compared_value }}."
            }
            Self::NotIdenticalTo => {
                "This value should not be identical to {{ compared_value_type }} {{ compared_value }}."
            }
            Self::GreaterThan => "This value should be greater than {{ compared_value }}.",
            Self::GreaterThanOrEqual => {
                "This value should be greater than or equal to {{ compared_value }}."
            }
            Self::LessThan => "This value should be less than {{ compared_value }}.",
            Self::LessThanOrEqual => {
                "This value should be less than or equal to {{ compared_value }}."
            }
        }
    }

    /// Returns true if `value` stands in this relation to `reference`.
    pub fn holds(self, value: &FormValue, reference: &FormValue) -> bool {
        let ordering = || value.compare(reference);
        match self {
            Self::EqualTo => value.loose_eq(reference),
            Self::NotEqualTo => !value.loose_eq(reference),
            Self::IdenticalTo => value.strict_eq(reference),
            Self::NotIdenticalTo => !value.strict_eq(reference),
            Self::GreaterThan => ordering() == Some(Ordering::Greater),
            Self::GreaterThanOrEqual => {
                matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
            }
            Self::LessThan => ordering() == Some(Ordering::Less),
            Self::LessThanOrEqual => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
        }
    }

    const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanOrEqual | Self::LessThan | Self::LessThanOrEqual
        )
    }

    const fn echoes_input(self) -> bool {
        matches!(self, Self::IdenticalTo | Self::NotIdenticalTo)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompareOptions {
    value: FormValue,
    message: Option<String>,
}

/// A comparison against a configured value.
#[derive(Debug, Clone)]
pub struct Compare {
    /// Required relation.
    pub comparison: Comparison,
    /// Configured comparison value.
    pub value: FormValue,
    /// Violation message.
    pub message: String,
}

impl Compare {
    /// Creates a comparison with the default message.
    pub fn new(comparison: Comparison, value: impl Into<FormValue>) -> Self {
        Self {
            comparison,
            value: value.into(),
            message: comparison.default_message().to_owned(),
        }
    }

    /// Builds a comparison of the given relation from options.
    pub fn configure(
        comparison: Comparison,
        options: &Options,
        _site: &Site<'_>,
    ) -> Result<Self, ConfigError> {
        let CompareOptions { value, message } = decode(&format!("{comparison:?}"), options)?;
        Ok(Self {
            comparison,
            value,
            message: message.unwrap_or_else(|| comparison.default_message().to_owned()),
        })
    }

    fn render(&self, input: &FormValue) -> String {
        let shown = if self.comparison.echoes_input() {
            input
        } else {
            &self.value
        };
        let message = Message::new(&self.message)
            .with(VALUE, shown)
            .with(COMPARED_VALUE, &self.value);
        if self.comparison.is_ordering() {
            message.finish()
        } else {
            message.with(COMPARED_VALUE_TYPE, &self.value).finish()
        }
    }
}

impl Validate for Compare {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() || self.comparison.holds(value, &self.value) {
            return Ok(Vec::new());
        }
        Ok(vec![self.render(value)])
    }
}
