//! Length and Count.
//!
//! Limits arrive as numbers or numeric strings and are parsed once. Messages
//! are resolved against their limit at construction: the plural form is
//! picked and `{{ limit }}` substituted.

use serde::Deserialize;

use crate::foundation::message::prepare;
use crate::foundation::{ConfigError, ConstraintError, Configure, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SizeOptions {
    min: FormValue,
    max: FormValue,
    min_message: Option<String>,
    max_message: Option<String>,
    exact_message: Option<String>,
}

struct Defaults {
    min: &'static str,
    max: &'static str,
    exact: &'static str,
}

/// Parsed limits with their prepared messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLimits {
    /// Lower bound, inclusive.
    pub min: Option<i64>,
    /// Upper bound, inclusive.
    pub max: Option<i64>,
    min_message: String,
    max_message: String,
    exact_message: String,
}

impl SizeLimits {
    fn from_options(kind: &str, options: &Options, defaults: &Defaults) -> Result<Self, ConfigError> {
        let raw: SizeOptions = decode(kind, options)?;
        let (min, max) = (raw.min.parse_int(), raw.max.parse_int());
        let template = |custom: Option<String>, fallback: &str| custom.unwrap_or_else(|| fallback.to_owned());
        Ok(Self {
            min,
            max,
            min_message: prepare(&template(raw.min_message, defaults.min), min),
            max_message: prepare(&template(raw.max_message, defaults.max), max),
            exact_message: prepare(&template(raw.exact_message, defaults.exact), min),
        })
    }

    /// Messages for a measured `size`.
    ///
    /// With `min == max` only the exact message can fire. Otherwise the
    /// upper and lower bounds are checked independently.
    pub fn check(&self, size: usize) -> Vec<String> {
        let size = size as i64;
        if self.min.is_some() && self.min == self.max {
            return if Some(size) == self.min {
                Vec::new()
            } else {
                vec![self.exact_message.clone()]
            };
        }

        let mut errors = Vec::new();
        if self.max.is_some_and(|max| size > max) {
            errors.push(self.max_message.clone());
        }
        if self.min.is_some_and(|min| size < min) {
            errors.push(self.min_message.clone());
        }
        errors
    }
}

/// String length in characters, or entry count of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Length {
    /// Limits and messages.
    pub limits: SizeLimits,
}

impl Configure for Length {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let defaults = Defaults {
            min: "This value is too short. It should have {{ limit }} character or more.|This value is too short. It should have {{ limit }} characters or more.",
            max: "This value is too long. It should have {{ limit }} character or less.|This value is too long. It should have {{ limit }} characters or less.",
            exact: "This value should have exactly {{ limit }} character.|This value should have exactly {{ limit }} characters.",
        };
        SizeLimits::from_options("Length", options, &defaults).map(|limits| Self { limits })
    }
}

impl Validate for Length {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() {
            return Ok(Vec::new());
        }
        Ok(value
            .length()
            .map(|size| self.limits.check(size))
            .unwrap_or_default())
    }
}

/// Entry count of a list or map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    /// Limits and messages.
    pub limits: SizeLimits,
}

impl Configure for Count {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let defaults = Defaults {
            min: "This collection should contain {{ limit }} element or more.|This collection should contain {{ limit }} elements or more.",
            max: "This collection should contain {{ limit }} element or less.|This collection should contain {{ limit }} elements or less.",
            exact: "This collection should contain exactly {{ limit }} element.|This collection should contain exactly {{ limit }} elements.",
        };
        SizeLimits::from_options("Count", options, &defaults).map(|limits| Self { limits })
    }
}

impl Validate for Count {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if !value.is_collection() {
            return Ok(Vec::new());
        }
        Ok(value
            .length()
            .map(|size| self.limits.check(size))
            .unwrap_or_default())
    }
}
