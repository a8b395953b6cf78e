//! Message templating
//!
//! Violation messages arrive from the server as templates with
//! `{{ placeholder }}` tokens and, for count-dependent messages, several
//! `|`-separated plural forms. Each placeholder is substituted once, at its
//! first occurrence.

use std::borrow::Cow;
use std::fmt::Display;
use std::ops::{Bound, RangeBounds};

/// The offending (or configured) value.
pub const VALUE: &str = "{{ value }}";
/// A numeric limit (length, count, range bound).
pub const LIMIT: &str = "{{ limit }}";
/// The value a comparison constraint compares against.
pub const COMPARED_VALUE: &str = "{{ compared_value }}";
/// The type of the compared value.
pub const COMPARED_VALUE_TYPE: &str = "{{ compared_value_type }}";
/// The expected type name.
pub const TYPE: &str = "{{ type }}";

/// A message under construction.
#[derive(Debug, Clone)]
pub struct Message<'a>(Cow<'a, str>);

impl<'a> Message<'a> {
    /// Starts from a template.
    pub fn new(template: &'a str) -> Self {
        Self(Cow::Borrowed(template))
    }

    /// Replaces the first occurrence of `placeholder` with `value`.
    #[must_use]
    pub fn with(self, placeholder: &str, value: impl Display) -> Self {
        if self.0.contains(placeholder) {
            Self(Cow::Owned(self.0.replacen(placeholder, &value.to_string(), 1)))
        } else {
            self
        }
    }

    /// Returns the finished text.
    pub fn finish(self) -> String {
        self.0.into_owned()
    }
}

/// Resolves a count-dependent template for `limit` and substitutes
/// `{{ limit }}`.
///
/// Without a limit the placeholder reads `NaN`, matching what the server
/// renders for an unset bound.
pub fn prepare(template: &str, limit: Option<i64>) -> String {
    let form = choose_plural(template, limit);
    match limit {
        Some(limit) => Message::new(form).with(LIMIT, limit).finish(),
        None => Message::new(form).with(LIMIT, "NaN").finish(),
    }
}

/// Picks the plural form of `template` for `count`.
///
/// Forms prefixed by an explicit interval (`{0}`, `{1,2}`, `[2,Inf[`,
/// `]1,5]`) win when they contain `count`. Otherwise the unprefixed forms
/// are read as singular then plural.
pub fn choose_plural(template: &str, count: Option<i64>) -> &str {
    if !template.contains('|') {
        return template;
    }

    let mut standard = Vec::new();
    for form in template.split('|') {
        match split_interval(form) {
            Some((interval, text)) => {
                if count.is_some_and(|c| interval.contains(c)) {
                    return text;
                }
            }
            None => standard.push(form.trim()),
        }
    }

    let index = usize::from(count != Some(1));
    standard
        .get(index)
        .or_else(|| standard.last())
        .copied()
        .unwrap_or(template)
}

#[derive(Debug)]
enum Interval {
    Set(Vec<i64>),
    Range(Bound<i64>, Bound<i64>),
}

impl Interval {
    fn contains(&self, n: i64) -> bool {
        match self {
            Self::Set(members) => members.contains(&n),
            Self::Range(low, high) => (*low, *high).contains(&n),
        }
    }
}

fn split_interval(form: &str) -> Option<(Interval, &str)> {
    let form = form.trim_start();

    if let Some(rest) = form.strip_prefix('{') {
        let (inner, text) = rest.split_once('}')?;
        let members = inner
            .split(',')
            .map(|n| n.trim().parse().ok())
            .collect::<Option<Vec<i64>>>()?;
        return Some((Interval::Set(members), text.trim_start()));
    }

    let open = form.chars().next().filter(|c| matches!(c, '[' | ']'))?;
    let rest = &form[1..];
    let end = rest.find(['[', ']'])?;
    let close = rest[end..].chars().next()?;
    let (low, high) = rest[..end].split_once(',')?;
    let low = bound(low, open == '[')?;
    let high = bound(high, close == ']')?;
    Some((Interval::Range(low, high), rest[end + 1..].trim_start()))
}

fn bound(raw: &str, inclusive: bool) -> Option<Bound<i64>> {
    match raw.trim() {
        "-Inf" | "Inf" | "+Inf" => Some(Bound::Unbounded),
        n => {
            let n = n.parse().ok()?;
            Some(if inclusive {
                Bound::Included(n)
            } else {
                Bound::Excluded(n)
            })
        }
    }
}
