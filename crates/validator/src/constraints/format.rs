//! Pattern-based constraints: Regex, Email, Url, Ip, Date, DateTime, Time.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::foundation::message::VALUE;
use crate::foundation::{ConfigError, ConstraintError, Configure, Message, Options, Scope, Site, Validate, decode};
use crate::macros::message_constraint;
use crate::value::FormValue;

// ============================================================================
// FIXED PATTERNS
// ============================================================================

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date regex")
});

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2}) (0[0-9]|1[0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])$",
    )
    .expect("valid datetime regex")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[0-9]|1[0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])$").expect("valid time regex")
});

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("valid ip regex")
});

static EMAIL_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[-a-z0-9\~!$%^\&*_=+\}\{'?]+(\.[-a-z0-9\~!$%^\&*_=+\}\{'?]+)*@([a-z0-9_][-a-z0-9_]*(\.[-a-z0-9_]+)*\.(aero|arpa|biz|com|coop|edu|gov|info|int|mil|museum|name|net|org|pro|travel|mobi|email|[a-z][a-z])|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))(:[0-9]{1,5})?$",
    )
    .expect("valid strict email regex")
});

static EMAIL_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+@.+\..+").expect("valid loose email regex"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(ftp|https?)://(www\.)?[A-Za-z0-9_\-.@:%+~#=]+\.[A-Za-z0-9_]{2,3}(/[A-Za-z0-9_]+)*(\?.*)?")
        .expect("valid url regex")
});

static DELIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^[/#](.*)[/#]([A-Za-z0-9_]*)$").expect("valid delimiter regex")
});

fn fails(pattern: &Regex, value: &FormValue) -> bool {
    !value.is_blank() && !pattern.is_match(&value.to_string())
}

message_constraint! {
    /// `YYYY-MM-DD`.
    pub Date = "This value is not a valid date.";
    violated(value) { fails(&DATE, value) }
}

message_constraint! {
    /// `YYYY-MM-DD HH:MM:SS`.
    pub DateTime = "This value is not a valid datetime.";
    violated(value) { fails(&DATE_TIME, value) }
}

message_constraint! {
    /// `HH:MM:SS`.
    pub Time = "This value is not a valid time.";
    violated(value) { fails(&TIME, value) }
}

message_constraint! {
    /// Dotted IPv4 address.
    pub Ip = "This is not a valid IP address.";
    violated(value) { fails(&IPV4, value) }
}

// ============================================================================
// EMAIL
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EmailOptions {
    message: String,
    strict: Option<bool>,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            message: "This value is not a valid email address.".to_owned(),
            strict: None,
        }
    }
}

/// Email address. The loose `x@y.z` shape applies only when `strict` is
/// explicitly `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Violation message.
    pub message: String,
    /// Whether the full address grammar applies.
    pub strict: bool,
}

impl Configure for Email {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: EmailOptions = decode("Email", options)?;
        Ok(Self {
            message: raw.message,
            strict: raw.strict != Some(false),
        })
    }
}

impl Validate for Email {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        let pattern = if self.strict { &EMAIL_STRICT } else { &EMAIL_LOOSE };
        if fails(pattern, value) {
            return Ok(vec![Message::new(&self.message).with(VALUE, value).finish()]);
        }
        Ok(Vec::new())
    }
}

// ============================================================================
// URL
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
struct UrlOptions {
    message: String,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            message: "This value is not a valid URL.".to_owned(),
        }
    }
}

/// Absolute `http`, `https` or `ftp` URL.
///
/// On mismatch the bound field is rewritten to `http://` + value, which is
/// also what the message reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Violation message.
    pub message: String,
}

impl Configure for Url {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let UrlOptions { message } = decode("Url", options)?;
        Ok(Self { message })
    }
}

impl Validate for Url {
    fn validate(
        &self,
        value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if !fails(&URL, value) {
            return Ok(Vec::new());
        }
        let rewritten = format!("http://{value}");
        scope
            .element()
            .binding()
            .write(FormValue::String(rewritten.clone()));
        Ok(vec![Message::new(&self.message).with(VALUE, rewritten).finish()])
    }
}

// ============================================================================
// REGEX
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RegexOptions {
    pattern: String,
    #[serde(rename = "match")]
    matches: bool,
    message: String,
}

impl Default for RegexOptions {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            matches: true,
            message: "This value is not valid.".to_owned(),
        }
    }
}

/// User-supplied pattern, written with delimiters and trailing flags
/// (`/^[a-z]+$/i`).
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Compiled pattern.
    pub pattern: Regex,
    /// `true` when the value must match, `false` when it must not.
    pub matches: bool,
    /// Violation message.
    pub message: String,
}

impl Configure for Pattern {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: RegexOptions = decode("Regex", options)?;
        Ok(Self {
            pattern: compile_delimited(&raw.pattern)?,
            matches: raw.matches,
            message: raw.message,
        })
    }
}

impl Validate for Pattern {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() || self.pattern.is_match(&value.to_string()) == self.matches {
            return Ok(Vec::new());
        }
        Ok(vec![Message::new(&self.message).with(VALUE, value).finish()])
    }
}

/// Compiles `/body/flags` or `#body#flags`.
///
/// `i`, `m`, `s` and `x` map to the same inline flags and `U` to
/// swap-greed; other flags have no equivalent and are ignored.
pub fn compile_delimited(raw: &str) -> Result<Regex, ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedPattern {
        pattern: raw.to_owned(),
        reason,
    };
    let captures = DELIMITED
        .captures(raw.trim())
        .ok_or_else(|| malformed("expected a pattern wrapped in `/` or `#` delimiters".to_owned()))?;
    let body = captures.get(1).map_or("", |m| m.as_str());
    let flags = captures.get(2).map_or("", |m| m.as_str());

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            _ => continue,
        };
    }
    builder.build().map_err(|error| malformed(error.to_string()))
}
