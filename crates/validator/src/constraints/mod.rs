//! Constraint catalogue
//!
//! One type per rule kind, unified by the closed [`Constraint`] enum.
//! Constraints are built from [`ConstraintConfig`] entries at element
//! construction time; anything they cannot interpret fails there.

mod blank;
mod callback;
mod choice;
mod comparison;
mod format;
mod range;
mod remote;
mod size;
mod type_check;

use std::sync::LazyLock;

pub use blank::{Blank, IsFalse, IsNull, IsTrue, NotBlank, NotNull};
pub use callback::Callback;
pub use choice::Choice;
pub use comparison::{Compare, Comparison};
pub use format::{Date, DateTime, Email, Ip, Pattern, Time, Url, compile_delimited};
pub use range::Range;
pub use remote::{UniqueEntity, UserPassword};
pub use size::{Count, Length, SizeLimits};
pub use type_check::{Type, TypeName};

use crate::callback::NoCallbacks;
use crate::config::{ConstraintConfig, FormConfig};
use crate::element::FormElement;
use crate::foundation::{ConfigError, ConstraintError, Configure, Scope, Site, Validate};
use crate::macros::constraint_set;
use crate::value::FormValue;

constraint_set! {
    Blank(Blank) = ["Blank"] => Blank::from_options,
    NotBlank(NotBlank) = ["NotBlank"] => NotBlank::from_options,
    NotNull(NotNull) = ["NotNull"] => NotNull::from_options,
    IsNull(IsNull) = ["IsNull", "Null"] => IsNull::from_options,
    IsTrue(IsTrue) = ["IsTrue", "True"] => IsTrue::from_options,
    IsFalse(IsFalse) = ["IsFalse", "False"] => IsFalse::from_options,
    EqualTo(Compare) = ["EqualTo"] => |o, s| Compare::configure(Comparison::EqualTo, o, s),
    NotEqualTo(Compare) = ["NotEqualTo"] => |o, s| Compare::configure(Comparison::NotEqualTo, o, s),
    IdenticalTo(Compare) = ["IdenticalTo"] => |o, s| Compare::configure(Comparison::IdenticalTo, o, s),
    NotIdenticalTo(Compare) = ["NotIdenticalTo"] => |o, s| Compare::configure(Comparison::NotIdenticalTo, o, s),
    GreaterThan(Compare) = ["GreaterThan"] => |o, s| Compare::configure(Comparison::GreaterThan, o, s),
    GreaterThanOrEqual(Compare) = ["GreaterThanOrEqual"] => |o, s| Compare::configure(Comparison::GreaterThanOrEqual, o, s),
    LessThan(Compare) = ["LessThan"] => |o, s| Compare::configure(Comparison::LessThan, o, s),
    LessThanOrEqual(Compare) = ["LessThanOrEqual"] => |o, s| Compare::configure(Comparison::LessThanOrEqual, o, s),
    Length(Length) = ["Length"] => Length::from_options,
    Count(Count) = ["Count"] => Count::from_options,
    Choice(Choice) = ["Choice"] => Choice::from_options,
    Range(Range) = ["Range"] => Range::from_options,
    Regex(Pattern) = ["Regex"] => Pattern::from_options,
    Email(Email) = ["Email"] => Email::from_options,
    Url(Url) = ["Url"] => Url::from_options,
    Ip(Ip) = ["Ip"] => Ip::from_options,
    Date(Date) = ["Date"] => Date::from_options,
    DateTime(DateTime) = ["DateTime"] => DateTime::from_options,
    Time(Time) = ["Time"] => Time::from_options,
    Type(Type) = ["Type"] => Type::from_options,
    Callback(Callback) = ["Callback"] => Callback::from_options,
    UniqueEntity(UniqueEntity) = ["UniqueEntity"] => UniqueEntity::from_options,
    UserPassword(UserPassword) = ["UserPassword"] => UserPassword::from_options,
}

static DETACHED_CONFIG: LazyLock<FormConfig> = LazyLock::new(FormConfig::default);

impl Constraint {
    /// Builds a constraint from its configuration entry.
    pub fn from_config(config: &ConstraintConfig, site: &Site<'_>) -> Result<Self, ConfigError> {
        Self::construct(
            config.short_kind("SymfonyComponentValidatorConstraints", ""),
            &config.options(),
            site,
        )
    }

    /// Builds a constraint from a kind name and an options object.
    pub fn from_kind(kind: &str, options: serde_json::Value) -> Result<Self, ConfigError> {
        let mut config = ConstraintConfig::new(kind);
        if let serde_json::Value::Object(options) = options {
            for (key, value) in options {
                config = config.option(key, value);
            }
        }
        Self::from_config(&config, &Site::new("", 0))
    }

    /// Returns true for kinds that consult the server.
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::UniqueEntity(_) | Self::UserPassword(_))
    }

    /// Validates a bare value outside of any form.
    ///
    /// There is no configuration, no callback and no remote channel: remote
    /// kinds pass, and a Callback constraint with names faults.
    pub fn check(&self, value: &FormValue) -> Result<Vec<String>, ConstraintError> {
        let element = FormElement::detached("", value.clone());
        let mut scope = Scope::new(&element, &DETACHED_CONFIG, &NoCallbacks, None);
        self.validate(value, &mut scope)
    }
}
