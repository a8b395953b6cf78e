//! Macros for declaring constraints with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`message_constraint!`]: a single-message constraint: struct, option
//!   defaults, [`Configure`](crate::foundation::Configure) and
//!   [`Validate`](crate::foundation::Validate) impls
//! - [`constraint_set!`]: the closed [`Constraint`](crate::constraints::Constraint)
//!   enum, its kind-name table and dispatch
//!
//! # Examples
//!
//! ```rust,ignore
//! message_constraint! {
//!     /// Fires when the value is empty.
//!     pub NotBlank = "This value should not be blank.";
//!     violated(value) { value.is_blank() }
//! }
//! ```

// ============================================================================
// MESSAGE CONSTRAINT MACRO
// ============================================================================

/// Declares a constraint whose only option is its `message`.
///
/// The message gets `{{ value }}` substituted with the validated value.
///
/// # Variants
///
/// **Skips empty values** (the common case):
/// ```rust,ignore
/// message_constraint! {
///     pub IsTrue = "This value should be true.";
///     skip_blank;
///     violated(value) { !matches!(value, FormValue::Bool(true)) }
/// }
/// ```
///
/// **Sees every value** (presence constraints):
/// ```rust,ignore
/// message_constraint! {
///     pub NotNull = "This value should not be null.";
///     violated(value) { matches!(value, FormValue::Null) }
/// }
/// ```
macro_rules! message_constraint {
    // ── Variant 1: short-circuits on the emptiness policy ───────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident = $default:literal;
        skip_blank;
        violated($value:ident) $rule:block
    ) => {
        $crate::macros::message_constraint! {
            $(#[$meta])*
            $vis $name = $default;
            violated($value) { !$value.is_blank() && $rule }
        }
    };

    // ── Variant 2: sees every value ─────────────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident = $default:literal;
        violated($value:ident) $rule:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            /// Violation message; `{{ value }}` is substituted.
            pub message: String,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    message: $default.to_owned(),
                }
            }
        }

        impl $crate::foundation::Configure for $name {
            fn from_options(
                options: &$crate::foundation::Options,
                _site: &$crate::foundation::Site<'_>,
            ) -> Result<Self, $crate::foundation::ConfigError> {
                $crate::foundation::decode(stringify!($name), options)
            }
        }

        impl $crate::foundation::Validate for $name {
            fn validate(
                &self,
                $value: &$crate::value::FormValue,
                _scope: &mut $crate::foundation::Scope<'_>,
            ) -> Result<Vec<String>, $crate::foundation::ConstraintError> {
                let violated: bool = $rule;
                if violated {
                    Ok(vec![
                        $crate::foundation::Message::new(&self.message)
                            .with($crate::foundation::message::VALUE, $value)
                            .finish(),
                    ])
                } else {
                    Ok(Vec::new())
                }
            }
        }
    };
}

pub(crate) use message_constraint;

// ============================================================================
// CONSTRAINT SET MACRO
// ============================================================================

/// Declares the closed constraint enum.
///
/// Each arm names the variant, its payload type, the kind names it answers
/// to, and the constructor building it from options and a site:
///
/// ```rust,ignore
/// constraint_set! {
///     NotBlank(NotBlank) = ["NotBlank"] => NotBlank::from_options,
///     EqualTo(Compare) = ["EqualTo"] => |o, s| Compare::configure(Comparison::EqualTo, o, s),
/// }
/// ```
macro_rules! constraint_set {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident($ty:ty) = [$($kind:literal),+] => $ctor:expr
        ),+ $(,)?
    ) => {
        /// A configured constraint, one variant per rule kind.
        #[derive(Debug)]
        pub enum Constraint {
            $(
                $(#[$meta])*
                $variant($ty),
            )+
        }

        impl Constraint {
            /// Canonical kind name.
            pub const fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)+
                }
            }

            /// Every kind name that resolves to a constraint.
            pub const KINDS: &'static [&'static str] = &[$($($kind,)+)+];

            fn construct(
                kind: &str,
                options: &$crate::foundation::Options,
                site: &$crate::foundation::Site<'_>,
            ) -> Result<Self, $crate::foundation::ConfigError> {
                match kind {
                    $(
                        $($kind)|+ => {
                            let ctor: fn(
                                &$crate::foundation::Options,
                                &$crate::foundation::Site<'_>,
                            ) -> Result<$ty, $crate::foundation::ConfigError> = $ctor;
                            ctor(options, site).map(Self::$variant)
                        }
                    )+
                    other => Err($crate::foundation::ConfigError::UnknownConstraint {
                        kind: other.to_owned(),
                    }),
                }
            }
        }

        impl $crate::foundation::Validate for Constraint {
            fn validate(
                &self,
                value: &$crate::value::FormValue,
                scope: &mut $crate::foundation::Scope<'_>,
            ) -> Result<Vec<String>, $crate::foundation::ConstraintError> {
                match self {
                    $(Self::$variant(inner) => inner.validate(value, scope),)+
                }
            }
        }
    };
}

pub(crate) use constraint_set;
