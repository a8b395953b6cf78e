//! Field bindings
//!
//! A [`FieldBinding`] connects an element to whatever renders it: it reads
//! the widget's current value, may write a corrected value back, and shows
//! the element's errors. The UI integration layer supplies one binding per
//! element id through a [`BindingProvider`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::value::FormValue;

/// The UI side of one form element.
pub trait FieldBinding: Send + Sync {
    /// Current widget value.
    fn read(&self) -> FormValue;

    /// Replaces the widget value. Bindings that cannot be written ignore it.
    fn write(&self, _value: FormValue) {}

    /// Shows the element's full error list, replacing what was shown before.
    fn render_errors(&self, errors: &[String]);
}

/// Supplies the binding for an element id.
pub trait BindingProvider {
    /// Binding for `element_id`.
    fn bind(&self, element_id: &str) -> Arc<dyn FieldBinding>;
}

impl<F> BindingProvider for F
where
    F: Fn(&str) -> Arc<dyn FieldBinding>,
{
    fn bind(&self, element_id: &str) -> Arc<dyn FieldBinding> {
        self(element_id)
    }
}

/// In-memory binding: holds a value and records what was rendered.
#[derive(Debug, Default)]
pub struct MemoryBinding {
    value: Mutex<FormValue>,
    rendered: Mutex<Vec<String>>,
    renders: Mutex<usize>,
}

impl MemoryBinding {
    /// Creates a binding holding `value`.
    pub fn new(value: impl Into<FormValue>) -> Self {
        Self {
            value: Mutex::new(value.into()),
            ..Self::default()
        }
    }

    /// Replaces the held value, as a user edit would.
    pub fn set(&self, value: impl Into<FormValue>) {
        *self.value.lock() = value.into();
    }

    /// Errors most recently rendered.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().clone()
    }

    /// Number of render calls so far.
    pub fn render_count(&self) -> usize {
        *self.renders.lock()
    }
}

impl FieldBinding for MemoryBinding {
    fn read(&self) -> FormValue {
        self.value.lock().clone()
    }

    fn write(&self, value: FormValue) {
        *self.value.lock() = value;
    }

    fn render_errors(&self, errors: &[String]) {
        *self.rendered.lock() = errors.to_vec();
        *self.renders.lock() += 1;
    }
}

/// A set of [`MemoryBinding`]s keyed by element id.
///
/// Binding an id that was never set yields an empty (`undefined`) field.
#[derive(Debug, Default)]
pub struct MemoryForm {
    fields: Mutex<HashMap<String, Arc<MemoryBinding>>>,
}

impl MemoryForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, builder style.
    #[must_use]
    pub fn with_value(self, element_id: &str, value: impl Into<FormValue>) -> Self {
        self.set(element_id, value);
        self
    }

    /// Sets a field value.
    pub fn set(&self, element_id: &str, value: impl Into<FormValue>) {
        self.field(element_id).set(value);
    }

    /// The binding for `element_id`, created on first use.
    pub fn field(&self, element_id: &str) -> Arc<MemoryBinding> {
        Arc::clone(
            self.fields
                .lock()
                .entry(element_id.to_owned())
                .or_default(),
        )
    }
}

impl BindingProvider for MemoryForm {
    fn bind(&self, element_id: &str) -> Arc<dyn FieldBinding> {
        self.field(element_id)
    }
}
