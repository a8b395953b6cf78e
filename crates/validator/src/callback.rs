//! Named callbacks
//!
//! Choice and Callback constraints refer to functions by name. Resolving a
//! name is delegated to a [`CallbackResolver`] supplied by the integration
//! layer, so constraint logic never reaches into UI state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::element::FormElement;
use crate::value::FormValue;

/// A resolved callback. It receives the element under validation.
pub type Callback = Arc<dyn Fn(&FormElement) -> FormValue + Send + Sync>;

/// Resolves callback names for an element.
pub trait CallbackResolver: Send + Sync {
    /// The callback `name` refers to on `element`, if any.
    fn resolve(&self, element: &FormElement, name: &str) -> Option<Callback>;
}

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallbacks;

impl CallbackResolver for NoCallbacks {
    fn resolve(&self, _element: &FormElement, _name: &str) -> Option<Callback> {
        None
    }
}

/// Name-keyed callbacks, optionally scoped to one element.
///
/// Element-scoped entries shadow global entries of the same name.
#[derive(Default, Clone)]
pub struct CallbackRegistry {
    global: HashMap<String, Callback>,
    scoped: HashMap<(String, String), Callback>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback available to every element.
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&FormElement) -> FormValue + Send + Sync + 'static,
    {
        self.global.insert(name.into(), Arc::new(callback));
        self
    }

    /// Registers a callback visible to one element only.
    pub fn register_for<F>(
        &mut self,
        element_id: impl Into<String>,
        name: impl Into<String>,
        callback: F,
    ) -> &mut Self
    where
        F: Fn(&FormElement) -> FormValue + Send + Sync + 'static,
    {
        self.scoped
            .insert((element_id.into(), name.into()), Arc::new(callback));
        self
    }
}

impl CallbackResolver for CallbackRegistry {
    fn resolve(&self, element: &FormElement, name: &str) -> Option<Callback> {
        self.scoped
            .get(&(element.id().to_owned(), name.to_owned()))
            .or_else(|| self.global.get(name))
            .cloned()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("global", &self.global.keys().collect::<Vec<_>>())
            .field("scoped", &self.scoped.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_callbacks_shadow_global_ones() {
        let mut registry = CallbackRegistry::new();
        registry
            .register("choices", |_| FormValue::from("global"))
            .register_for("special", "choices", |_| FormValue::from("scoped"));

        let plain = FormElement::detached("plain", FormValue::Null);
        let special = FormElement::detached("special", FormValue::Null);
        let call = |element: &FormElement| registry.resolve(element, "choices").map(|f| f(element));

        assert_eq!(call(&plain), Some(FormValue::from("global")));
        assert_eq!(call(&special), Some(FormValue::from("scoped")));
        assert!(registry.resolve(&plain, "other").is_none());
    }
}
