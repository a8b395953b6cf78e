use crate::callback::{Callback, CallbackResolver};
use crate::config::FormConfig;
use crate::element::FormElement;
use crate::remote::RemoteChannel;

/// Everything a constraint may consult while validating one element.
///
/// The remote channel is absent on silent passes; remote constraints then
/// do nothing.
pub struct Scope<'a> {
    element: &'a FormElement,
    config: &'a FormConfig,
    resolver: &'a dyn CallbackResolver,
    remote: Option<&'a mut RemoteChannel>,
}

impl<'a> Scope<'a> {
    /// Creates a scope for `element`.
    pub fn new(
        element: &'a FormElement,
        config: &'a FormConfig,
        resolver: &'a dyn CallbackResolver,
        remote: Option<&'a mut RemoteChannel>,
    ) -> Self {
        Self {
            element,
            config,
            resolver,
            remote,
        }
    }

    /// The element under validation.
    pub fn element(&self) -> &'a FormElement {
        self.element
    }

    /// The page configuration.
    pub fn config(&self) -> &'a FormConfig {
        self.config
    }

    /// Resolves a named callback for the element under validation.
    pub fn callback(&self, name: &str) -> Option<Callback> {
        self.resolver.resolve(self.element, name)
    }

    /// The channel remote checks are queued on, if this pass dispatches.
    pub fn remote(&mut self) -> Option<&mut RemoteChannel> {
        self.remote.as_deref_mut()
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("element", &self.element.id())
            .field("dispatches", &self.remote.is_some())
            .finish()
    }
}
