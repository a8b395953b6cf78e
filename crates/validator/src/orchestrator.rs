//! Validation orchestrator
//!
//! [`FormValidator`] owns the element tree, the shared configuration, the
//! callback resolver and the remote channel. A pass walks a sub-tree in
//! pre-order: each element's value is read and reverse transformed, then its
//! constraints run in declaration order. Synchronous errors are published
//! under [`SYNC_SOURCE`], so a pass never clears what a remote check put on
//! the board. Remote verdicts are applied by [`FormValidator::settle`].

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::binding::BindingProvider;
use crate::callback::{CallbackResolver, NoCallbacks};
use crate::config::FormConfig;
use crate::display::{ErrorUpdate, SYNC_SOURCE};
use crate::element::FormElement;
use crate::foundation::{ConfigError, FaultError, Scope, Validate};
use crate::remote::{RemoteChannel, RemoteCompletion, RemoteTransport};

/// What started a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Page load: compute errors silently, no rendering, no remote checks.
    Load,
    /// Explicit submit: render errors and dispatch remote checks.
    Submit,
}

impl Trigger {
    /// Returns true if this pass updates the UI and talks to the server.
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Submit)
    }
}

/// A constraint or transform failure recorded during a pass.
#[derive(Debug)]
pub struct ValidationFault {
    /// Element the failure belongs to.
    pub element_id: String,
    /// The failure.
    pub error: FaultError,
}

/// Outcome of a synchronous pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Element id → synchronous errors, for elements that have any.
    pub errors: IndexMap<String, Vec<String>>,
    /// Faults, in traversal order.
    pub faults: Vec<ValidationFault>,
    /// Remote checks dispatched by the pass.
    pub dispatched: usize,
}

impl ValidationReport {
    /// Returns true when no element has synchronous errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors for one element.
    pub fn errors_for(&self, element_id: &str) -> &[String] {
        self.errors.get(element_id).map_or(&[][..], Vec::as_slice)
    }
}

/// Outcome of settling the remote channel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SettleSummary {
    /// Verdicts applied to a board.
    pub applied: usize,
    /// Negative verdicts among them.
    pub rejected: usize,
    /// Checks that produced no verdict.
    pub failed: usize,
}

/// Validates a form and keeps its error display current.
pub struct FormValidator {
    root: FormElement,
    config: Arc<FormConfig>,
    resolver: Arc<dyn CallbackResolver>,
    channel: RemoteChannel,
}

impl FormValidator {
    /// Builds the tree rooted at `root_id`.
    ///
    /// Fails on a cyclic tree. A constraint or transformer that cannot be
    /// built is reported as a fault of its element on every pass.
    pub fn new(
        root_id: &str,
        config: Arc<FormConfig>,
        bindings: &dyn BindingProvider,
        transport: Arc<dyn RemoteTransport>,
    ) -> Result<Self, ConfigError> {
        let root = FormElement::build(root_id, &config, bindings)?;
        Ok(Self {
            root,
            config,
            resolver: Arc::new(NoCallbacks),
            channel: RemoteChannel::new(transport),
        })
    }

    /// Replaces the callback resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn CallbackResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The root element.
    pub fn root(&self) -> &FormElement {
        &self.root
    }

    /// An element by id.
    pub fn element(&self, id: &str) -> Option<&FormElement> {
        self.root.find(id)
    }

    /// The page configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Remote checks not yet settled.
    pub fn pending(&self) -> usize {
        self.channel.in_flight()
    }

    /// Validates the whole form.
    pub fn validate(&mut self, trigger: Trigger) -> ValidationReport {
        let root_id = self.root.id().to_owned();
        self.run(&root_id, trigger).unwrap_or_default()
    }

    /// Validates the sub-tree rooted at `id`.
    pub fn validate_element(
        &mut self,
        id: &str,
        trigger: Trigger,
    ) -> Result<ValidationReport, ConfigError> {
        self.run(id, trigger)
            .ok_or_else(|| ConfigError::UnknownElement(id.to_owned()))
    }

    fn run(&mut self, id: &str, trigger: Trigger) -> Option<ValidationReport> {
        let Self {
            root,
            config,
            resolver,
            channel,
        } = self;
        let target = root.find(id)?;
        debug!(element_id = id, ?trigger, "validation pass");

        let before = channel.issued();
        let mut pass = Pass {
            config: &**config,
            resolver: &**resolver,
            remote: trigger.is_interactive().then_some(&mut *channel),
            report: ValidationReport::default(),
            updates: Vec::new(),
        };
        pass.visit(target);
        let Pass {
            mut report,
            updates,
            ..
        } = pass;
        report.dispatched = (channel.issued() - before) as usize;

        if trigger.is_interactive() {
            for update in &updates {
                if let Some(element) = root.find_mut(&update.element_id) {
                    element.publish(update, true);
                }
            }
        }
        Some(report)
    }

    /// Drives every in-flight remote check to completion, publishing each
    /// verdict as it arrives.
    ///
    /// Verdicts for the same source overwrite each other in arrival order;
    /// a stale answer arriving after a newer one wins.
    pub async fn settle(&mut self) -> SettleSummary {
        let mut summary = SettleSummary::default();
        while let Some(completion) = self.channel.next_completion().await {
            self.apply(completion, &mut summary);
        }
        summary
    }

    /// Waits for the next remote check and publishes its verdict. Returns
    /// false when nothing was in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.channel.next_completion().await {
            Some(completion) => {
                self.apply(completion, &mut SettleSummary::default());
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: RemoteCompletion, summary: &mut SettleSummary) {
        let RemoteCompletion { check, outcome } = completion;
        let valid = match outcome {
            Ok(valid) => valid,
            Err(error) => {
                warn!(source_id = %check.source_id, route = %check.route, %error, "remote check failed");
                check.rearm();
                summary.failed += 1;
                return;
            }
        };

        let Some(element) = self.root.find_mut(&check.target) else {
            debug!(target = %check.target, "verdict for an element outside the tree");
            return;
        };
        debug!(source_id = %check.source_id, valid, "remote verdict");
        let update = ErrorUpdate::new(&check.target, &check.source_id, check.errors_for(valid));
        element.publish(&update, true);
        summary.applied += 1;
        if !valid {
            summary.rejected += 1;
        }
    }
}

impl std::fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator")
            .field("root", &self.root.id())
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

struct Pass<'a> {
    config: &'a FormConfig,
    resolver: &'a dyn CallbackResolver,
    remote: Option<&'a mut RemoteChannel>,
    report: ValidationReport,
    updates: Vec<ErrorUpdate>,
}

impl Pass<'_> {
    fn visit(&mut self, element: &FormElement) {
        for broken in element.config_faults() {
            self.fault(element, FaultError::Config(Arc::clone(broken)));
        }

        let mut errors = Vec::new();
        match element.value(&mut self.updates) {
            Ok(value) => {
                for constraint in element.constraints() {
                    let mut scope = Scope::new(
                        element,
                        self.config,
                        self.resolver,
                        self.remote.as_deref_mut(),
                    );
                    match constraint.validate(&value, &mut scope) {
                        Ok(found) => errors.extend(found),
                        Err(error) => {
                            warn!(element_id = element.id(), kind = constraint.kind(), %error, "constraint fault");
                            self.fault(element, error.into());
                        }
                    }
                }
            }
            Err(error) => {
                warn!(element_id = element.id(), %error, "value could not be transformed");
                errors.extend(element.invalid_message().map(str::to_owned));
                self.fault(element, error.into());
            }
        }

        if !errors.is_empty() {
            self.report.errors.insert(element.id().to_owned(), errors.clone());
        }
        self.updates
            .push(ErrorUpdate::new(element.id(), SYNC_SOURCE, errors));

        for child in element.children().values() {
            self.visit(child);
        }
    }

    fn fault(&mut self, element: &FormElement, error: FaultError) {
        self.report.faults.push(ValidationFault {
            element_id: element.id().to_owned(),
            error,
        });
    }
}
