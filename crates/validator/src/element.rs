//! Form element tree
//!
//! Elements are built once from the configuration: each gets its binding,
//! its constraints (built and checked up front), its transformer chain and
//! its children. An element with children reads its value as the map of its
//! children's values; a leaf reads its binding.
//!
//! A constraint or transformer that cannot be built stays with its element
//! as a configuration fault. The rest of the tree builds normally.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::binding::{BindingProvider, FieldBinding, MemoryBinding};
use crate::config::{ElementConfig, FormConfig};
use crate::constraints::Constraint;
use crate::display::{ErrorBoard, ErrorUpdate};
use crate::foundation::{ConfigError, Site, TransformError};
use crate::transformers::{ReverseTransform, TransformScope, TransformerChain};
use crate::value::FormValue;

/// A node of the form tree.
pub struct FormElement {
    id: String,
    name: String,
    binding: Arc<dyn FieldBinding>,
    constraints: Vec<Constraint>,
    transformers: Option<TransformerChain>,
    config_faults: Vec<Arc<ConfigError>>,
    children: IndexMap<String, FormElement>,
    invalid_message: Option<String>,
    board: ErrorBoard,
}

impl FormElement {
    /// Builds the tree rooted at `id`.
    ///
    /// Elements without a configuration entry get an empty one. Fails only on
    /// cycles; constraints and transformers that cannot be built are kept as
    /// [`config_faults`](Self::config_faults) of their element.
    pub fn build(
        id: &str,
        config: &FormConfig,
        bindings: &dyn BindingProvider,
    ) -> Result<Self, ConfigError> {
        let root = Self::assemble(id, id, config, bindings, &mut Vec::new())?;
        debug!(root = id, elements = root.iter().count(), "form tree built");
        Ok(root)
    }

    /// A standalone element holding `value`, with no constraints.
    pub fn detached(id: &str, value: FormValue) -> Self {
        Self {
            id: id.to_owned(),
            name: id.to_owned(),
            binding: Arc::new(MemoryBinding::new(value)),
            constraints: Vec::new(),
            transformers: Some(TransformerChain::default()),
            config_faults: Vec::new(),
            children: IndexMap::new(),
            invalid_message: None,
            board: ErrorBoard::default(),
        }
    }

    fn assemble(
        id: &str,
        name: &str,
        config: &FormConfig,
        bindings: &dyn BindingProvider,
        ancestors: &mut Vec<String>,
    ) -> Result<Self, ConfigError> {
        if ancestors.iter().any(|ancestor| ancestor == id) {
            return Err(ConfigError::CyclicTree(id.to_owned()));
        }
        let fallback = ElementConfig::default();
        let entry = config.element(id).unwrap_or(&fallback);

        let mut config_faults = Vec::new();
        let mut constraints = Vec::with_capacity(entry.constraints.len());
        for (position, constraint) in entry.constraints.iter().enumerate() {
            match Constraint::from_config(constraint, &Site::new(id, position)) {
                Ok(built) => constraints.push(built),
                Err(error) => config_faults.push(broken(id, error)),
            }
        }
        let transformers = match TransformerChain::from_configs(&entry.transformers) {
            Ok(chain) => Some(chain),
            Err(error) => {
                config_faults.push(broken(id, error));
                None
            }
        };

        ancestors.push(id.to_owned());
        let mut children = IndexMap::with_capacity(entry.children.len());
        for (field, child_id) in &entry.children {
            let child = Self::assemble(child_id, field, config, bindings, ancestors)?;
            children.insert(field.clone(), child);
        }
        ancestors.pop();

        Ok(Self {
            id: id.to_owned(),
            name: name.to_owned(),
            binding: bindings.bind(id),
            constraints,
            transformers,
            config_faults,
            children,
            invalid_message: entry.invalid_message.clone(),
            board: ErrorBoard::default(),
        })
    }

    /// Element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Field name under the parent (the id for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The UI binding.
    pub fn binding(&self) -> &Arc<dyn FieldBinding> {
        &self.binding
    }

    /// Constraints, in evaluation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Transformer chain, unless one of its transformers could not be built.
    pub fn transformers(&self) -> Option<&TransformerChain> {
        self.transformers.as_ref()
    }

    /// Constraints and transformers that could not be built.
    pub fn config_faults(&self) -> &[Arc<ConfigError>] {
        &self.config_faults
    }

    /// Children by field name.
    pub fn children(&self) -> &IndexMap<String, FormElement> {
        &self.children
    }

    /// Child by field name.
    pub fn child(&self, field: &str) -> Option<&FormElement> {
        self.children.get(field)
    }

    /// Message shown when the value cannot be transformed.
    pub fn invalid_message(&self) -> Option<&str> {
        self.invalid_message.as_deref()
    }

    /// The element's error board.
    pub fn board(&self) -> &ErrorBoard {
        &self.board
    }

    /// Errors currently shown on the element.
    pub fn errors(&self) -> Vec<String> {
        self.board.merged()
    }

    /// Finds an element in this sub-tree by id.
    pub fn find(&self, id: &str) -> Option<&FormElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.values().find_map(|child| child.find(id))
    }

    /// Finds an element in this sub-tree by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut FormElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.values_mut().find_map(|child| child.find_mut(id))
    }

    /// Pre-order iterator over this sub-tree.
    pub fn iter(&self) -> impl Iterator<Item = &FormElement> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.values().rev());
            Some(next)
        })
    }

    /// Reads and reverse transforms the element value.
    ///
    /// Transformers may publish display updates (duplicate mismatch) into
    /// `updates`. A child whose value cannot be transformed contributes
    /// `undefined` to its parent's map.
    pub fn value(&self, updates: &mut Vec<ErrorUpdate>) -> Result<FormValue, TransformError> {
        let Some(transformers) = &self.transformers else {
            return Err(TransformError::Unconfigured);
        };
        let raw = if self.children.is_empty() {
            self.binding.read()
        } else {
            FormValue::Map(
                self.children
                    .iter()
                    .map(|(field, child)| (field.clone(), child.value(updates).unwrap_or_default()))
                    .collect(),
            )
        };
        transformers.reverse_transform(raw, &mut TransformScope::new(self, updates))
    }

    /// Applies a display update to this element's board and, if it changed
    /// and `render` is set, re-renders the merged errors.
    pub fn publish(&mut self, update: &ErrorUpdate, render: bool) {
        let changed = self.board.publish(&update.source_id, update.errors.clone());
        if changed && render {
            self.binding.render_errors(&self.board.merged());
        }
    }
}

fn broken(id: &str, error: ConfigError) -> Arc<ConfigError> {
    let error = error.in_element(id);
    warn!(element_id = id, %error, "element configuration is broken");
    Arc::new(error)
}

impl fmt::Debug for FormElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormElement")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("constraints", &self.constraints)
            .field("transformers", &self.transformers)
            .field("config_faults", &self.config_faults)
            .field("children", &self.children)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}
