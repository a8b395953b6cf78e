//! Runtime filter changes

use std::sync::Arc;

use parking_lot::RwLock;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

use super::{FilterLayer, parse_filter};
use crate::error::LogResult;

/// Handle for changing the log filter at runtime.
#[derive(Clone)]
pub struct ReloadHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    current: Arc<RwLock<Arc<String>>>,
}

impl ReloadHandle {
    /// Replaces the filter directive.
    ///
    /// # Errors
    /// Returns error if the directive does not parse or the subscriber is gone.
    pub fn reload(&self, level: &str) -> LogResult<()> {
        let filter = parse_filter(level)?;
        self.filter.reload(filter)?;
        *self.current.write() = Arc::new(level.to_owned());
        tracing::info!(filter = level, "log filter reloaded");
        Ok(())
    }

    /// The directive currently in effect.
    pub fn current_filter(&self) -> Arc<String> {
        Arc::clone(&*self.current.read())
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("current", &self.current_filter())
            .finish_non_exhaustive()
    }
}

/// Wraps `filter` in a reload layer when `reloadable` is set.
pub(super) fn create_filter_layer(
    filter: EnvFilter,
    level: &str,
    reloadable: bool,
) -> (FilterLayer, Option<ReloadHandle>) {
    if reloadable {
        let (layer, handle) = reload::Layer::new(filter);
        let handle = ReloadHandle {
            filter: handle,
            current: Arc::new(RwLock::new(Arc::new(level.to_owned()))),
        };
        (layer.boxed(), Some(handle))
    } else {
        (filter.boxed(), None)
    }
}
