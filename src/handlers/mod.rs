//! Task handler registry and builtin handlers.
//!
//! A route name picks the handler; workers resolve routes here before
//! executing. Unknown routes fail the task (task-local, the daemon keeps
//! running).

pub mod shell;

pub use shell::ShellHandler;

use crate::domain::errors::HandlerError;
use crate::domain::models::TaskParams;
use crate::domain::ports::TaskHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// Route name → handler mapping.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with the builtin handlers registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("shell", Arc::new(ShellHandler));
        registry
    }

    /// Register a handler under a route name. Replaces any previous
    /// handler for that route.
    pub fn register(&mut self, route: impl Into<String>, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(route.into(), handler);
    }

    /// Look up the handler for a route.
    pub fn resolve(&self, route: &str) -> Result<Arc<dyn TaskHandler>, HandlerError> {
        self.handlers
            .get(route)
            .cloned()
            .ok_or_else(|| HandlerError::UnknownRoute(route.to_string()))
    }

    /// Resolve and execute in one step.
    pub async fn execute(&self, route: &str, params: &TaskParams) -> Result<(), HandlerError> {
        let handler = self.resolve(route)?;
        handler.execute(route, params).await
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
