//! Controller registry keyed by the descriptor's controller path.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::controller::Controller;

/// Controllers available to the router, populated once at startup.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller` under `key`, replacing any previous one.
    pub fn register<C>(&mut self, key: impl Into<String>, controller: C) -> &mut Self
    where
        C: Controller + 'static,
    {
        self.controllers.insert(key.into(), Arc::new(controller));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<C>(mut self, key: impl Into<String>, controller: C) -> Self
    where
        C: Controller + 'static,
    {
        self.register(key, controller);
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.controllers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.controllers.keys().collect();
        keys.sort();
        f.debug_struct("ControllerRegistry").field("controllers", &keys).finish()
    }
}
