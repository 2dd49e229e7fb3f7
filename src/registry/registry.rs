//! Instance registry
//!
//! Maps instance ids to active instances. Shared by every concurrent call,
//! so the map sits behind a lock; instance construction runs outside it.
//!
//! # Lifecycle
//!
//! - register: create, or reuse when the requested id is already active
//! - resolve: used by every table-scoped call
//! - unregister: remove, then close exactly once

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::error::{DasError, DasResult};
use crate::observability::{Event, Logger};

use super::factory::{InstanceFactory, MockFactory};
use super::instance::{Instance, Options};

/// Result of a successful register call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new instance was built and stored
    Created(String),
    /// The id was already active; nothing was built
    Existing(String),
}

impl Registration {
    pub fn id(&self) -> &str {
        match self {
            Registration::Created(id) | Registration::Existing(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

/// Process-wide map from instance id to instance
pub struct InstanceRegistry {
    instances: RwLock<HashMap<String, Arc<Instance>>>,
    factories: HashMap<String, Arc<dyn InstanceFactory>>,
}

impl InstanceRegistry {
    /// Registry with no known kinds
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            factories: HashMap::new(),
        }
    }

    /// Registry knowing the built-in `mock` kind
    pub fn with_default_kinds(default_batch_size: usize) -> Self {
        Self::new().with_factory(Arc::new(MockFactory::new(default_batch_size)))
    }

    /// Adds a constructor for a type discriminator
    pub fn with_factory(mut self, factory: Arc<dyn InstanceFactory>) -> Self {
        self.factories.insert(factory.kind().to_string(), factory);
        self
    }

    /// Supported type discriminators, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<_> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Registers an instance of `kind`.
    ///
    /// An empty `requested_id` counts as absent. Fails with
    /// `UnsupportedType` for unknown kinds and `Construction` when the
    /// factory fails; the registry is unchanged in both cases.
    pub fn register(
        &self,
        kind: &str,
        options: &Options,
        requested_id: Option<&str>,
    ) -> DasResult<Registration> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| DasError::UnsupportedType(kind.to_string()))?;

        let requested_id = requested_id.filter(|id| !id.is_empty());
        if let Some(id) = requested_id {
            if self.contains(id)? {
                Logger::info(Event::DasReused.as_str(), &[("das_id", id)]);
                return Ok(Registration::Existing(id.to_string()));
            }
        }

        let id = match requested_id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let instance = factory.create(&id, options).map_err(|e| match e {
            DasError::Construction(_) => e,
            other => DasError::Construction(other.to_string()),
        })?;

        let mut instances = self.write()?;
        match instances.entry(id.clone()) {
            Entry::Occupied(_) => {
                // Lost a race with a concurrent register of the same id
                drop(instances);
                instance.close();
                Logger::info(Event::DasReused.as_str(), &[("das_id", id.as_str())]);
                Ok(Registration::Existing(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(instance));
                drop(instances);
                Logger::info(
                    Event::DasRegistered.as_str(),
                    &[("das_id", id.as_str()), ("kind", kind)],
                );
                Ok(Registration::Created(id))
            }
        }
    }

    /// Removes an instance and closes it
    pub fn unregister(&self, id: &str) -> DasResult<()> {
        let removed = self.write()?.remove(id);
        match removed {
            Some(instance) => {
                instance.close();
                Logger::info(Event::DasUnregistered.as_str(), &[("das_id", id)]);
                Ok(())
            }
            None => Err(DasError::InstanceNotFound(id.to_string())),
        }
    }

    /// Looks up an active instance
    pub fn resolve(&self, id: &str) -> DasResult<Arc<Instance>> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| DasError::InstanceNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> DasResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    pub fn len(&self) -> usize {
        self.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active instance ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    fn read(
        &self,
    ) -> DasResult<std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Instance>>>> {
        self.instances
            .read()
            .map_err(|_| DasError::internal("Lock poisoned"))
    }

    fn write(
        &self,
    ) -> DasResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Instance>>>> {
        self.instances
            .write()
            .map_err(|_| DasError::internal("Lock poisoned"))
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
