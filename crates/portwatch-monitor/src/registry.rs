//! The known-service registry.
//!
//! An insertion-ordered list of recognized services, loaded from the
//! persisted config at startup. The registry only grows during a run;
//! there is no removal. The classifier checks membership before
//! inserting, so the registry itself never deduplicates — a hand-edited
//! config with duplicate entries just matches redundantly.

use portwatch_core::{ConfigStore, KnownService, MonitorConfig, ServiceIdentity};

/// Identity-keyed set of recognized services.
pub struct ServiceRegistry {
    known: Vec<KnownService>,
    persist: Option<Persist>,
}

/// Learning-mode persistence. The registry owns the config blob it
/// rewrites so the file always reflects the full current state.
struct Persist {
    store: ConfigStore,
    config: MonitorConfig,
}

impl ServiceRegistry {
    /// Build a registry from the loaded config. In learning mode the
    /// registry keeps the store and config for whole-file rewrites on
    /// every new discovery.
    pub fn new(config: MonitorConfig, store: ConfigStore, learning: bool) -> Self {
        let known = config.known.clone();
        Self {
            known,
            persist: learning.then(|| Persist { store, config }),
        }
    }

    /// True iff any entry's identity matches exactly. Linear scan over
    /// all entries; every match is logged for observability.
    pub fn is_known(&self, identity: &ServiceIdentity) -> bool {
        let mut known = false;
        for svc in &self.known {
            if svc.identity == *identity {
                tracing::debug!(service = %svc.identity, name = %svc.name, "Matched known service");
                known = true;
            }
        }
        known
    }

    /// Append a service unconditionally; the caller is responsible for
    /// having checked [`ServiceRegistry::is_known`] first. In learning
    /// mode the config file is rewritten with the new entry appended to
    /// its known-list. A write failure is logged and the in-memory
    /// entry is kept for the remainder of the run.
    pub fn add(&mut self, service: KnownService) {
        if let Some(persist) = &mut self.persist {
            persist.config.known.push(service.clone());
            if let Err(e) = persist.store.save(&persist.config) {
                tracing::warn!(
                    error = %e,
                    path = %persist.store.path().display(),
                    "Failed to persist known service"
                );
            }
        }
        self.known.push(service);
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Entries in insertion order.
    pub fn services(&self) -> &[KnownService] {
        &self.known
    }
}
