use crate::automation::Automation;
use crate::error::StoreError;
use crate::graph::validate_flat_array;
use ahash::AHashMap;

/// The persistence boundary for automations.
///
/// Implementations must refuse to store a node graph that fails
/// `validate_flat_array`, so a malformed graph never reaches the next load.
pub trait AutomationStore {
    fn load(&self, id: &str) -> Result<Automation, StoreError>;

    fn save(&mut self, automation: Automation) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<Automation, StoreError>;

    /// All automations of one organization, sorted by name.
    fn list_for_organization(&self, organization_id: &str) -> Vec<Automation>;
}

/// Checks an automation the way every store should before writing it.
pub fn ensure_persistable(automation: &Automation) -> Result<(), StoreError> {
    validate_flat_array(&automation.nodes)
        .into_result()
        .map_err(|source| StoreError::Rejected {
            automation_id: automation.id.clone(),
            source,
        })
}

/// An in-process store, mainly for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    automations: AHashMap<String, Automation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.automations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.automations.is_empty()
    }
}

impl AutomationStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Automation, StoreError> {
        self.automations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&mut self, automation: Automation) -> Result<(), StoreError> {
        if let Err(err) = ensure_persistable(&automation) {
            tracing::warn!(automation_id = %automation.id, "refusing to store automation: {}", err);
            return Err(err);
        }
        tracing::info!(
            automation_id = %automation.id,
            nodes = automation.nodes.len(),
            "automation stored"
        );
        self.automations.insert(automation.id.clone(), automation);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<Automation, StoreError> {
        self.automations
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_for_organization(&self, organization_id: &str) -> Vec<Automation> {
        let mut found: Vec<Automation> = self
            .automations
            .values()
            .filter(|a| a.organization_id == organization_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }
}
