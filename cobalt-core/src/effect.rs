//! Effect - Side effects as values
//!
//! An Effect describes one operation against real infrastructure. Effects are
//! inert data until the executor applies them through a Provider.

use crate::resource::{Resource, ResourceId, State};

/// A single operation to perform against the cloud
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Refresh the state of a resource
    Read(ResourceId),
    /// Create a resource that does not exist yet
    Create(Resource),
    /// Update a resource in place
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Destroy and recreate a resource (a force-new attribute changed)
    Replace {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Destroy a resource
    Delete(ResourceId),
}

impl Effect {
    /// Whether applying this Effect mutates real infrastructure
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read(_))
    }

    /// The resource this Effect targets
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Read(id) | Effect::Delete(id) => id,
            Effect::Create(r) => &r.id,
            Effect::Update { id, .. } | Effect::Replace { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_not_mutating() {
        let effect = Effect::Read(ResourceId::new("resource_group", "primary"));
        assert!(!effect.is_mutating());
    }

    #[test]
    fn create_is_mutating() {
        let effect = Effect::Create(Resource::new("resource_group", "primary"));
        assert!(effect.is_mutating());
        assert_eq!(effect.resource_id().name, "primary");
    }
}
