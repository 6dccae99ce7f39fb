//! Canonical identifier for a role assignment at resource-group scope

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("resourceGroups"),
    Segment::resource_group(),
    Segment::literal("providers"),
    Segment::provider("Microsoft.Authorization"),
    Segment::literal("roleAssignments"),
    Segment::user("roleAssignmentName"),
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Authorization/roleAssignments/{roleAssignmentName}`
///
/// The assignment name is a GUID chosen at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleAssignmentId {
    pub subscription_id: String,
    pub resource_group: String,
    pub assignment_name: String,
}

impl RoleAssignmentId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        assignment_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            assignment_name: assignment_name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::from_captures(input, TEMPLATE.parse(input)?)
    }

    pub fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        Self::from_captures(input, TEMPLATE.parse_insensitively(input)?)
    }

    fn from_captures(input: &str, captured: CapturedValues) -> Result<Self, ParseError> {
        Ok(Self {
            subscription_id: required(&captured, "subscriptionId", input)?,
            resource_group: required(&captured, "resourceGroupName", input)?,
            assignment_name: required(&captured, "roleAssignmentName", input)?,
        })
    }

    /// The scope portion of the identifier (everything before the provider)
    pub fn scope(&self) -> String {
        super::ResourceGroupId::new(self.subscription_id.clone(), self.resource_group.clone())
            .to_string()
    }
}

impl fmt::Display for RoleAssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[
            &self.subscription_id,
            &self.resource_group,
            &self.assignment_name,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "8d7331cb-f10f-48b1-a2d8-5f4e4e2dbe47";

    #[test]
    fn round_trip() {
        let id = RoleAssignmentId::new("sub-1", "rg-1", NAME);
        assert_eq!(RoleAssignmentId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn scope_is_the_resource_group() {
        let id = RoleAssignmentId::new("sub-1", "rg-1", NAME);
        assert_eq!(id.scope(), "/subscriptions/sub-1/resourceGroups/rg-1");
        assert!(id.to_string().starts_with(&id.scope()));
    }
}
