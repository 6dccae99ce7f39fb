//! Canonical identifier for a role definition
//!
//! Role definitions live directly under the subscription; there is no
//! resource-group segment.

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("providers"),
    Segment::provider("Microsoft.Authorization"),
    Segment::literal("roleDefinitions"),
    Segment::user("roleDefinitionName"),
]);

/// `/subscriptions/{subscriptionId}/providers/Microsoft.Authorization/roleDefinitions/{roleDefinitionName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleDefinitionId {
    pub subscription_id: String,
    pub definition_name: String,
}

impl RoleDefinitionId {
    pub fn new(subscription_id: impl Into<String>, definition_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            definition_name: definition_name.into(),
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
            definition_name: required(&captured, "roleDefinitionName", input)?,
        })
    }
}

impl fmt::Display for RoleDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[&self.subscription_id, &self.definition_name]))
    }
}
