//! Canonical identifier for a resource group

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("resourceGroups"),
    Segment::resource_group(),
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
        }
    }

    /// Strict parse against canonical casing
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::from_captures(input, TEMPLATE.parse(input)?)
    }

    /// Lenient parse for identifiers round-tripped through the API
    pub fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        Self::from_captures(input, TEMPLATE.parse_insensitively(input)?)
    }

    fn from_captures(input: &str, captured: CapturedValues) -> Result<Self, ParseError> {
        Ok(Self {
            subscription_id: required(&captured, "subscriptionId", input)?,
            resource_group: required(&captured, "resourceGroupName", input)?,
        })
    }
}

impl fmt::Display for ResourceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[&self.subscription_id, &self.resource_group]))
    }
}
