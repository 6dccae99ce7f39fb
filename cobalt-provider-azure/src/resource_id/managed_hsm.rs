//! Canonical identifier for a managed HSM cluster

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("resourceGroups"),
    Segment::resource_group(),
    Segment::literal("providers"),
    Segment::provider("Microsoft.KeyVault"),
    Segment::literal("managedHSMs"),
    Segment::user("managedHSMName"),
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.KeyVault/managedHSMs/{managedHSMName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedHsmId {
    pub subscription_id: String,
    pub resource_group: String,
    pub hsm_name: String,
}

impl ManagedHsmId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        hsm_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            hsm_name: hsm_name.into(),
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
            hsm_name: required(&captured, "managedHSMName", input)?,
        })
    }
}

impl fmt::Display for ManagedHsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[
            &self.subscription_id,
            &self.resource_group,
            &self.hsm_name,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let id = ManagedHsmId::new("sub-1", "rg-1", "prod-hsm");
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.KeyVault/managedHSMs/prod-hsm"
        );
        assert_eq!(ManagedHsmId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn insensitive_parse_accepts_api_casing() {
        // The API renders this literal as "managedHSMs" but has historically
        // returned "managedhsms" on some list endpoints
        let id = ManagedHsmId::parse_insensitively(
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.KeyVault/managedhsms/prod-hsm",
        )
        .unwrap();
        assert_eq!(id.hsm_name, "prod-hsm");
    }

    #[test]
    fn strict_parse_rejects_api_casing() {
        assert!(
            ManagedHsmId::parse(
                "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.KeyVault/managedhsms/prod-hsm"
            )
            .is_err()
        );
    }
}
