//! Canonical identifier for a managed Kubernetes cluster

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("resourceGroups"),
    Segment::resource_group(),
    Segment::literal("providers"),
    Segment::provider("Microsoft.ContainerService"),
    Segment::literal("managedClusters"),
    Segment::user("clusterName"),
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.ContainerService/managedClusters/{clusterName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedClusterId {
    pub subscription_id: String,
    pub resource_group: String,
    pub cluster_name: String,
}

impl ManagedClusterId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            cluster_name: cluster_name.into(),
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
            cluster_name: required(&captured, "clusterName", input)?,
        })
    }
}

impl fmt::Display for ManagedClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[
            &self.subscription_id,
            &self.resource_group,
            &self.cluster_name,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let id = ManagedClusterId::new("sub-1", "rg-1", "workloads");
        assert_eq!(ManagedClusterId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_hsm_id() {
        let err = ManagedClusterId::parse(
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.KeyVault/managedHSMs/x",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::SegmentNotFound {
                segment: "Microsoft.ContainerService",
                ..
            }
        ));
    }
}
