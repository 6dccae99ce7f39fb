//! Canonical identifier for a NetApp volume
//!
//! The deepest identifier in the provider: volume names nest under an
//! account and a capacity pool.

use std::fmt;

use super::{CapturedValues, ParseError, ResourceIdTemplate, Segment, required};

const TEMPLATE: ResourceIdTemplate = ResourceIdTemplate::new(&[
    Segment::literal("subscriptions"),
    Segment::subscription_id(),
    Segment::literal("resourceGroups"),
    Segment::resource_group(),
    Segment::literal("providers"),
    Segment::provider("Microsoft.NetApp"),
    Segment::literal("netAppAccounts"),
    Segment::user("accountName"),
    Segment::literal("capacityPools"),
    Segment::user("poolName"),
    Segment::literal("volumes"),
    Segment::user("volumeName"),
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.NetApp/netAppAccounts/{accountName}/capacityPools/{poolName}/volumes/{volumeName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetAppVolumeId {
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    pub pool_name: String,
    pub volume_name: String,
}

impl NetAppVolumeId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
        pool_name: impl Into<String>,
        volume_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
            pool_name: pool_name.into(),
            volume_name: volume_name.into(),
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
            account_name: required(&captured, "accountName", input)?,
            pool_name: required(&captured, "poolName", input)?,
            volume_name: required(&captured, "volumeName", input)?,
        })
    }

    /// The capacity pool this volume belongs to
    pub fn pool(&self) -> super::CapacityPoolId {
        super::CapacityPoolId::new(
            self.subscription_id.clone(),
            self.resource_group.clone(),
            self.account_name.clone(),
            self.pool_name.clone(),
        )
    }
}

impl fmt::Display for NetAppVolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[
            &self.subscription_id,
            &self.resource_group,
            &self.account_name,
            &self.pool_name,
            &self.volume_name,
        ]))
    }
}
