//! Canonical identifier for a NetApp capacity pool

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
]);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.NetApp/netAppAccounts/{accountName}/capacityPools/{poolName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapacityPoolId {
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    pub pool_name: String,
}

impl CapacityPoolId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
        pool_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
            pool_name: pool_name.into(),
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
        })
    }

    /// The account this pool belongs to
    pub fn account(&self) -> super::NetAppAccountId {
        super::NetAppAccountId::new(
            self.subscription_id.clone(),
            self.resource_group.clone(),
            self.account_name.clone(),
        )
    }
}

impl fmt::Display for CapacityPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TEMPLATE.format(&[
            &self.subscription_id,
            &self.resource_group,
            &self.account_name,
            &self.pool_name,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let id = CapacityPoolId::new("sub-1", "rg-1", "files", "pool-1");
        assert_eq!(CapacityPoolId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn account_id_is_prefix() {
        let id = CapacityPoolId::new("sub-1", "rg-1", "files", "pool-1");
        assert!(id.to_string().starts_with(&id.account().to_string()));
    }

    #[test]
    fn parse_rejects_missing_pool_segment() {
        assert!(matches!(
            CapacityPoolId::parse(
                "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.NetApp/netAppAccounts/files"
            ),
            Err(ParseError::WrongSegmentCount { .. })
        ));
    }
}
