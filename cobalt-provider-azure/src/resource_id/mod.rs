//! Canonical resource identifiers
//!
//! Every ARM resource is addressed by a canonical path such as
//! `/subscriptions/{id}/resourceGroups/{name}/providers/Microsoft.NetApp/netAppAccounts/{account}`.
//! An identifier shape is described by an ordered list of tagged segments;
//! parsing is a left-to-right structural match producing named captures and
//! formatting is the inverse substitution. Each segment consumes exactly one
//! `/`-delimited path element, so values must not embed `/`.
//!
//! The strict parser validates user-typed identifiers against canonical
//! casing. The insensitive variant exists because the API may alter the
//! casing of literal segments on round-trip; it never normalizes captured
//! values and must not be used on configuration input.

mod capacity_pool;
mod managed_cluster;
mod managed_hsm;
mod netapp_account;
mod netapp_volume;
mod resource_group;
mod role_assignment;
mod role_definition;
mod subnet;

pub use capacity_pool::CapacityPoolId;
pub use managed_cluster::ManagedClusterId;
pub use managed_hsm::ManagedHsmId;
pub use netapp_account::NetAppAccountId;
pub use netapp_volume::NetAppVolumeId;
pub use resource_group::ResourceGroupId;
pub use role_assignment::RoleAssignmentId;
pub use role_definition::RoleDefinitionId;
pub use subnet::SubnetId;

/// What one path element of an identifier is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal element with canonical casing (e.g. "resourceGroups")
    Static(&'static str),
    /// Captures the subscription ID
    SubscriptionId,
    /// Captures the resource group name
    ResourceGroup,
    /// Literal resource-provider element (e.g. "Microsoft.NetApp")
    ProviderNamespace(&'static str),
    /// Captures a user-chosen name
    UserSpecified,
}

/// One named element of an identifier template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub kind: SegmentKind,
}

impl Segment {
    pub const fn literal(value: &'static str) -> Self {
        Self {
            name: value,
            kind: SegmentKind::Static(value),
        }
    }

    pub const fn subscription_id() -> Self {
        Self {
            name: "subscriptionId",
            kind: SegmentKind::SubscriptionId,
        }
    }

    pub const fn resource_group() -> Self {
        Self {
            name: "resourceGroupName",
            kind: SegmentKind::ResourceGroup,
        }
    }

    pub const fn provider(namespace: &'static str) -> Self {
        Self {
            name: namespace,
            kind: SegmentKind::ProviderNamespace(namespace),
        }
    }

    pub const fn user(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::UserSpecified,
        }
    }

    /// The literal this segment must equal, if it is not a capturing segment
    fn fixed_value(&self) -> Option<&'static str> {
        match self.kind {
            SegmentKind::Static(v) | SegmentKind::ProviderNamespace(v) => Some(v),
            _ => None,
        }
    }
}

/// Failure to parse an identifier string against a template
///
/// Parse failures are terminal: there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("ID \"{input}\" must begin with \"/\"")]
    NotRooted { input: String },

    #[error("ID \"{input}\" has {found} segments, expected {expected}")]
    WrongSegmentCount {
        input: String,
        expected: usize,
        found: usize,
    },

    #[error("the segment \"{segment}\" could not be found in \"{input}\"")]
    SegmentNotFound {
        segment: &'static str,
        input: String,
    },
}

/// Named captures produced by a successful parse, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedValues {
    entries: Vec<(&'static str, String)>,
}

impl CapturedValues {
    fn push(&mut self, name: &'static str, value: &str) {
        self.entries.push((name, value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }
}

/// Pull a named capture out, failing with the segment name if absent
pub(crate) fn required(
    captured: &CapturedValues,
    segment: &'static str,
    input: &str,
) -> Result<String, ParseError> {
    captured
        .get(segment)
        .map(str::to_string)
        .ok_or_else(|| ParseError::SegmentNotFound {
            segment,
            input: input.to_string(),
        })
}

/// An identifier shape: an ordered list of segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceIdTemplate {
    pub segments: &'static [Segment],
}

impl ResourceIdTemplate {
    pub const fn new(segments: &'static [Segment]) -> Self {
        Self { segments }
    }

    /// Strict parse: literal segments must match canonical casing exactly
    pub fn parse(&self, input: &str) -> Result<CapturedValues, ParseError> {
        self.parse_with(input, true)
    }

    /// Lenient parse for identifiers round-tripped through the API or
    /// persisted state: literal segments match case-insensitively. Captured
    /// values are returned exactly as they appeared in the input.
    pub fn parse_insensitively(&self, input: &str) -> Result<CapturedValues, ParseError> {
        self.parse_with(input, false)
    }

    fn parse_with(&self, input: &str, case_sensitive: bool) -> Result<CapturedValues, ParseError> {
        let rest = input.strip_prefix('/').ok_or_else(|| ParseError::NotRooted {
            input: input.to_string(),
        })?;

        let elements: Vec<&str> = rest.split('/').collect();
        if elements.len() != self.segments.len() {
            return Err(ParseError::WrongSegmentCount {
                input: input.to_string(),
                expected: self.segments.len(),
                found: elements.len(),
            });
        }

        let mut captured = CapturedValues::default();

        for (segment, element) in self.segments.iter().zip(&elements) {
            match segment.fixed_value() {
                Some(expected) => {
                    let matched = if case_sensitive {
                        *element == expected
                    } else {
                        element.eq_ignore_ascii_case(expected)
                    };
                    if !matched {
                        return Err(ParseError::SegmentNotFound {
                            segment: segment.name,
                            input: input.to_string(),
                        });
                    }
                }
                None => {
                    if element.is_empty() {
                        return Err(ParseError::SegmentNotFound {
                            segment: segment.name,
                            input: input.to_string(),
                        });
                    }
                    captured.push(segment.name, element);
                }
            }
        }

        Ok(captured)
    }

    /// Render the canonical string, substituting `values` into the capturing
    /// segments in template order. Literal segments always render their
    /// canonical casing.
    pub fn format(&self, values: &[&str]) -> String {
        debug_assert_eq!(
            values.len(),
            self.segments.iter().filter(|s| s.fixed_value().is_none()).count()
        );

        let mut out = String::new();
        let mut values = values.iter();
        for segment in self.segments {
            out.push('/');
            match segment.fixed_value() {
                Some(fixed) => out.push_str(fixed),
                None => out.push_str(values.next().copied().unwrap_or("")),
            }
        }
        out
    }
}
