//! Executor - Apply a Plan through a Provider
//!
//! Effects run sequentially; one effect executes to completion (including
//! any nested polling inside the provider) before the next starts. The
//! executor stops at the first failure. Whatever the remote API left behind
//! on a partial failure is picked up by the next read.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::effect::Effect;
use crate::plan::Plan;
use crate::provider::{Provider, ProviderError, ProviderResult};
use crate::resource::{ResourceId, State};

/// Per-operation timeouts, declared in configuration and never computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

/// What the executor did for one effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refreshed,
    Created,
    Updated,
    Replaced,
    Deleted,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Refreshed => "refreshed",
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Replaced => "replaced",
            Action::Deleted => "deleted",
        }
    }
}

/// Outcome of one applied effect
#[derive(Debug)]
pub struct EffectOutcome {
    pub id: ResourceId,
    pub action: Action,
    /// New state after the operation; `None` after a delete
    pub result: Result<Option<State>, ProviderError>,
}

/// Result of applying a whole plan
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub outcomes: Vec<EffectOutcome>,
    /// Effects that were not attempted because an earlier one failed
    pub skipped: usize,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.skipped == 0 && self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn first_error(&self) -> Option<&ProviderError> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err())
    }
}

/// Applies plans through a Provider with per-resource timeouts
pub struct Executor<'a, P: Provider> {
    provider: &'a P,
    timeouts: HashMap<ResourceId, OperationTimeouts>,
    default_timeouts: OperationTimeouts,
}

impl<'a, P: Provider> Executor<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            timeouts: HashMap::new(),
            default_timeouts: OperationTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: HashMap<ResourceId, OperationTimeouts>) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_default_timeouts(mut self, timeouts: OperationTimeouts) -> Self {
        self.default_timeouts = timeouts;
        self
    }

    fn timeouts_for(&self, id: &ResourceId) -> OperationTimeouts {
        self.timeouts.get(id).copied().unwrap_or(self.default_timeouts)
    }

    /// Apply every effect in order, stopping at the first failure.
    ///
    /// `identifiers` maps resources to their persisted canonical IDs and is
    /// consulted for update/replace/delete targets.
    pub async fn apply(
        &self,
        plan: &Plan,
        identifiers: &HashMap<ResourceId, String>,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for (index, effect) in plan.effects().iter().enumerate() {
            let outcome = self.apply_effect(effect, identifiers).await;

            let failed = outcome.result.is_err();
            if let Err(error) = &outcome.result {
                warn!(resource = %outcome.id, %error, "effect failed, stopping");
            } else {
                info!(resource = %outcome.id, action = outcome.action.as_str(), "effect applied");
            }
            report.outcomes.push(outcome);

            if failed {
                report.skipped = plan.effects().len() - index - 1;
                break;
            }
        }

        report
    }

    async fn apply_effect(
        &self,
        effect: &Effect,
        identifiers: &HashMap<ResourceId, String>,
    ) -> EffectOutcome {
        let id = effect.resource_id().clone();
        let timeouts = self.timeouts_for(&id);

        match effect {
            Effect::Read(id) => {
                let identifier = identifiers.get(id).map(String::as_str);
                let result = with_timeout(
                    "read",
                    timeouts.read,
                    self.provider.read(id, identifier),
                )
                .await;
                EffectOutcome {
                    id: id.clone(),
                    action: Action::Refreshed,
                    result: result.map(Some),
                }
            }
            Effect::Create(resource) => {
                let result =
                    with_timeout("create", timeouts.create, self.provider.create(resource)).await;
                EffectOutcome {
                    id,
                    action: Action::Created,
                    result: result.map(Some),
                }
            }
            Effect::Update { id, from, to } => {
                let result = match self.identifier_of(id, from, identifiers) {
                    Ok(identifier) => {
                        with_timeout(
                            "update",
                            timeouts.update,
                            self.provider.update(id, &identifier, from, to),
                        )
                        .await
                    }
                    Err(e) => Err(e),
                };
                EffectOutcome {
                    id: id.clone(),
                    action: Action::Updated,
                    result: result.map(Some),
                }
            }
            Effect::Replace { id, from, to } => {
                let result = match self.identifier_of(id, from, identifiers) {
                    Ok(identifier) => {
                        let deleted = with_timeout(
                            "delete",
                            timeouts.delete,
                            self.provider.delete(id, &identifier),
                        )
                        .await;
                        match deleted {
                            Ok(()) => {
                                with_timeout("create", timeouts.create, self.provider.create(to))
                                    .await
                            }
                            Err(e) => Err(e),
                        }
                    }
                    Err(e) => Err(e),
                };
                EffectOutcome {
                    id: id.clone(),
                    action: Action::Replaced,
                    result: result.map(Some),
                }
            }
            Effect::Delete(id) => {
                let result = match identifiers.get(id) {
                    Some(identifier) => {
                        with_timeout(
                            "delete",
                            timeouts.delete,
                            self.provider.delete(id, identifier),
                        )
                        .await
                    }
                    None => Err(ProviderError::invalid_config(format!(
                        "no identifier recorded for {}, cannot delete",
                        id
                    ))
                    .during("delete")),
                };
                EffectOutcome {
                    id: id.clone(),
                    action: Action::Deleted,
                    result: result.map(|()| None),
                }
            }
        }
    }

    fn identifier_of(
        &self,
        id: &ResourceId,
        from: &State,
        identifiers: &HashMap<ResourceId, String>,
    ) -> ProviderResult<String> {
        from.identifier
            .clone()
            .or_else(|| identifiers.get(id).cloned())
            .ok_or_else(|| {
                ProviderError::invalid_config(format!("no identifier recorded for {}", id))
            })
    }
}

async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    fut: impl Future<Output = ProviderResult<T>>,
) -> ProviderResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::timeout(operation, limit.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BoxFuture, ErrorKind};
    use crate::resource::Resource;
    use std::sync::Mutex;

    /// Provider that records calls and optionally fails create
    struct RecordingProvider {
        calls: Mutex<Vec<String>>,
        fail_create: bool,
        create_delay: Duration,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_create: false,
                create_delay: Duration::ZERO,
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl Provider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn resource_types(&self) -> Vec<&'static str> {
            vec!["resource_group"]
        }

        fn read(
            &self,
            id: &ResourceId,
            _identifier: Option<&str>,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            self.record(format!("read {}", id));
            let id = id.clone();
            Box::pin(async move { Ok(State::not_found(id)) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            self.record(format!("create {}", resource.id));
            let id = resource.id.clone();
            let attrs = resource.attributes.clone();
            let fail = self.fail_create;
            let delay = self.create_delay;
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                if fail {
                    Err(ProviderError::new("create exploded"))
                } else {
                    Ok(State::existing(id, attrs).with_identifier("/subscriptions/s/x"))
                }
            })
        }

        fn update(
            &self,
            id: &ResourceId,
            identifier: &str,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            self.record(format!("update {} {}", id, identifier));
            let id = id.clone();
            let attrs = to.attributes.clone();
            let identifier = identifier.to_string();
            Box::pin(async move { Ok(State::existing(id, attrs).with_identifier(identifier)) })
        }

        fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
            self.record(format!("delete {} {}", id, identifier));
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn apply_executes_in_order() {
        let provider = RecordingProvider::new();
        let mut plan = Plan::new();
        plan.add(Effect::Create(Resource::new("resource_group", "a")));
        plan.add(Effect::Delete(ResourceId::new("resource_group", "b")));

        let mut identifiers = HashMap::new();
        identifiers.insert(
            ResourceId::new("resource_group", "b"),
            "/subscriptions/s/resourceGroups/b".to_string(),
        );

        let report = Executor::new(&provider).apply(&plan, &identifiers).await;

        assert!(report.is_success());
        assert_eq!(report.outcomes.len(), 2);
        let calls = provider.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "create resource_group.a",
                "delete resource_group.b /subscriptions/s/resourceGroups/b",
            ]
        );
    }

    #[tokio::test]
    async fn apply_stops_at_first_failure() {
        let provider = RecordingProvider {
            fail_create: true,
            ..RecordingProvider::new()
        };
        let mut plan = Plan::new();
        plan.add(Effect::Create(Resource::new("resource_group", "a")));
        plan.add(Effect::Create(Resource::new("resource_group", "b")));

        let report = Executor::new(&provider).apply(&plan, &HashMap::new()).await;

        assert!(!report.is_success());
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn replace_deletes_then_creates() {
        let provider = RecordingProvider::new();
        let id = ResourceId::new("resource_group", "a");
        let from = State::existing(id.clone(), HashMap::new())
            .with_identifier("/subscriptions/s/resourceGroups/a");

        let mut plan = Plan::new();
        plan.add(Effect::Replace {
            id: id.clone(),
            from,
            to: Resource::new("resource_group", "a"),
        });

        let report = Executor::new(&provider).apply(&plan, &HashMap::new()).await;

        assert!(report.is_success());
        let calls = provider.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "delete resource_group.a /subscriptions/s/resourceGroups/a",
                "create resource_group.a",
            ]
        );
    }

    #[tokio::test]
    async fn slow_create_times_out() {
        let provider = RecordingProvider {
            create_delay: Duration::from_millis(200),
            ..RecordingProvider::new()
        };
        let mut plan = Plan::new();
        plan.add(Effect::Create(Resource::new("resource_group", "slow")));

        let report = Executor::new(&provider)
            .with_default_timeouts(OperationTimeouts {
                create: Duration::from_millis(10),
                ..OperationTimeouts::default()
            })
            .apply(&plan, &HashMap::new())
            .await;

        let error = report.first_error().expect("expected a timeout error");
        assert_eq!(error.kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn delete_without_identifier_fails() {
        let provider = RecordingProvider::new();
        let mut plan = Plan::new();
        plan.add(Effect::Delete(ResourceId::new("resource_group", "ghost")));

        let report = Executor::new(&provider).apply(&plan, &HashMap::new()).await;

        let error = report.first_error().expect("expected an error");
        assert_eq!(error.kind, ErrorKind::InvalidConfig);
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
