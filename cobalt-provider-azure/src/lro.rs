//! Long-running operation polling
//!
//! Mutating ARM calls often return 201/202 and finish asynchronously. The
//! poller prefers the operation monitor URL handed back in the
//! `Azure-AsyncOperation`/`Location` header; without one it falls back to
//! polling the resource itself until `provisioningState` reaches a terminal
//! value. Waits are a fixed interval with a bounded number of attempts;
//! cancellation is the caller's timeout.

use std::time::Duration;

use tracing::debug;

use crate::client::{ArmClient, ArmError, ArmResponse};

const TERMINAL_FAILED: &[&str] = &["Failed", "Canceled"];

/// Polls operations until they reach a terminal state
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 360,
        }
    }
}

impl Poller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Wait for a create or update to settle
    pub async fn wait_for_completion(
        &self,
        client: &ArmClient,
        response: &ArmResponse,
        path: &str,
        api_version: &str,
    ) -> Result<(), ArmError> {
        if let Some(monitor) = &response.monitor {
            return self.poll_monitor(client, monitor).await;
        }

        // Synchronous completion: the response body already carries a
        // terminal provisioning state (or none at all)
        if let Some(body) = &response.body {
            match provisioning_state(body) {
                None | Some("Succeeded") => return Ok(()),
                Some(state) if TERMINAL_FAILED.contains(&state) => {
                    return Err(ArmError::OperationFailed {
                        status: state.to_string(),
                        message: "resource entered a failed provisioning state".to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        self.poll_provisioning_state(client, path, api_version).await
    }

    /// Wait for a delete to settle: the resource is gone once GET returns 404
    pub async fn wait_for_delete(
        &self,
        client: &ArmClient,
        response: &ArmResponse,
        path: &str,
        api_version: &str,
    ) -> Result<(), ArmError> {
        if let Some(monitor) = &response.monitor {
            return self.poll_monitor(client, monitor).await;
        }
        if response.status == 200 {
            return Ok(());
        }

        for attempt in 0..self.max_attempts {
            if client.get(path, api_version).await?.is_none() {
                return Ok(());
            }
            debug!(path, attempt, "resource still present, waiting");
            tokio::time::sleep(self.interval).await;
        }

        Err(ArmError::OperationTimedOut {
            attempts: self.max_attempts,
        })
    }

    /// Poll an operation monitor URL until its status is terminal
    async fn poll_monitor(&self, client: &ArmClient, monitor: &str) -> Result<(), ArmError> {
        for attempt in 0..self.max_attempts {
            let body = client.get_absolute(monitor).await?;
            let status = body
                .as_ref()
                .and_then(|b| b.get("status"))
                .and_then(|s| s.as_str());

            match status {
                Some("Succeeded") => return Ok(()),
                Some(state) if TERMINAL_FAILED.contains(&state) => {
                    let message = body
                        .as_ref()
                        .and_then(|b| b.pointer("/error/message"))
                        .and_then(|m| m.as_str())
                        .unwrap_or("no error detail returned")
                        .to_string();
                    return Err(ArmError::OperationFailed {
                        status: state.to_string(),
                        message,
                    });
                }
                _ => {
                    debug!(monitor, attempt, ?status, "operation in progress");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        Err(ArmError::OperationTimedOut {
            attempts: self.max_attempts,
        })
    }

    /// Poll the resource until its provisioning state is terminal
    async fn poll_provisioning_state(
        &self,
        client: &ArmClient,
        path: &str,
        api_version: &str,
    ) -> Result<(), ArmError> {
        for attempt in 0..self.max_attempts {
            let body = client.get(path, api_version).await?;
            let state = body.as_ref().and_then(provisioning_state_owned);

            match state.as_deref() {
                // A vanished or state-less resource has nothing left to wait on
                None | Some("Succeeded") => return Ok(()),
                Some(state) if TERMINAL_FAILED.contains(&state) => {
                    return Err(ArmError::OperationFailed {
                        status: state.to_string(),
                        message: "resource entered a failed provisioning state".to_string(),
                    });
                }
                Some(_) => {
                    debug!(path, attempt, ?state, "provisioning in progress");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        Err(ArmError::OperationTimedOut {
            attempts: self.max_attempts,
        })
    }
}

fn provisioning_state(body: &serde_json::Value) -> Option<&str> {
    body.pointer("/properties/provisioningState")?.as_str()
}

fn provisioning_state_owned(body: &serde_json::Value) -> Option<String> {
    provisioning_state(body).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::tests::{mock_token_endpoint, test_client};

    fn fast_poller() -> Poller {
        Poller::new(Duration::from_millis(1), 10)
    }

    fn async_response(monitor: Option<String>) -> ArmResponse {
        ArmResponse {
            status: 201,
            body: None,
            monitor,
        }
    }

    #[tokio::test]
    async fn monitor_polled_until_succeeded() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "InProgress" })),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "Succeeded" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = async_response(Some(format!("{}/operations/op-1", server.uri())));

        fast_poller()
            .wait_for_completion(&client, &response, "/unused", "2021-04-01")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn monitor_failure_carries_error_detail() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Failed",
                "error": { "code": "BadThing", "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = async_response(Some(format!("{}/operations/op-1", server.uri())));

        let err = fast_poller()
            .wait_for_completion(&client, &response, "/unused", "2021-04-01")
            .await
            .unwrap_err();

        match err {
            ArmError::OperationFailed { status, message } => {
                assert_eq!(status, "Failed");
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected OperationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn provisioning_state_polled_without_monitor() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        let resource = "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.KeyVault/managedHSMs/h";
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "provisioningState": "Provisioning" }
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "provisioningState": "Succeeded" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = ArmResponse {
            status: 202,
            body: None,
            monitor: None,
        };

        fast_poller()
            .wait_for_completion(&client, &response, resource, "2023-07-01")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_waits_for_404() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        let resource = "/subscriptions/sub-1/resourceGroups/rg";
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "rg" })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = ArmResponse {
            status: 202,
            body: None,
            monitor: None,
        };

        fast_poller()
            .wait_for_delete(&client, &response, resource, "2021-04-01")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bounded_attempts_time_out() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "InProgress" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = async_response(Some(format!("{}/operations/op-1", server.uri())));

        let err = Poller::new(Duration::from_millis(1), 3)
            .wait_for_completion(&client, &response, "/unused", "2021-04-01")
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::OperationTimedOut { attempts: 3 }));
    }
}
