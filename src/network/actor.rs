//! Network actor - runs HTTP requests in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute_request};

/// Network actor that processes HTTP request commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client: create_client(),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::ExecuteRequest { id, request, variables }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %request.url, method = %request.method, "Executing request");
                                let result = execute_request(&client, request, variables, id).await;
                                tracing::info!(id = result.id(), "Request completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestEntry;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_actor_reports_errors_and_shuts_down() {
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(resp_tx).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::ExecuteRequest {
                id: 3,
                request: RequestEntry::new("r", "GET", ""),
                variables: BTreeMap::new(),
            })
            .unwrap();

        let response = resp_rx.recv().await.unwrap();
        assert_eq!(response.id(), 3);
        assert!(matches!(response, NetworkResponse::Error { .. }));

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
