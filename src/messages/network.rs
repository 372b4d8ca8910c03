//! Network messages - communication between App and Network layers

use std::collections::BTreeMap;

use crate::models::{RequestEntry, Response};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute a request after substituting the given variables
    ExecuteRequest {
        id: u64,
        request: RequestEntry,
        variables: BTreeMap<String, String>,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Completed HTTP exchange, whatever the status code
    Success { id: u64, response: Response },
    /// The request could not be built or sent
    Error {
        id: u64,
        message: String,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Success { id, .. } => *id,
            NetworkResponse::Error { id, .. } => *id,
        }
    }
}
