use serde::{Deserialize, Serialize};

use crate::core_service::{SearchService, ServiceError};
use crate::gateway::GatewayError;
use crate::model::SearchResultPayload;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Network,
    Backend,
    Decode,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok {
        term: String,
        response: SearchResultPayload,
    },
    Err {
        error: ErrorResponse,
    },
}

impl TransportResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

pub fn handle_search(service: &SearchService, term: &str) -> TransportResponse {
    match service.search(term) {
        Ok(response) => TransportResponse::Ok {
            term: term.trim().to_string(),
            response,
        },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

pub fn to_json(response: &TransportResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string(response)
}

pub fn map_service_error(error: ServiceError) -> ErrorResponse {
    let message = error.to_string();
    match error {
        ServiceError::EmptyTerm => ErrorResponse {
            code: ErrorCode::InvalidRequest,
            message,
            status: None,
        },
        ServiceError::Config(_) => ErrorResponse {
            code: ErrorCode::Config,
            message,
            status: None,
        },
        ServiceError::Gateway(GatewayError::Network(_)) => ErrorResponse {
            code: ErrorCode::Network,
            message,
            status: None,
        },
        ServiceError::Gateway(GatewayError::Backend { status, .. }) => ErrorResponse {
            code: ErrorCode::Backend,
            message,
            status: Some(status),
        },
        ServiceError::Gateway(GatewayError::Decode(_)) => ErrorResponse {
            code: ErrorCode::Decode,
            message,
            status: None,
        },
    }
}
