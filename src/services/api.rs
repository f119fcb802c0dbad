use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{
    Card, CardFields, CardId, CardsResponse, Credentials, Location, LocationCheckResponse,
    Session, User,
};

pub const CARDS_PATH: &str = "/api/cards";
pub const LOCATION_ENABLE_PATH: &str = "/api/location/enable";
pub const LOCATION_CHECK_PATH: &str = "/api/location/check";
pub const AUTH_LOGIN_PATH: &str = "/api/auth/login";
pub const AUTH_SIGNUP_PATH: &str = "/api/auth/signup";
pub const AUTH_LOGOUT_PATH: &str = "/api/auth/logout";
pub const AUTH_USER_PATH: &str = "/api/auth/user";

/// Error type for backend calls
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The configured base URL or a derived path could not be built
    InvalidUrl(String),
    /// The request never produced a response
    Network(String),
    /// The backend rejected or lacks the bearer token
    Unauthorized,
    /// Any other non-success status, with the backend's `error` text if it sent one
    Status { status: u16, message: Option<String> },
    /// The response body was not what the contract promises
    Decode(String),
}

impl ApiError {
    /// Text suitable for showing next to a form
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ApiError::InvalidUrl(e) => write!(f, "Invalid API URL: {}", e),
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Unauthorized => write!(f, "Authentication required"),
            ApiError::Status { status, message: Some(message) } => {
                write!(f, "Request failed with status {}: {}", status, message)
            }
            ApiError::Status { status, message: None } => {
                write!(f, "Request failed with status {}", status)
            }
            ApiError::Decode(e) => write!(f, "Unexpected response: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

/// `{ "error": "..." }` body the backend attaches to failures
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The REST surface the client consumes
///
/// Cards, location and auth endpoints of the cashback backend. The bearer
/// token is held by the implementation and attached to every call.
#[async_trait(?Send)]
pub trait CardsBackend {
    /// Install or clear the bearer token used for subsequent calls
    fn set_access_token(&self, token: Option<String>);

    async fn list_cards(&self) -> Result<CardsResponse, ApiError>;

    /// Returns the created card when the backend echoes it back
    async fn create_card(&self, fields: &CardFields) -> Result<Option<Card>, ApiError>;

    async fn update_card(&self, id: &CardId, fields: &CardFields) -> Result<Option<Card>, ApiError>;

    async fn delete_card(&self, id: &CardId) -> Result<(), ApiError>;

    async fn enable_location(&self) -> Result<(), ApiError>;

    async fn check_location(&self, location: Location) -> Result<LocationCheckResponse, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    async fn signup(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;
}

/// Pull a card out of a create/update response
///
/// Accepts both a bare card and the `{ success, card }` envelope.
pub fn card_from_body(body: serde_json::Value) -> Option<Card> {
    let value = match body.get("card") {
        Some(card) => card.clone(),
        None => body,
    };
    serde_json::from_value(value).ok()
}
