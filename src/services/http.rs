use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::cell::RefCell;
use url::Url;

use super::api::{
    card_from_body, ApiError, CardsBackend, ErrorBody, AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH,
    AUTH_SIGNUP_PATH, AUTH_USER_PATH, CARDS_PATH, LOCATION_CHECK_PATH, LOCATION_ENABLE_PATH,
};
use crate::models::{
    AuthResponse, Card, CardFields, CardId, CardsResponse, Credentials, Location,
    LocationCheckResponse, Session, User,
};

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

/// reqwest client for the cashback backend
///
/// In the browser reqwest rides on `fetch`, so the same code serves the
/// wasm build and native tooling.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    access_token: RefCell<Option<String>>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: RefCell::new(None),
        }
    }

    /// Resolve an absolute API path against the base URL
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    /// URL of a single card, with the id percent-encoded as one segment
    fn card_url(&self, id: &CardId) -> Result<Url, ApiError> {
        let mut url = self.url(CARDS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(id.as_str());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.access_token.borrow().as_ref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn send_auth(&self, path: &str, credentials: &Credentials) -> Result<Session, ApiError> {
        let builder = self.request(Method::POST, self.url(path)?).json(credentials);
        let response = self.send(builder).await?;
        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.into_session())
    }

    async fn send_card(&self, builder: RequestBuilder) -> Result<Option<Card>, ApiError> {
        let response = self.send(builder).await?;
        // The body is informational; the caller reloads the list anyway
        match response.json::<serde_json::Value>().await {
            Ok(body) => Ok(card_from_body(body)),
            Err(e) => {
                log::debug!("Card response had no JSON body: {}", e);
                Ok(None)
            }
        }
    }
}

/// Map non-success statuses onto `ApiError`
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let message = response.json::<ErrorBody>().await.ok().map(|b| b.error);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait(?Send)]
impl CardsBackend for HttpBackend {
    fn set_access_token(&self, token: Option<String>) {
        *self.access_token.borrow_mut() = token;
    }

    async fn list_cards(&self) -> Result<CardsResponse, ApiError> {
        let response = self.send(self.request(Method::GET, self.url(CARDS_PATH)?)).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_card(&self, fields: &CardFields) -> Result<Option<Card>, ApiError> {
        let builder = self.request(Method::POST, self.url(CARDS_PATH)?).json(fields);
        self.send_card(builder).await
    }

    async fn update_card(&self, id: &CardId, fields: &CardFields) -> Result<Option<Card>, ApiError> {
        let builder = self.request(Method::PUT, self.card_url(id)?).json(fields);
        self.send_card(builder).await
    }

    async fn delete_card(&self, id: &CardId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, self.card_url(id)?)).await?;
        Ok(())
    }

    async fn enable_location(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, self.url(LOCATION_ENABLE_PATH)?))
            .await?;
        Ok(())
    }

    async fn check_location(&self, location: Location) -> Result<LocationCheckResponse, ApiError> {
        let builder = self
            .request(Method::POST, self.url(LOCATION_CHECK_PATH)?)
            .json(&location);
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.send_auth(AUTH_LOGIN_PATH, credentials).await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.send_auth(AUTH_SIGNUP_PATH, credentials).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, self.url(AUTH_LOGOUT_PATH)?))
            .await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let response = self
            .send(self.request(Method::GET, self.url(AUTH_USER_PATH)?))
            .await?;
        let body: UserResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.user)
    }
}
