//! REST client for the listdesk API.
//!
//! Wraps every endpoint of the server with [`reqwest`] and decodes the
//! `{data, error}` envelope into typed results or [`ClientError`]s.

use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::client::{ClientError, ListingSource, Session};
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::models::user::{Owner, RegisterUser, UserResponse};
use crate::models::Listing;
use crate::routes::auth::LoginRequest;
use crate::services::auth::AuthResponse;

/// Response envelope as seen by the client.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<ApiError>,
}

/// HTTP client for one listdesk server.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
            session: Session::default(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// POST /auth/register; the new account becomes the current session.
    pub async fn register(&mut self, input: &RegisterUser) -> Result<&Session, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(input)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse_response(response).await?;
        self.session = auth.into();
        Ok(&self.session)
    }

    /// POST /auth/login
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse_response(response).await?;
        tracing::debug!(user_id = %auth.user.id, "Logged in");
        self.session = auth.into();
        Ok(&self.session)
    }

    /// POST /auth/logout; the local session is dropped even if the call fails.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let result = self.client.post(self.url("/auth/logout")).send().await;
        self.session = Session::default();
        let _: String = Self::parse_response(result?).await?;
        Ok(())
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        let response = self
            .authorized(self.client.get(self.url("/auth/me")))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /{kind}/stats/{owner}
    pub async fn fetch_stats<L: Listing>(&self, owner: Uuid) -> Result<L::Stats, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/{}/stats/{owner}", L::KIND.plural)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /{kind}
    pub async fn fetch_every<L: Listing>(&self) -> Result<Vec<L>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/{}", L::KIND.plural)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Decode the envelope; non-2xx responses become the matching
    /// [`ClientError`] variant.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) if status.is_success() => envelope.data.ok_or(ClientError::EmptyResponse),
            Ok(Envelope {
                error: Some(error), ..
            }) => Err(ClientError::from_api(status.as_u16(), error)),
            Ok(_) => Err(ClientError::from_status(
                status.as_u16(),
                status.to_string(),
            )),
            Err(e) if status.is_success() => Err(ClientError::Server {
                status: status.as_u16(),
                message: format!("Malformed response: {e}"),
            }),
            Err(_) => Err(ClientError::from_status(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            )),
        }
    }
}

impl<L: Listing> ListingSource<L> for RestClient {
    async fn fetch_all(&self, owner: Uuid) -> Result<Vec<L>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/{}/user/{owner}", L::KIND.plural)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// The server assigns ownership from the bearer token.
    async fn create(&self, _owner: &Owner, draft: L::Draft) -> Result<L, ClientError> {
        let response = self
            .authorized(self.client.post(self.url(&format!("/{}", L::KIND.plural))))
            .json(&draft)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update(&self, id: Uuid, patch: L::Patch) -> Result<L, ClientError> {
        let response = self
            .authorized(self.client.put(self.url(&format!("/{}/{id}", L::KIND.plural))))
            .json(&patch)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .authorized(
                self.client
                    .delete(self.url(&format!("/{}/{id}", L::KIND.plural))),
            )
            .send()
            .await?;
        let _: String = Self::parse_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let client = RestClient::new(&ClientConfig::new("http://localhost:5000/api/"));
        assert_eq!(client.url("/items/user/1"), "http://localhost:5000/api/items/user/1");
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn envelope_decodes_error_without_data() {
        let envelope: Envelope<Vec<u8>> = serde_json::from_str(
            r#"{"data":null,"error":{"code":"FORBIDDEN","message":"Only the owner can modify this item"}}"#,
        )
        .unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.unwrap().code, "FORBIDDEN");
    }
}
