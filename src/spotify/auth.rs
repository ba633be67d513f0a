use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{Res, config::Settings, error::AuthError, types::TokenResponse};

/// The OAuth side of the provider, treated as a black box by the rest of the
/// service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// URL the user is redirected to in order to grant access.
    fn authorize_url(&self) -> String;

    /// Exchanges an authorization code for a token.
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError>;

    /// Obtains a fresh access token from a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError>;
}

/// Authorization-code flow against Spotify's accounts service.
///
/// The client secret is sent with every token request, so this type must
/// only ever run server side.
pub struct SpotifyAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: Url,
    token_url: String,
}

impl SpotifyAuth {
    /// Builds the auth provider from the service settings.
    ///
    /// # Errors
    ///
    /// Fails when `SPOTIFY_AUTH_URL` is not a valid URL or the HTTP client
    /// cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Res<Self> {
        let client = Client::builder()
            .timeout(settings.provider_timeout)
            .build()?;

        Ok(Self {
            client,
            client_id: settings.spotify_client_id.clone(),
            client_secret: settings.spotify_client_secret.clone(),
            redirect_uri: settings.spotify_redirect_uri.clone(),
            scope: settings.spotify_scope.clone(),
            auth_url: Url::parse(&settings.spotify_auth_url)?,
            token_url: settings.spotify_token_url.clone(),
        })
    }

    /// Posts a form to the token endpoint and decodes the token response.
    ///
    /// `failure` prefixes the upstream body when the endpoint answers with a
    /// non-success status.
    async fn request_token(
        &self,
        form: &[(&str, &str)],
        failure: &str,
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "token endpoint request failed");
                AuthError::Transport
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            tracing::error!(error = %err, "failed to read token endpoint response");
            AuthError::Transport
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token endpoint rejected request");
            return Err(AuthError::Upstream {
                status: status.as_u16(),
                body: format!("{failure}: {text}"),
            });
        }

        serde_json::from_str(&text).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthProvider for SpotifyAuth {
    fn authorize_url(&self) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("scope", &self.scope);
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        tracing::info!("exchanging authorization code");
        self.request_token(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ],
            "Failed to retrieve token from Spotify",
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        tracing::info!("refreshing access token");
        let mut token = self
            .request_token(
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                ],
                "Failed to refresh token",
            )
            .await?;

        // Spotify does not always rotate the refresh token.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }
}
