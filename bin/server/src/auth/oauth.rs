//! OAuth 2.0 client for the platform login flow.
//!
//! The provider is a plain OAuth2 authorization server. The flow is the
//! authorization-code grant with PKCE and a CSRF state parameter; the
//! user profile is fetched from the identity endpoint afterwards, so no
//! ID-token handling happens here.

use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EmptyExtraTokenFields,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, StandardTokenResponse, TokenResponse,
    TokenUrl,
    basic::{BasicClient, BasicTokenType},
};

use crate::config::OAuthConfig;

/// Type alias for the token response type.
type PlatformTokenResponse = StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>;

/// OAuth client for authenticating platform users.
#[derive(Clone)]
pub struct OAuthClient {
    client_id: String,
    client_secret: String,
    authorize_url: String,
    token_url: String,
    redirect_url: String,
    scopes: Vec<String>,
}

/// State stored during the OAuth flow, kept in a short-lived cookie.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub csrf_token: String,
    pub pkce_verifier: String,
}

/// Result of a successful token exchange.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in_seconds: Option<u64>,
}

impl OAuthClient {
    /// Creates a new OAuth client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URLs are invalid.
    pub fn new(config: &OAuthConfig) -> Result<Self, OAuthError> {
        // Validate URLs up front so a bad config fails at startup.
        let _ = AuthUrl::new(config.authorize_url.clone())
            .map_err(|e| OAuthError::Configuration(format!("invalid authorize URL: {}", e)))?;
        let _ = TokenUrl::new(config.token_url.clone())
            .map_err(|e| OAuthError::Configuration(format!("invalid token URL: {}", e)))?;
        let _ = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| OAuthError::Configuration(format!("invalid redirect URI: {}", e)))?;

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            authorize_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
            redirect_url: config.redirect_uri.clone(),
            scopes: config.scopes().iter().map(ToString::to_string).collect(),
        })
    }

    /// Generates the authorization URL for redirecting the user.
    ///
    /// Returns the URL along with the auth state to store for the callback.
    pub fn authorization_url(&self) -> (String, AuthState) {
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.authorize_url.clone()).expect("valid authorize URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_url.clone()).expect("valid redirect URL"),
            );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    /// Exchanges the authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<TokenGrant, OAuthError> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OAuthError::TokenExchange(format!("HTTP client error: {}", e)))?;

        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(TokenUrl::new(self.token_url.clone()).expect("valid token URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_url.clone()).expect("valid redirect URL"),
            );

        let pkce_verifier = PkceCodeVerifier::new(pkce_verifier.to_string());

        let token_result: PlatformTokenResponse = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("token exchange failed: {}", e)))?;

        Ok(TokenGrant {
            access_token: token_result.access_token().secret().clone(),
            expires_in_seconds: token_result.expires_in().map(|d| d.as_secs()),
        })
    }
}

/// OAuth flow errors.
#[derive(Debug)]
pub enum OAuthError {
    /// Configuration error.
    Configuration(String),
    /// Token exchange failed.
    TokenExchange(String),
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "token exchange error: {}", msg),
        }
    }
}

impl std::error::Error for OAuthError {}
