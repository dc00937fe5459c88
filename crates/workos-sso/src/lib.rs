// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! WorkOS single sign-on.
//!
//! SSO is an OAuth 2.0 style authorization code flow brokered by WorkOS:
//!
//! 1. **Authorization URL**: build a URL for the user's domain or identity
//!    provider and redirect the user-agent to it.
//!
//! 2. **Callback**: after authenticating with the identity provider, the user
//!    is sent back to the configured `redirect_uri` with a `code` (and the
//!    `state` you supplied, if any).
//!
//! 3. **Profile exchange**: exchange the code for the user's [`Profile`].
//!
//! # Example
//!
//! ```rust,no_run
//! use workos_sso::{AuthorizationUrlOptions, GetProfileOptions, SsoClient, SsoConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SsoClient::new(SsoConfig::from_env()?)?;
//!
//! let url = client.authorization_url(
//!     &AuthorizationUrlOptions::for_domain("example.com").with_state("csrf-token"),
//! )?;
//! // Redirect the user to `url`, then in the callback handler:
//!
//! let profile = client
//!     .get_profile(&GetProfileOptions::new("code-from-callback"))
//!     .await?;
//! println!("{} signed in via {}", profile.email, profile.connection_type);
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The API key is wrapped in [`SecretString`] and never logged.
//! - Tracing instrumentation skips authorization codes.
//! - Always compare the `state` returned to the callback with the one you
//!   generated.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use workos_common_config::{load_env, require_env, require_secret_env, EnvError, SecretString};
use workos_common_http::{ensure_success, normalize_endpoint, ApiClient, HttpError, DEFAULT_TIMEOUT};

const AUTHORIZE_PATH: &str = "/sso/authorize";
const TOKEN_PATH: &str = "/sso/token";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error(transparent)]
	Env(#[from] EnvError),

	/// A configuration value was empty or invalid.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Errors that can occur during SSO operations.
#[derive(Debug, thiserror::Error)]
pub enum SsoError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Neither a domain nor a provider was given for the authorization URL.
	#[error("incomplete arguments: missing domain or provider")]
	IncompleteArguments,

	/// The configured endpoint does not form a valid URL.
	#[error("invalid endpoint URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// The HTTP request failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// WorkOS returned a non-success response (expired code, bad key, etc.).
	#[error("WorkOS API error: {0}")]
	Api(#[from] HttpError),

	/// The response could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),
}

pub type Result<T> = std::result::Result<T, SsoError>;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the SSO client.
#[derive(Debug, Clone)]
pub struct SsoConfig {
	/// WorkOS API key, sent as the client secret (wrapped to prevent logging).
	pub api_key: SecretString,
	/// WorkOS project id, sent as the OAuth client id.
	pub project_id: String,
	/// Callback URL the user-agent is redirected to after authorization.
	pub redirect_uri: String,
	/// API endpoint; an empty value selects the production endpoint.
	pub endpoint: String,
	pub timeout: Duration,
}

impl SsoConfig {
	pub fn new(
		api_key: impl Into<SecretString>,
		project_id: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			api_key: api_key.into(),
			project_id: project_id.into(),
			redirect_uri: redirect_uri.into(),
			endpoint: String::new(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `WORKOS_API_KEY` or `WORKOS_API_KEY_FILE` (required)
	/// - `WORKOS_PROJECT_ID`, falling back to `WORKOS_CLIENT_ID` (required)
	/// - `WORKOS_REDIRECT_URI` (required)
	/// - `WORKOS_ENDPOINT` (optional)
	pub fn from_env() -> std::result::Result<Self, ConfigError> {
		let api_key = require_secret_env("WORKOS_API_KEY")?;
		let project_id = match load_env("WORKOS_PROJECT_ID") {
			Some(id) => id,
			None => require_env("WORKOS_CLIENT_ID")
				.map_err(|_| EnvError::Missing("WORKOS_PROJECT_ID".to_string()))?,
		};
		let redirect_uri = require_env("WORKOS_REDIRECT_URI")?;

		let mut config = Self::new(api_key, project_id, redirect_uri);
		if let Some(endpoint) = load_env("WORKOS_ENDPOINT") {
			config.endpoint = endpoint;
		}
		Ok(config)
	}

	/// Validate that all required fields are non-empty.
	pub fn validate(&self) -> std::result::Result<(), ConfigError> {
		if self.api_key.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"api_key cannot be empty".to_string(),
			));
		}
		if self.project_id.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"project_id cannot be empty".to_string(),
			));
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"redirect_uri cannot be empty".to_string(),
			));
		}
		Ok(())
	}
}

// =============================================================================
// Types
// =============================================================================

/// Identity provider connection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
	#[serde(rename = "ADFSSAML")]
	AdfsSaml,
	#[serde(rename = "AzureSAML")]
	AzureSaml,
	#[serde(rename = "GoogleOAuth")]
	GoogleOAuth,
	#[serde(rename = "OktaSAML")]
	OktaSaml,
}

impl ConnectionType {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConnectionType::AdfsSaml => "ADFSSAML",
			ConnectionType::AzureSaml => "AzureSAML",
			ConnectionType::GoogleOAuth => "GoogleOAuth",
			ConnectionType::OktaSaml => "OktaSAML",
		}
	}
}

impl fmt::Display for ConnectionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Options for [`SsoClient::authorization_url`].
///
/// At least one of `domain` and `provider` must be set; empty strings count
/// as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationUrlOptions {
	/// The organization's domain without protocol, e.g. `example.com`.
	pub domain: Option<String>,
	/// Identity provider; currently only meaningful for
	/// [`ConnectionType::GoogleOAuth`].
	pub provider: Option<ConnectionType>,
	/// Opaque value echoed back to the redirect URI.
	pub state: Option<String>,
}

impl AuthorizationUrlOptions {
	pub fn for_domain(domain: impl Into<String>) -> Self {
		Self {
			domain: Some(domain.into()),
			..Self::default()
		}
	}

	pub fn for_provider(provider: ConnectionType) -> Self {
		Self {
			provider: Some(provider),
			..Self::default()
		}
	}

	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());
		self
	}
}

/// Options for [`SsoClient::get_profile`].
#[derive(Clone, PartialEq, Eq)]
pub struct GetProfileOptions {
	/// Authorization code from the callback.
	pub code: String,
}

impl GetProfileOptions {
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: code.into() }
	}
}

impl fmt::Debug for GetProfileOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GetProfileOptions")
			.field("code", &workos_common_config::REDACTED)
			.finish()
	}
}

/// The user that authenticated through SSO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub id: String,
	/// Identifier of the user at the identity provider.
	pub idp_id: String,
	pub connection_type: ConnectionType,
	pub email: String,
	/// May be empty.
	#[serde(default)]
	pub first_name: String,
	/// May be empty.
	#[serde(default)]
	pub last_name: String,
}

#[derive(Deserialize)]
struct ProfileResponse {
	profile: Profile,
	// Part of the response; profile exchange does not hand it out.
	#[allow(dead_code)]
	access_token: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Client for the WorkOS SSO endpoints.
#[derive(Debug, Clone)]
pub struct SsoClient {
	api: ApiClient,
	project_id: String,
	redirect_uri: String,
	authorize_url: Url,
	token_url: Url,
}

impl SsoClient {
	/// Create a client, validating the configuration and deriving the
	/// endpoint URLs once.
	#[tracing::instrument(skip_all, name = "SsoClient::new")]
	pub fn new(config: SsoConfig) -> Result<Self> {
		config.validate()?;

		let endpoint = normalize_endpoint(&config.endpoint);
		let authorize_url = Url::parse(&format!("{endpoint}{AUTHORIZE_PATH}"))?;
		let token_url = Url::parse(&format!("{endpoint}{TOKEN_PATH}"))?;
		let api = ApiClient::new(&endpoint, config.api_key, config.timeout)?;

		Ok(Self {
			api,
			project_id: config.project_id,
			redirect_uri: config.redirect_uri,
			authorize_url,
			token_url,
		})
	}

	pub fn endpoint(&self) -> &str {
		self.api.endpoint()
	}

	/// Build the URL that starts an SSO authorization.
	///
	/// The query carries `client_id`, `redirect_uri`, `response_type=code`,
	/// then `provider`, `domain` and `state` when set.
	///
	/// # Errors
	///
	/// Returns [`SsoError::IncompleteArguments`] when neither a domain nor a
	/// provider is set.
	#[tracing::instrument(skip(self), fields(client_id = %self.project_id))]
	pub fn authorization_url(&self, opts: &AuthorizationUrlOptions) -> Result<Url> {
		let domain = opts.domain.as_deref().filter(|d| !d.is_empty());
		let state = opts.state.as_deref().filter(|s| !s.is_empty());
		if domain.is_none() && opts.provider.is_none() {
			return Err(SsoError::IncompleteArguments);
		}

		let mut url = self.authorize_url.clone();
		{
			let mut query = url.query_pairs_mut();
			query
				.append_pair("client_id", &self.project_id)
				.append_pair("redirect_uri", &self.redirect_uri)
				.append_pair("response_type", "code");
			if let Some(provider) = opts.provider {
				query.append_pair("provider", provider.as_str());
			}
			if let Some(domain) = domain {
				query.append_pair("domain", domain);
			}
			if let Some(state) = state {
				query.append_pair("state", state);
			}
		}
		Ok(url)
	}

	/// Exchange an authorization code for the authenticated user's profile.
	///
	/// # Errors
	///
	/// - [`SsoError::HttpRequest`]: network error or timeout.
	/// - [`SsoError::Api`]: WorkOS rejected the exchange.
	/// - [`SsoError::ParseError`]: unexpected response format.
	#[tracing::instrument(skip(self, opts), name = "SsoClient::get_profile")]
	pub async fn get_profile(&self, opts: &GetProfileOptions) -> Result<Profile> {
		tracing::debug!("exchanging authorization code for profile");

		let response = self
			.api
			.http()
			.post(self.token_url.clone())
			.query(&[
				("client_id", self.project_id.as_str()),
				("client_secret", self.api.api_key().expose()),
				("grant_type", "authorization_code"),
				("code", opts.code.as_str()),
			])
			.send()
			.await?;

		let body = ensure_success(response).await?.text().await?;
		let decoded: ProfileResponse = serde_json::from_str(&body)
			.map_err(|e| SsoError::ParseError(format!("failed to parse profile response: {e}")))?;

		tracing::debug!(profile_id = %decoded.profile.id, "profile retrieved");
		Ok(decoded.profile)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::HashMap;
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn config(endpoint: &str) -> SsoConfig {
		SsoConfig::new("sk_test_123", "project_123", "https://example.com/callback")
			.with_endpoint(endpoint)
	}

	fn client() -> SsoClient {
		SsoClient::new(config("https://api.workos.test/")).unwrap()
	}

	fn query(url: &Url) -> HashMap<String, String> {
		url.query_pairs().into_owned().collect()
	}

	mod config_tests {
		use super::*;

		#[test]
		fn validate_rejects_empty_fields() {
			assert!(config("").validate().is_ok());

			let mut c = config("");
			c.project_id.clear();
			assert!(c.validate().unwrap_err().to_string().contains("project_id"));

			let mut c = config("");
			c.redirect_uri.clear();
			assert!(c.validate().unwrap_err().to_string().contains("redirect_uri"));

			let c = SsoConfig::new("", "project_123", "https://example.com/callback");
			assert!(matches!(
				SsoClient::new(c),
				Err(SsoError::Config(ConfigError::InvalidConfig(_)))
			));
		}

		#[test]
		fn empty_endpoint_uses_production() {
			let client = SsoClient::new(config("")).unwrap();
			assert_eq!(client.endpoint(), "https://api.workos.com");
		}

		#[test]
		fn config_debug_redacts_api_key() {
			let debug = format!("{:?}", config(""));
			assert!(!debug.contains("sk_test_123"));
		}
	}

	mod connection_type {
		use super::*;

		#[test]
		fn wire_names() {
			let cases = [
				(ConnectionType::AdfsSaml, "ADFSSAML"),
				(ConnectionType::AzureSaml, "AzureSAML"),
				(ConnectionType::GoogleOAuth, "GoogleOAuth"),
				(ConnectionType::OktaSaml, "OktaSAML"),
			];
			for (kind, name) in cases {
				assert_eq!(kind.to_string(), name);
				assert_eq!(serde_json::to_value(kind).unwrap(), name);
				assert_eq!(
					serde_json::from_value::<ConnectionType>(name.into()).unwrap(),
					kind
				);
			}
		}
	}

	mod authorization_url {
		use super::*;

		#[test]
		fn with_domain_and_state() {
			let url = client()
				.authorization_url(&AuthorizationUrlOptions::for_domain("lyft.com").with_state("st_1"))
				.unwrap();

			assert_eq!(url.scheme(), "https");
			assert_eq!(url.host_str(), Some("api.workos.test"));
			assert_eq!(url.path(), "/sso/authorize");

			let q = query(&url);
			assert_eq!(q["client_id"], "project_123");
			assert_eq!(q["redirect_uri"], "https://example.com/callback");
			assert_eq!(q["response_type"], "code");
			assert_eq!(q["domain"], "lyft.com");
			assert_eq!(q["state"], "st_1");
			assert!(!q.contains_key("provider"));
		}

		#[test]
		fn with_provider_only() {
			let url = client()
				.authorization_url(&AuthorizationUrlOptions::for_provider(
					ConnectionType::GoogleOAuth,
				))
				.unwrap();

			let q = query(&url);
			assert_eq!(q["provider"], "GoogleOAuth");
			assert!(!q.contains_key("domain"));
			assert!(!q.contains_key("state"));
		}

		#[test]
		fn requires_domain_or_provider() {
			let err = client()
				.authorization_url(&AuthorizationUrlOptions::default().with_state("s"))
				.unwrap_err();
			assert!(matches!(err, SsoError::IncompleteArguments));
			assert_eq!(
				err.to_string(),
				"incomplete arguments: missing domain or provider"
			);
		}

		#[test]
		fn empty_domain_counts_as_missing() {
			let err = client()
				.authorization_url(&AuthorizationUrlOptions::for_domain(""))
				.unwrap_err();
			assert!(matches!(err, SsoError::IncompleteArguments));
		}
	}

	mod get_profile {
		use super::*;

		#[tokio::test]
		async fn exchanges_code_for_profile() {
			let server = MockServer::start().await;
			Mock::given(method("POST"))
				.and(path("/sso/token"))
				.and(query_param("client_id", "project_123"))
				.and(query_param("client_secret", "sk_test_123"))
				.and(query_param("grant_type", "authorization_code"))
				.and(query_param("code", "authorization_code"))
				.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
					"profile": {
						"id": "proj_123",
						"idp_id": "123",
						"connection_type": "OktaSAML",
						"email": "foo@test.com",
						"first_name": "foo",
						"last_name": "bar",
					},
					"access_token": "01DVX6QBS3EG6FHY2ESAA5Q65X",
				})))
				.expect(1)
				.mount(&server)
				.await;

			let client = SsoClient::new(config(&server.uri())).unwrap();
			let profile = client
				.get_profile(&GetProfileOptions::new("authorization_code"))
				.await
				.unwrap();

			assert_eq!(
				profile,
				Profile {
					id: "proj_123".to_string(),
					idp_id: "123".to_string(),
					connection_type: ConnectionType::OktaSaml,
					email: "foo@test.com".to_string(),
					first_name: "foo".to_string(),
					last_name: "bar".to_string(),
				}
			);
		}

		#[tokio::test]
		async fn rejected_code_is_api_error() {
			let server = MockServer::start().await;
			Mock::given(method("POST"))
				.and(path("/sso/token"))
				.respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
					"error": "invalid_grant",
					"error_description": "The code 'abc' has expired or is invalid.",
				})))
				.mount(&server)
				.await;

			let client = SsoClient::new(config(&server.uri())).unwrap();
			let err = client
				.get_profile(&GetProfileOptions::new("abc"))
				.await
				.unwrap_err();

			match err {
				SsoError::Api(api) => {
					assert_eq!(api.status, 400);
					assert_eq!(api.message, "The code 'abc' has expired or is invalid.");
				}
				other => panic!("unexpected error: {other:?}"),
			}
		}

		#[tokio::test]
		async fn malformed_body_is_parse_error() {
			let server = MockServer::start().await;
			Mock::given(method("POST"))
				.and(path("/sso/token"))
				.respond_with(ResponseTemplate::new(200).set_body_string("{\"profile\": 42}"))
				.mount(&server)
				.await;

			let client = SsoClient::new(config(&server.uri())).unwrap();
			let err = client
				.get_profile(&GetProfileOptions::new("abc"))
				.await
				.unwrap_err();
			assert!(matches!(err, SsoError::ParseError(_)));
		}

		#[test]
		fn options_debug_redacts_code() {
			let debug = format!("{:?}", GetProfileOptions::new("secret_code"));
			assert!(!debug.contains("secret_code"));
		}
	}

	proptest! {
		#[test]
		fn state_and_domain_survive_encoding(state in ".{1,64}", domain in "[a-z0-9.-]{1,40}") {
			let url = client()
				.authorization_url(&AuthorizationUrlOptions::for_domain(domain.clone()).with_state(state.clone()))
				.unwrap();
			let q = query(&url);
			prop_assert_eq!(&q["state"], &state);
			prop_assert_eq!(&q["domain"], &domain);
			prop_assert_eq!(url.path(), "/sso/authorize");
		}
	}
}
