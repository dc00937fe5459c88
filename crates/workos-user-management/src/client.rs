// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the WorkOS `/users` API.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;
use workos_common_http::{ensure_success, ApiClient};

use crate::config::UserManagementConfig;
use crate::error::{ConfigError, Result, UserManagementError};
use crate::types::{
	AddUserToOrganizationOpts, AuthenticateWithCodeOpts, AuthenticateWithMagicAuthOpts,
	AuthenticateWithPasswordOpts, AuthenticationResponse, ChallengeResponse,
	CompleteEmailVerificationOpts, CompletePasswordResetOpts, CreatePasswordResetChallengeOpts,
	CreateUserOpts, ListUsersOpts, ListUsersResponse, SendMagicAuthCodeOpts, UpdateUserOpts, User,
};

const GRANT_PASSWORD: &str = "password";
const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
const GRANT_MAGIC_AUTH: &str = "urn:workos:oauth:grant-type:magic-auth:code";

/// Body of `POST /users/authentications`: client credentials and grant type
/// around the flow specific fields.
#[derive(Serialize)]
struct AuthenticationRequest<'a, C: Serialize> {
	client_id: &'a str,
	client_secret: &'a str,
	grant_type: &'static str,
	#[serde(flatten)]
	credentials: &'a C,
}

#[derive(Serialize)]
struct UpdatePasswordRequest<'a> {
	password: &'a str,
}

fn require_id(what: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(UserManagementError::InvalidArgument(format!(
			"{what} cannot be empty"
		)));
	}
	Ok(())
}

/// Client for WorkOS user management.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UserManagementClient {
	api: ApiClient,
	client_id: Option<String>,
}

impl UserManagementClient {
	#[tracing::instrument(skip_all, name = "UserManagementClient::new")]
	pub fn new(config: UserManagementConfig) -> Result<Self> {
		config.validate()?;
		let api = ApiClient::new(&config.endpoint, config.api_key, config.timeout)?;
		Ok(Self {
			api,
			client_id: config.client_id,
		})
	}

	pub fn endpoint(&self) -> &str {
		self.api.endpoint()
	}

	fn url(&self, segments: &[&str]) -> Result<Url> {
		Ok(self.api.segments_url(segments)?)
	}

	fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
		debug!(%method, path = %segments.join("/"), "user management request");
		Ok(self.api.request_url(method, self.url(segments)?))
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
		let response = ensure_success(request.send().await?).await?;
		let body = response.text().await?;
		serde_json::from_str(&body).map_err(|e| {
			UserManagementError::ParseError(format!("failed to parse response body: {e}"))
		})
	}

	async fn authenticate<C: Serialize>(
		&self,
		grant_type: &'static str,
		credentials: &C,
	) -> Result<AuthenticationResponse> {
		let client_id = self.client_id.as_deref().ok_or_else(|| {
			ConfigError::InvalidConfig("client_id is required for authentication".to_string())
		})?;
		let body = AuthenticationRequest {
			client_id,
			client_secret: self.api.api_key().expose(),
			grant_type,
			credentials,
		};

		let request = self
			.request(Method::POST, &["users", "authentications"])?
			.json(&body);
		self.send(request).await
	}

	/// `GET /users/{id}`
	#[tracing::instrument(skip(self))]
	pub async fn get_user(&self, user_id: &str) -> Result<User> {
		require_id("user id", user_id)?;
		let request = self.request(Method::GET, &["users", user_id])?;
		self.send(request).await
	}

	/// `GET /users` with filters and cursor pagination.
	#[tracing::instrument(skip(self))]
	pub async fn list_users(&self, opts: &ListUsersOpts) -> Result<ListUsersResponse> {
		let request = self
			.request(Method::GET, &["users"])?
			.query(&opts.query_pairs());
		self.send(request).await
	}

	/// `POST /users`
	#[tracing::instrument(skip(self, opts), fields(email = %opts.email))]
	pub async fn create_user(&self, opts: &CreateUserOpts) -> Result<User> {
		let request = self.request(Method::POST, &["users"])?.json(opts);
		self.send(request).await
	}

	/// `PUT /users/{id}`
	#[tracing::instrument(skip(self))]
	pub async fn update_user(&self, user_id: &str, opts: &UpdateUserOpts) -> Result<User> {
		require_id("user id", user_id)?;
		let request = self.request(Method::PUT, &["users", user_id])?.json(opts);
		self.send(request).await
	}

	/// `PUT /users/{id}/password`
	#[tracing::instrument(skip(self, password))]
	pub async fn update_user_password(
		&self,
		user_id: &str,
		password: &workos_common_config::SecretString,
	) -> Result<User> {
		require_id("user id", user_id)?;
		let request = self
			.request(Method::PUT, &["users", user_id, "password"])?
			.json(&UpdatePasswordRequest {
				password: password.expose(),
			});
		self.send(request).await
	}

	/// `DELETE /users/{id}`
	#[tracing::instrument(skip(self))]
	pub async fn delete_user(&self, user_id: &str) -> Result<()> {
		require_id("user id", user_id)?;
		let request = self.request(Method::DELETE, &["users", user_id])?;
		ensure_success(request.send().await?).await?;
		Ok(())
	}

	/// `POST /users/{id}/organization_memberships`
	#[tracing::instrument(skip(self))]
	pub async fn add_user_to_organization(&self, opts: &AddUserToOrganizationOpts) -> Result<User> {
		require_id("user id", &opts.user_id)?;
		require_id("organization id", &opts.organization_id)?;
		let request = self
			.request(
				Method::POST,
				&["users", &opts.user_id, "organization_memberships"],
			)?
			.json(opts);
		self.send(request).await
	}

	/// `DELETE /users/{id}/organization_memberships/{organization_id}`
	#[tracing::instrument(skip(self))]
	pub async fn remove_user_from_organization(
		&self,
		user_id: &str,
		organization_id: &str,
	) -> Result<User> {
		require_id("user id", user_id)?;
		require_id("organization id", organization_id)?;
		let request = self.request(
			Method::DELETE,
			&["users", user_id, "organization_memberships", organization_id],
		)?;
		self.send(request).await
	}

	/// Authenticates with email and password, optionally starting a session.
	#[tracing::instrument(skip(self, opts), fields(email = %opts.email))]
	pub async fn authenticate_user_with_password(
		&self,
		opts: &AuthenticateWithPasswordOpts,
	) -> Result<AuthenticationResponse> {
		self.authenticate(GRANT_PASSWORD, opts).await
	}

	/// Authenticates an OAuth or SSO user with the code from the redirect.
	#[tracing::instrument(skip(self, opts))]
	pub async fn authenticate_user_with_code(
		&self,
		opts: &AuthenticateWithCodeOpts,
	) -> Result<AuthenticationResponse> {
		self.authenticate(GRANT_AUTHORIZATION_CODE, opts).await
	}

	/// Authenticates with a one-time code from
	/// [`send_magic_auth_code`](Self::send_magic_auth_code).
	#[tracing::instrument(skip(self, opts), fields(challenge = %opts.magic_auth_challenge_id))]
	pub async fn authenticate_user_with_magic_auth(
		&self,
		opts: &AuthenticateWithMagicAuthOpts,
	) -> Result<AuthenticationResponse> {
		self.authenticate(GRANT_MAGIC_AUTH, opts).await
	}

	/// Emails a verification token to the user.
	#[tracing::instrument(skip(self))]
	pub async fn create_email_verification_challenge(
		&self,
		user_id: &str,
	) -> Result<ChallengeResponse> {
		require_id("user id", user_id)?;
		let request = self.request(
			Method::POST,
			&["users", user_id, "email_verification_challenge"],
		)?;
		self.send(request).await
	}

	#[tracing::instrument(skip(self, opts))]
	pub async fn complete_email_verification(
		&self,
		opts: &CompleteEmailVerificationOpts,
	) -> Result<User> {
		let request = self
			.request(Method::POST, &["users", "email_verification"])?
			.json(opts);
		self.send(request).await
	}

	/// Emails a password reset link to an unmanaged user.
	#[tracing::instrument(skip(self, opts), fields(email = %opts.email))]
	pub async fn create_password_reset_challenge(
		&self,
		opts: &CreatePasswordResetChallengeOpts,
	) -> Result<ChallengeResponse> {
		let request = self
			.request(Method::POST, &["users", "password_reset_challenge"])?
			.json(opts);
		self.send(request).await
	}

	#[tracing::instrument(skip(self, opts))]
	pub async fn complete_password_reset(&self, opts: &CompletePasswordResetOpts) -> Result<User> {
		let request = self
			.request(Method::POST, &["users", "password_reset"])?
			.json(opts);
		self.send(request).await
	}

	/// Emails a one-time sign-in code.
	#[tracing::instrument(skip(self, opts), fields(email = %opts.email_address))]
	pub async fn send_magic_auth_code(&self, opts: &SendMagicAuthCodeOpts) -> Result<User> {
		let request = self
			.request(Method::POST, &["users", "magic_auth", "send"])?
			.json(opts);
		self.send(request).await
	}
}
