// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request options and response types for the `/users` API.
//!
//! Option structs serialize directly into request bodies. Secret fields
//! (passwords, codes, tokens) are held as [`SecretString`] and exposed only
//! at serialization time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use workos_common_config::SecretString;
use workos_common_core::{ListMetadata, PaginationParams};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(secret.expose())
}

fn expose_opt<S: Serializer>(
	secret: &Option<SecretString>,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	match secret {
		Some(secret) => serializer.serialize_some(secret.expose()),
		None => serializer.serialize_none(),
	}
}

fn is_false(value: &bool) -> bool {
	!*value
}

// =============================================================================
// Users
// =============================================================================

/// Whether a user is managed by an identity provider or by WorkOS itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
	Unmanaged,
	Managed,
}

impl UserType {
	pub fn as_str(&self) -> &'static str {
		match self {
			UserType::Unmanaged => "unmanaged",
			UserType::Managed => "managed",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: String,
	pub user_type: UserType,
	pub email: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	/// Set once the email address has been verified.
	#[serde(default)]
	pub email_verified_at: Option<DateTime<Utc>>,
	/// SSO profile backing a managed user.
	#[serde(default)]
	pub sso_profile_id: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Filters and pagination for [`list_users`](crate::UserManagementClient::list_users).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersOpts {
	pub user_type: Option<UserType>,
	pub email: Option<String>,
	/// Organization id the users must belong to.
	pub organization: Option<String>,
	pub pagination: PaginationParams,
}

impl ListUsersOpts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn user_type(mut self, user_type: UserType) -> Self {
		self.user_type = Some(user_type);
		self
	}

	pub fn email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn organization(mut self, organization: impl Into<String>) -> Self {
		self.organization = Some(organization.into());
		self
	}

	pub fn pagination(mut self, pagination: PaginationParams) -> Self {
		self.pagination = pagination;
		self
	}

	/// Query parameters: filters that are set, then pagination.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();
		if let Some(user_type) = self.user_type {
			pairs.push(("type", user_type.as_str().to_string()));
		}
		if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
			pairs.push(("email", email.to_string()));
		}
		if let Some(organization) = self.organization.as_deref().filter(|o| !o.is_empty()) {
			pairs.push(("organization", organization.to_string()));
		}
		pairs.extend(self.pagination.query_pairs());
		pairs
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListUsersResponse {
	pub data: Vec<User>,
	#[serde(default)]
	pub list_metadata: ListMetadata,
}

impl ListUsersResponse {
	/// Options for the page after this one, keeping the same filters.
	pub fn next_page(&self, opts: &ListUsersOpts) -> Option<ListUsersOpts> {
		let pagination = opts.pagination.next_page(&self.list_metadata)?;
		Some(opts.clone().pagination(pagination))
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserOpts {
	pub email: String,
	#[serde(serialize_with = "expose_opt", skip_serializing_if = "Option::is_none")]
	pub password: Option<SecretString>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	#[serde(skip_serializing_if = "is_false")]
	pub email_verified: bool,
}

impl CreateUserOpts {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: None,
			first_name: None,
			last_name: None,
			email_verified: false,
		}
	}

	pub fn password(mut self, password: impl Into<SecretString>) -> Self {
		self.password = Some(password.into());
		self
	}

	pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
		self.first_name = Some(first_name.into());
		self
	}

	pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
		self.last_name = Some(last_name.into());
		self
	}

	pub fn email_verified(mut self, verified: bool) -> Self {
		self.email_verified = verified;
		self
	}
}

/// Fields to change on a user; unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserOpts {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddUserToOrganizationOpts {
	#[serde(skip)]
	pub user_id: String,
	pub organization_id: String,
}

impl AddUserToOrganizationOpts {
	pub fn new(user_id: impl Into<String>, organization_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			organization_id: organization_id.into(),
		}
	}
}

// =============================================================================
// Authentication
// =============================================================================

/// Client details and session settings shared by every authentication flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ip_address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
	/// Ask WorkOS to create a session for the user.
	#[serde(skip_serializing_if = "is_false")]
	pub start_session: bool,
	/// Session lifetime in minutes; only meaningful with `start_session`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u32>,
}

impl SessionOptions {
	pub fn start_session(mut self, expires_in: Option<u32>) -> Self {
		self.start_session = true;
		self.expires_in = expires_in;
		self
	}

	pub fn client(mut self, ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
		self.ip_address = Some(ip_address.into());
		self.user_agent = Some(user_agent.into());
		self
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateWithPasswordOpts {
	pub email: String,
	#[serde(serialize_with = "expose")]
	pub password: SecretString,
	#[serde(flatten)]
	pub session: SessionOptions,
}

impl AuthenticateWithPasswordOpts {
	pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
			session: SessionOptions::default(),
		}
	}

	pub fn session(mut self, session: SessionOptions) -> Self {
		self.session = session;
		self
	}
}

/// Authorization code from an OAuth or SSO redirect.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateWithCodeOpts {
	#[serde(serialize_with = "expose")]
	pub code: SecretString,
	#[serde(flatten)]
	pub session: SessionOptions,
}

impl AuthenticateWithCodeOpts {
	pub fn new(code: impl Into<SecretString>) -> Self {
		Self {
			code: code.into(),
			session: SessionOptions::default(),
		}
	}

	pub fn session(mut self, session: SessionOptions) -> Self {
		self.session = session;
		self
	}
}

/// One-time code sent by [`send_magic_auth_code`](crate::UserManagementClient::send_magic_auth_code).
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateWithMagicAuthOpts {
	#[serde(serialize_with = "expose")]
	pub code: SecretString,
	pub magic_auth_challenge_id: String,
	#[serde(flatten)]
	pub session: SessionOptions,
}

impl AuthenticateWithMagicAuthOpts {
	pub fn new(code: impl Into<SecretString>, magic_auth_challenge_id: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			magic_auth_challenge_id: magic_auth_challenge_id.into(),
			session: SessionOptions::default(),
		}
	}

	pub fn session(mut self, session: SessionOptions) -> Self {
		self.session = session;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
	pub id: String,
	pub token: SecretString,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticationResponse {
	pub user: User,
	/// Present when a session was requested.
	#[serde(default)]
	pub session: Option<Session>,
}

// =============================================================================
// Verification and password reset
// =============================================================================

/// A user paired with the token WorkOS emailed them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeResponse {
	pub user: User,
	pub token: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompleteEmailVerificationOpts {
	#[serde(serialize_with = "expose")]
	pub token: SecretString,
}

impl CompleteEmailVerificationOpts {
	pub fn new(token: impl Into<SecretString>) -> Self {
		Self {
			token: token.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePasswordResetChallengeOpts {
	pub email: String,
	/// Page the emailed link points at; WorkOS appends the token.
	pub password_reset_url: String,
}

impl CreatePasswordResetChallengeOpts {
	pub fn new(email: impl Into<String>, password_reset_url: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password_reset_url: password_reset_url.into(),
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletePasswordResetOpts {
	#[serde(serialize_with = "expose")]
	pub token: SecretString,
	#[serde(serialize_with = "expose")]
	pub new_password: SecretString,
}

impl CompletePasswordResetOpts {
	pub fn new(token: impl Into<SecretString>, new_password: impl Into<SecretString>) -> Self {
		Self {
			token: token.into(),
			new_password: new_password.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMagicAuthCodeOpts {
	pub email_address: String,
}

impl SendMagicAuthCodeOpts {
	pub fn new(email_address: impl Into<String>) -> Self {
		Self {
			email_address: email_address.into(),
		}
	}
}
