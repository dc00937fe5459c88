// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use workos_common_config::{load_env, require_secret_env, SecretString};
use workos_common_http::DEFAULT_TIMEOUT;

use crate::error::ConfigError;

/// Configuration for [`UserManagementClient`](crate::UserManagementClient).
#[derive(Debug, Clone)]
pub struct UserManagementConfig {
	/// API key (wrapped to prevent logging). Also sent as the client secret
	/// of authentication requests.
	pub api_key: SecretString,
	/// Client id used by the authentication flows. The other operations do
	/// not need it.
	pub client_id: Option<String>,
	/// API endpoint; an empty value selects the production endpoint.
	pub endpoint: String,
	pub timeout: Duration,
}

impl UserManagementConfig {
	pub fn new(api_key: impl Into<SecretString>) -> Self {
		Self {
			api_key: api_key.into(),
			client_id: None,
			endpoint: String::new(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());
		self
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
	/// - `WORKOS_API_KEY` or `WORKOS_API_KEY_FILE` (required)
	/// - `WORKOS_CLIENT_ID`, falling back to `WORKOS_PROJECT_ID` (optional)
	/// - `WORKOS_ENDPOINT` (optional)
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut config = Self::new(require_secret_env("WORKOS_API_KEY")?);
		config.client_id = load_env("WORKOS_CLIENT_ID").or_else(|| load_env("WORKOS_PROJECT_ID"));
		if let Some(endpoint) = load_env("WORKOS_ENDPOINT") {
			config.endpoint = endpoint;
		}
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.api_key.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"api_key cannot be empty".to_string(),
			));
		}
		if matches!(self.client_id.as_deref(), Some("")) {
			return Err(ConfigError::InvalidConfig(
				"client_id cannot be empty when set".to_string(),
			));
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::InvalidConfig(
				"timeout must be positive".to_string(),
			));
		}
		Ok(())
	}
}
