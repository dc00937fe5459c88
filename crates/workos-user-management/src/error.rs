// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;
use workos_common_config::EnvError;
use workos_common_http::HttpError;

pub type Result<T> = std::result::Result<T, UserManagementError>;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error(transparent)]
	Env(#[from] EnvError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

#[derive(Error, Debug)]
pub enum UserManagementError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// An argument was rejected before any request was sent.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("invalid request URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	#[error("WorkOS API error: {0}")]
	Api(#[from] HttpError),

	#[error("failed to parse response: {0}")]
	ParseError(String),
}

impl UserManagementError {
	/// HTTP status of an API error, if this is one.
	pub fn status(&self) -> Option<u16> {
		match self {
			UserManagementError::Api(err) => Some(err.status),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reqwest::StatusCode;

	#[test]
	fn status_only_for_api_errors() {
		let api = UserManagementError::from(HttpError::from_parts(StatusCode::NOT_FOUND, None, ""));
		assert_eq!(api.status(), Some(404));
		assert_eq!(api.to_string(), "WorkOS API error: 404: Not Found");

		let arg = UserManagementError::InvalidArgument("user id cannot be empty".to_string());
		assert_eq!(arg.status(), None);
	}
}
