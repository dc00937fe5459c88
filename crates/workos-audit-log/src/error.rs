// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;
use workos_common_config::EnvError;
use workos_common_http::HttpError;

pub type Result<T> = std::result::Result<T, AuditLogError>;

#[derive(Error, Debug)]
pub enum AuditLogError {
	/// The event already holds the maximum number of metadata keys.
	#[error("attempted to add over {limit} properties to metadata")]
	MetadataCapacity { limit: usize },

	/// The event could not be encoded; nothing was sent.
	#[error("failed to serialize event: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The transport failed; the error is passed through as returned.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failure reported by an [`EventPublisher`](crate::EventPublisher).
#[derive(Error, Debug)]
pub enum TransportError {
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("API error: {0}")]
	Api(#[from] HttpError),

	/// Failure from a publisher that does not speak HTTP.
	#[error("transport error: {0}")]
	Other(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error(transparent)]
	Env(#[from] EnvError),

	#[error("invalid configuration: {0}")]
	Invalid(String),

	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capacity_error_names_limit() {
		let err = AuditLogError::MetadataCapacity { limit: 500 };
		assert_eq!(
			err.to_string(),
			"attempted to add over 500 properties to metadata"
		);
	}

	#[test]
	fn transport_error_is_transparent() {
		let err = AuditLogError::from(TransportError::Other("connection reset".to_string()));
		assert_eq!(err.to_string(), "transport error: connection reset");
	}
}
