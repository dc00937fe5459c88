// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of serialized events.
//!
//! [`EventPublisher`] is the transport seam; [`HttpEventPublisher`] posts to
//! the WorkOS ingestion endpoint and [`AuditLogClient`] pairs a publisher
//! with the [`DefaultMetadata`] merged into every event.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use workos_common_config::{load_env, require_secret_env, SecretString};
use workos_common_http::{ensure_success, ApiClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

use crate::error::{ConfigError, Result, TransportError};
use crate::event::Event;
use crate::metadata::DefaultMetadata;

/// Path of the event ingestion endpoint, relative to the API endpoint.
pub const EVENTS_PATH: &str = "/events";

/// Delivers one serialized event.
///
/// Implementations must not retry; a failure is reported to the caller as is.
#[async_trait]
pub trait EventPublisher: Send + Sync {
	async fn publish_event(&self, body: Vec<u8>) -> std::result::Result<(), TransportError>;
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
	async fn publish_event(&self, body: Vec<u8>) -> std::result::Result<(), TransportError> {
		(**self).publish_event(body).await
	}
}

/// Configuration for [`HttpEventPublisher`].
#[derive(Debug, Clone)]
pub struct HttpPublisherConfig {
	/// API key sent as a bearer token (wrapped to prevent logging).
	pub api_key: SecretString,
	/// API endpoint, without a trailing slash.
	pub endpoint: String,
	pub timeout: Duration,
}

impl HttpPublisherConfig {
	pub fn new(api_key: impl Into<SecretString>) -> Self {
		Self {
			api_key: api_key.into(),
			endpoint: DEFAULT_ENDPOINT.to_string(),
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
	/// - `WORKOS_API_KEY` or `WORKOS_API_KEY_FILE` (required)
	/// - `WORKOS_ENDPOINT` (optional, defaults to [`DEFAULT_ENDPOINT`])
	pub fn from_env() -> std::result::Result<Self, ConfigError> {
		let api_key = require_secret_env("WORKOS_API_KEY")?;
		let mut config = Self::new(api_key);
		if let Some(endpoint) = load_env("WORKOS_ENDPOINT") {
			config.endpoint = endpoint;
		}
		Ok(config)
	}

	pub fn validate(&self) -> std::result::Result<(), ConfigError> {
		if self.api_key.is_empty() {
			return Err(ConfigError::Invalid("api_key cannot be empty".to_string()));
		}
		if !self.endpoint.is_empty()
			&& !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://"))
		{
			return Err(ConfigError::Invalid(format!(
				"endpoint must be an http(s) URL: {}",
				self.endpoint
			)));
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::Invalid("timeout must be positive".to_string()));
		}
		Ok(())
	}
}

/// Publishes events with `POST /events`.
#[derive(Debug, Clone)]
pub struct HttpEventPublisher {
	api: ApiClient,
}

impl HttpEventPublisher {
	#[tracing::instrument(skip_all, name = "HttpEventPublisher::new")]
	pub fn new(config: HttpPublisherConfig) -> std::result::Result<Self, ConfigError> {
		config.validate()?;
		let api = ApiClient::new(&config.endpoint, config.api_key, config.timeout)?;
		Ok(Self { api })
	}

	/// Uses an existing API client, sharing its connection pool.
	pub fn with_api_client(api: ApiClient) -> Self {
		Self { api }
	}

	pub fn endpoint(&self) -> &str {
		self.api.endpoint()
	}
}

#[async_trait]
impl EventPublisher for HttpEventPublisher {
	#[tracing::instrument(skip(self, body), fields(bytes = body.len()))]
	async fn publish_event(&self, body: Vec<u8>) -> std::result::Result<(), TransportError> {
		let response = self
			.api
			.request(Method::POST, EVENTS_PATH)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await?;

		ensure_success(response).await?;
		tracing::debug!("audit event accepted");
		Ok(())
	}
}

/// A publisher paired with the default metadata for every event.
///
/// Cloning is cheap and clones share both the publisher and the defaults, so
/// one client can be created at startup and handed to every request handler.
#[derive(Debug)]
pub struct AuditLogClient<P: ?Sized = HttpEventPublisher> {
	defaults: Arc<DefaultMetadata>,
	publisher: Arc<P>,
}

impl<P: ?Sized> Clone for AuditLogClient<P> {
	fn clone(&self) -> Self {
		Self {
			defaults: Arc::clone(&self.defaults),
			publisher: Arc::clone(&self.publisher),
		}
	}
}

impl AuditLogClient<HttpEventPublisher> {
	pub fn from_config(
		config: HttpPublisherConfig,
		defaults: DefaultMetadata,
	) -> std::result::Result<Self, ConfigError> {
		Ok(Self::new(HttpEventPublisher::new(config)?, defaults))
	}
}

impl<P: EventPublisher> AuditLogClient<P> {
	pub fn new(publisher: P, defaults: DefaultMetadata) -> Self {
		Self {
			defaults: Arc::new(defaults),
			publisher: Arc::new(publisher),
		}
	}
}

impl<P: EventPublisher + ?Sized> AuditLogClient<P> {
	pub fn from_arc(publisher: Arc<P>, defaults: DefaultMetadata) -> Self {
		Self {
			defaults: Arc::new(defaults),
			publisher,
		}
	}

	pub fn defaults(&self) -> &DefaultMetadata {
		&self.defaults
	}

	pub fn publisher(&self) -> &P {
		&self.publisher
	}

	/// Publishes `event` merged with this client's defaults.
	#[tracing::instrument(skip_all, fields(action = %event.action()))]
	pub async fn publish(&self, event: &Event) -> Result<()> {
		event.publish(&*self.publisher, &self.defaults).await
	}
}
