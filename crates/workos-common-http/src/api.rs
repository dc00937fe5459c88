// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use url::Url;
use workos_common_config::SecretString;

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.workos.com";

/// Request timeout applied when a config does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Returns the endpoint with trailing slashes removed, or the default
/// endpoint when `endpoint` is empty.
pub fn normalize_endpoint(endpoint: &str) -> String {
	let trimmed = endpoint.trim().trim_end_matches('/');
	if trimmed.is_empty() {
		DEFAULT_ENDPOINT.to_string()
	} else {
		trimmed.to_string()
	}
}

/// An HTTP client bound to one API endpoint and API key.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	endpoint: String,
	api_key: SecretString,
}

impl ApiClient {
	/// Builds a client for `endpoint` with the given request timeout.
	pub fn new(
		endpoint: &str,
		api_key: SecretString,
		timeout: Duration,
	) -> Result<Self, reqwest::Error> {
		let http = crate::builder().timeout(timeout).build()?;
		Ok(Self::with_client(http, endpoint, api_key))
	}

	/// Wraps an already configured `reqwest` client.
	pub fn with_client(http: Client, endpoint: &str, api_key: SecretString) -> Self {
		Self {
			http,
			endpoint: normalize_endpoint(endpoint),
			api_key,
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn api_key(&self) -> &SecretString {
		&self.api_key
	}

	pub fn http(&self) -> &Client {
		&self.http
	}

	/// Joins `path` (which must start with `/`) onto the endpoint.
	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.endpoint, path)
	}

	/// Builds an endpoint URL from path segments, percent-encoding each one.
	///
	/// `["users", "a/b"]` becomes `{endpoint}/users/a%2Fb`.
	pub fn segments_url(&self, segments: &[&str]) -> Result<Url, url::ParseError> {
		let mut url = Url::parse(&self.endpoint)?;
		url
			.path_segments_mut()
			.map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	/// Starts a request to `path` carrying the bearer API key.
	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		self
			.http
			.request(method, self.url(path))
			.bearer_auth(self.api_key.expose())
	}

	/// Like [`ApiClient::request`] for an already built URL.
	pub fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
		self
			.http
			.request(method, url)
			.bearer_auth(self.api_key.expose())
	}
}
