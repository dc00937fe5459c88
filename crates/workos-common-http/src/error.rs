// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decoding of non-success API responses.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Response header carrying the server-side request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// A non-success response returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}{}", request_id_suffix(.request_id))]
pub struct HttpError {
	/// HTTP status code.
	pub status: u16,
	/// Value of the `X-Request-ID` response header, if any.
	pub request_id: Option<String>,
	/// Error message extracted from the response body.
	pub message: String,
}

fn request_id_suffix(request_id: &Option<String>) -> String {
	match request_id {
		Some(id) => format!(" (request id: {id})"),
		None => String::new(),
	}
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
	message: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

impl HttpError {
	/// Builds an error from a status code and the raw response body.
	///
	/// The message is the first non-empty of the body's `message`,
	/// `error_description` and `error` fields, then the raw body, then the
	/// canonical reason phrase of the status.
	pub fn from_parts(status: StatusCode, request_id: Option<String>, body: &str) -> Self {
		let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
		let message = [parsed.message, parsed.error_description, parsed.error]
			.into_iter()
			.flatten()
			.find(|m| !m.is_empty())
			.or_else(|| {
				let raw = body.trim();
				(!raw.is_empty()).then(|| raw.to_string())
			})
			.unwrap_or_else(|| {
				status
					.canonical_reason()
					.unwrap_or("unknown error")
					.to_string()
			});

		Self {
			status: status.as_u16(),
			request_id,
			message,
		}
	}

	/// Consumes a response and decodes it into an error.
	pub async fn from_response(response: Response) -> Self {
		let status = response.status();
		let request_id = response
			.headers()
			.get(REQUEST_ID_HEADER)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		let body = response.text().await.unwrap_or_default();

		let err = Self::from_parts(status, request_id, &body);
		warn!(
			status = err.status,
			request_id = ?err.request_id,
			message = %err.message,
			"API request failed"
		);
		err
	}
}

/// Passes successful responses through and decodes everything else.
pub async fn ensure_success(response: Response) -> Result<Response, HttpError> {
	if response.status().is_success() {
		Ok(response)
	} else {
		Err(HttpError::from_response(response).await)
	}
}
