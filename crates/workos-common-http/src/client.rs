// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client with a consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// SDK name reported in the User-Agent header.
pub const SDK_NAME: &str = "workos-rust";
/// SDK version reported in the User-Agent header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a client builder carrying the SDK User-Agent header.
///
/// # Example
/// ```ignore
/// let client = workos_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the User-Agent string, `workos-rust/{version}`.
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts, vec![SDK_NAME, SDK_VERSION]);
	}

	#[test]
	fn builder_builds() {
		assert!(builder().build().is_ok());
	}
}
