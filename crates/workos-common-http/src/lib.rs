// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the WorkOS clients.
//!
//! This crate provides:
//! - A pre-configured `reqwest` client with the SDK User-Agent header
//! - [`ApiClient`], which pairs that client with an endpoint and API key
//! - [`HttpError`], the decoded form of a non-success API response

mod api;
mod client;
mod error;

pub use api::{normalize_endpoint, ApiClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use client::{builder, user_agent, SDK_NAME, SDK_VERSION};
pub use error::{ensure_success, HttpError, REQUEST_ID_HEADER};
