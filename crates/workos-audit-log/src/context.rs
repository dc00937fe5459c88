// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where an event comes from: the local host or an inbound HTTP request.

use std::io;
use std::net::SocketAddr;

use http::{HeaderMap, Method};

/// Resolves the name of the local host.
pub trait HostnameResolver {
	fn hostname(&self) -> io::Result<String>;
}

/// Resolves the hostname through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
	fn hostname(&self) -> io::Result<String> {
		hostname::get()?.into_string().map_err(|raw| {
			io::Error::new(
				io::ErrorKind::InvalidData,
				format!("hostname is not valid UTF-8: {raw:?}"),
			)
		})
	}
}

/// The parts of an inbound HTTP request recorded on an event.
pub trait RequestContext {
	/// Address of the peer, typically `ip:port`. Empty when unknown.
	fn remote_addr(&self) -> String;

	fn method(&self) -> String;

	fn url(&self) -> String;

	/// Value of the named header, `None` when missing, empty or not UTF-8.
	fn header(&self, name: &str) -> Option<String>;
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get(name)
		.and_then(|v| v.to_str().ok())
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}

/// Reads the peer address from a [`SocketAddr`] request extension, which is
/// how servers such as hyper and axum (`ConnectInfo`) attach it.
impl<B> RequestContext for http::Request<B> {
	fn remote_addr(&self) -> String {
		self
			.extensions()
			.get::<SocketAddr>()
			.map(ToString::to_string)
			.unwrap_or_default()
	}

	fn method(&self) -> String {
		http::Request::method(self).as_str().to_string()
	}

	fn url(&self) -> String {
		self.uri().to_string()
	}

	fn header(&self, name: &str) -> Option<String> {
		header_value(self.headers(), name)
	}
}

/// An owned request description, for frameworks without `http::Request`.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
	pub remote_addr: String,
	pub method: Method,
	pub url: String,
	pub headers: HeaderMap,
}

impl RequestInfo {
	pub fn new(remote_addr: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
		Self {
			remote_addr: remote_addr.into(),
			method,
			url: url.into(),
			headers: HeaderMap::new(),
		}
	}

	/// Adds a header; invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			http::header::HeaderName::from_bytes(name.as_bytes()),
			http::header::HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}
}

impl RequestContext for RequestInfo {
	fn remote_addr(&self) -> String {
		self.remote_addr.clone()
	}

	fn method(&self) -> String {
		self.method.as_str().to_string()
	}

	fn url(&self) -> String {
		self.url.clone()
	}

	fn header(&self, name: &str) -> Option<String> {
		header_value(&self.headers, name)
	}
}
