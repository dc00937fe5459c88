// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cursor pagination for list endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page size used when none is requested.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size the API accepts.
pub const MAX_LIMIT: u32 = 100;

/// Cursors returned alongside a page of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
	/// Cursor for the page before this one.
	#[serde(default)]
	pub before: Option<String>,
	/// Cursor for the page after this one.
	#[serde(default)]
	pub after: Option<String>,
}

impl ListMetadata {
	/// True when there is a further page in the `after` direction.
	pub fn has_more(&self) -> bool {
		self.after.as_deref().is_some_and(|c| !c.is_empty())
	}
}

/// Sort order of list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
	Asc,
	#[default]
	Desc,
}

impl Order {
	pub fn as_str(&self) -> &'static str {
		match self {
			Order::Asc => "asc",
			Order::Desc => "desc",
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Pagination options for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationParams {
	/// Page size; clamped to `1..=MAX_LIMIT`, [`DEFAULT_LIMIT`] when unset.
	pub limit: Option<u32>,
	pub order: Option<Order>,
	/// Return records before this id.
	pub before: Option<String>,
	/// Return records after this id.
	pub after: Option<String>,
}

impl PaginationParams {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn order(mut self, order: Order) -> Self {
		self.order = Some(order);
		self
	}

	pub fn before(mut self, cursor: impl Into<String>) -> Self {
		self.before = Some(cursor.into());
		self
	}

	pub fn after(mut self, cursor: impl Into<String>) -> Self {
		self.after = Some(cursor.into());
		self
	}

	/// Parameters for the page following `metadata`, keeping limit and order.
	pub fn next_page(&self, metadata: &ListMetadata) -> Option<Self> {
		let after = metadata.after.clone().filter(|c| !c.is_empty())?;
		Some(Self {
			before: None,
			after: Some(after),
			..self.clone()
		})
	}

	pub fn effective_limit(&self) -> u32 {
		self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
	}

	/// Query pairs for the request. `limit` is always present; the other
	/// parameters only when set to a non-empty value.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("limit", self.effective_limit().to_string())];
		if let Some(order) = self.order {
			pairs.push(("order", order.to_string()));
		}
		if let Some(before) = self.before.as_deref().filter(|c| !c.is_empty()) {
			pairs.push(("before", before.to_string()));
		}
		if let Some(after) = self.after.as_deref().filter(|c| !c.is_empty()) {
			pairs.push(("after", after.to_string()));
		}
		pairs
	}
}
