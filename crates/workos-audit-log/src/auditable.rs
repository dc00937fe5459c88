// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// Something that can appear in the audit log as an actor, target, group or
/// metadata value.
pub trait Auditable {
	/// Human-readable name, e.g. an email address.
	fn auditable_name(&self) -> String;

	/// Stable identifier, e.g. `user_01H...`.
	fn auditable_id(&self) -> String;
}

impl<T: Auditable + ?Sized> Auditable for Box<T> {
	fn auditable_name(&self) -> String {
		(**self).auditable_name()
	}

	fn auditable_id(&self) -> String {
		(**self).auditable_id()
	}
}

/// A plain name/id pair for callers without a domain type to hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
	pub name: String,
	pub id: String,
}

impl Entity {
	pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			id: id.into(),
		}
	}

	/// Captures the current name and id of any auditable value.
	pub fn snapshot<A: Auditable + ?Sized>(value: &A) -> Self {
		Self::new(value.auditable_name(), value.auditable_id())
	}
}

impl Auditable for Entity {
	fn auditable_name(&self) -> String {
		self.name.clone()
	}

	fn auditable_id(&self) -> String {
		self.id.clone()
	}
}
