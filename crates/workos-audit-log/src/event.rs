// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The audit log event record.
//!
//! - [`ActionType`]: CRUD classification of an action
//! - [`Event`]: the record, its attach/metadata operations and publishing

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::auditable::Auditable;
use crate::context::{HostnameResolver, RequestContext, SystemHostname};
use crate::error::{AuditLogError, Result};
use crate::metadata::{id_key, name_key, DefaultMetadata, Metadata, MetadataValue, MAX_METADATA_KEYS};
use crate::publisher::EventPublisher;

/// The CRUD nature of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
	#[serde(rename = "C")]
	Create,
	#[serde(rename = "R")]
	Read,
	#[serde(rename = "U")]
	Update,
	#[serde(rename = "D")]
	Delete,
}

impl ActionType {
	/// Wire code: `C`, `R`, `U` or `D`.
	pub fn as_code(&self) -> &'static str {
		match self {
			ActionType::Create => "C",
			ActionType::Read => "R",
			ActionType::Update => "U",
			ActionType::Delete => "D",
		}
	}

	pub fn all() -> &'static [ActionType] {
		&[
			ActionType::Create,
			ActionType::Read,
			ActionType::Update,
			ActionType::Delete,
		]
	}
}

impl fmt::Display for ActionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_code())
	}
}

/// An audit log event.
///
/// Created with the action and its [`ActionType`], then filled in with the
/// attach operations in any order; the last write to a field wins. The
/// creation timestamp is fixed at construction.
///
/// An event is meant to be built and published by a single task. Publishing
/// does not consume or modify it, so publishing twice sends two records.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	group: String,
	action: String,
	action_type: ActionType,
	actor_name: String,
	actor_id: String,
	target_name: String,
	target_id: String,
	location: String,
	occured_at: DateTime<Utc>,
	metadata: Map<String, Value>,
	/// Keys whose value has no JSON encoding, with the reason. Disjoint from
	/// `metadata`; any entry here makes serialization fail.
	unencodable: BTreeMap<String, String>,
}

/// Wire representation. `occured_at` keeps the spelling the ingestion
/// endpoint expects.
#[derive(Serialize)]
struct WireEvent<'a> {
	group: &'a str,
	action: &'a str,
	action_type: ActionType,
	actor_name: &'a str,
	actor_id: &'a str,
	target_name: &'a str,
	target_id: &'a str,
	location: &'a str,
	#[serde(serialize_with = "serialize_micros")]
	occured_at: &'a DateTime<Utc>,
	metadata: &'a Map<String, Value>,
}

fn serialize_micros<S: Serializer>(
	timestamp: &&DateTime<Utc>,
	serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
	serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl Event {
	/// Creates an event located at the local hostname.
	pub fn new(action: impl Into<String>, action_type: ActionType) -> Self {
		Self::new_with_resolver(action, action_type, &SystemHostname)
	}

	/// Creates an event, resolving the location through `resolver`.
	///
	/// A resolver failure leaves the location empty.
	pub fn new_with_resolver<R: HostnameResolver + ?Sized>(
		action: impl Into<String>,
		action_type: ActionType,
		resolver: &R,
	) -> Self {
		let location = resolver.hostname().unwrap_or_else(|e| {
			debug!(error = %e, "hostname lookup failed, leaving event location empty");
			String::new()
		});

		Self {
			group: String::new(),
			action: action.into(),
			action_type,
			actor_name: String::new(),
			actor_id: String::new(),
			target_name: String::new(),
			target_id: String::new(),
			location,
			occured_at: Utc::now(),
			metadata: Map::new(),
			unencodable: BTreeMap::new(),
		}
	}

	/// Creates an event describing an inbound HTTP request.
	///
	/// The location is the request's remote address. Metadata is seeded with
	/// `http_method` and `request_url`, plus `user_agent` and `request_id`
	/// when the `User-Agent` / `X-Request-ID` headers are present.
	pub fn from_request<C: RequestContext + ?Sized>(
		action: impl Into<String>,
		action_type: ActionType,
		request: &C,
	) -> Self {
		let mut event = Self::new(action, action_type);
		event.apply_request(request);
		event
	}

	/// [`Event::from_request`] with an explicit hostname resolver.
	pub fn from_request_with_resolver<C, R>(
		action: impl Into<String>,
		action_type: ActionType,
		request: &C,
		resolver: &R,
	) -> Self
	where
		C: RequestContext + ?Sized,
		R: HostnameResolver + ?Sized,
	{
		let mut event = Self::new_with_resolver(action, action_type, resolver);
		event.apply_request(request);
		event
	}

	fn apply_request<C: RequestContext + ?Sized>(&mut self, request: &C) {
		self.set_location(request.remote_addr());

		// At most four keys on an empty map, well below the cap.
		self
			.metadata
			.insert("http_method".to_string(), Value::String(request.method()));
		self
			.metadata
			.insert("request_url".to_string(), Value::String(request.url()));
		if let Some(user_agent) = request.header("User-Agent") {
			self
				.metadata
				.insert("user_agent".to_string(), Value::String(user_agent));
		}
		if let Some(request_id) = request.header("X-Request-ID") {
			self
				.metadata
				.insert("request_id".to_string(), Value::String(request_id));
		}
	}

	/// Creates an event and adds `metadata` to it.
	pub fn with_metadata(
		action: impl Into<String>,
		action_type: ActionType,
		metadata: impl Into<Metadata>,
	) -> Result<Self> {
		let mut event = Self::new(action, action_type);
		event.add_metadata(metadata)?;
		Ok(event)
	}

	/// Sets the group (organization or tenant) id.
	pub fn set_group<A: Auditable + ?Sized>(&mut self, group: &A) {
		self.group = group.auditable_id();
	}

	pub fn set_actor<A: Auditable + ?Sized>(&mut self, actor: &A) {
		self.actor_name = actor.auditable_name();
		self.actor_id = actor.auditable_id();
	}

	pub fn set_target<A: Auditable + ?Sized>(&mut self, target: &A) {
		self.target_name = target.auditable_name();
		self.target_id = target.auditable_id();
	}

	/// Sets the IPv4 address, IPv6 address or hostname the event came from.
	pub fn set_location(&mut self, location: impl Into<String>) {
		self.location = location.into();
	}

	/// Adds metadata entries in order.
	///
	/// Fails with [`AuditLogError::MetadataCapacity`] on the first entry that
	/// would take the event past [`MAX_METADATA_KEYS`]; entries before it stay
	/// applied and entries after it are dropped.
	///
	/// Values with no JSON encoding (NaN or infinite floats) are accepted and
	/// counted here, and make [`Event::to_wire`] fail until they are
	/// overwritten.
	pub fn add_metadata(&mut self, metadata: impl Into<Metadata>) -> Result<()> {
		for (key, value) in metadata.into() {
			self.add_metadata_entry(key, value)?;
		}
		Ok(())
	}

	fn metadata_keys(&self) -> usize {
		self.metadata.len() + self.unencodable.len()
	}

	fn has_metadata_key(&self, key: &str) -> bool {
		self.metadata.contains_key(key) || self.unencodable.contains_key(key)
	}

	fn add_metadata_entry(&mut self, key: String, value: MetadataValue) -> Result<()> {
		if self.metadata_keys() >= MAX_METADATA_KEYS {
			return Err(AuditLogError::MetadataCapacity {
				limit: MAX_METADATA_KEYS,
			});
		}

		match value {
			MetadataValue::Literal(value) => {
				self.unencodable.remove(&key);
				self.metadata.insert(key, value);
			}
			MetadataValue::Unencodable(reason) => {
				self.metadata.remove(&key);
				self.unencodable.insert(key, reason);
			}
			MetadataValue::Auditable(entity) => {
				let name_key = name_key(&key);
				let id_key = id_key(&key);

				let added = [&name_key, &id_key]
					.iter()
					.filter(|k| !self.has_metadata_key(k))
					.count();
				let removed = usize::from(self.has_metadata_key(&key));
				if self.metadata_keys() + added - removed > MAX_METADATA_KEYS {
					return Err(AuditLogError::MetadataCapacity {
						limit: MAX_METADATA_KEYS,
					});
				}

				self.metadata.remove(&key);
				self.unencodable.remove(&key);
				self.unencodable.remove(&name_key);
				self.unencodable.remove(&id_key);
				self
					.metadata
					.insert(name_key, Value::String(entity.auditable_name()));
				self
					.metadata
					.insert(id_key, Value::String(entity.auditable_id()));
			}
		}
		Ok(())
	}

	/// Serializes the event merged with `defaults` into the wire format.
	///
	/// Fails with [`AuditLogError::Serialization`] when the event, or a
	/// default that the merge would keep, holds a value with no JSON encoding.
	pub fn to_wire(&self, defaults: &DefaultMetadata) -> Result<Vec<u8>> {
		let unencodable = self
			.unencodable
			.iter()
			.next()
			.or_else(|| defaults.unencodable_for(&self.metadata));
		if let Some((key, reason)) = unencodable {
			return Err(AuditLogError::Serialization(serde_json::Error::custom(
				format!("metadata value at `{key}` cannot be encoded: {reason}"),
			)));
		}

		let metadata = defaults.merge(&self.metadata);
		let wire = WireEvent {
			group: &self.group,
			action: &self.action,
			action_type: self.action_type,
			actor_name: &self.actor_name,
			actor_id: &self.actor_id,
			target_name: &self.target_name,
			target_id: &self.target_id,
			location: &self.location,
			occured_at: &self.occured_at,
			metadata: &metadata,
		};
		Ok(serde_json::to_vec(&wire)?)
	}

	/// Serializes the event and hands it to `publisher`.
	///
	/// Serialization failures are returned before the publisher is called.
	/// Publisher failures are returned as [`AuditLogError::Transport`]. No
	/// retries are attempted.
	pub async fn publish<P: EventPublisher + ?Sized>(
		&self,
		publisher: &P,
		defaults: &DefaultMetadata,
	) -> Result<()> {
		let body = self.to_wire(defaults)?;
		debug!(action = %self.action, bytes = body.len(), "publishing audit event");
		publisher.publish_event(body).await?;
		Ok(())
	}

	pub fn group(&self) -> &str {
		&self.group
	}

	pub fn action(&self) -> &str {
		&self.action
	}

	pub fn action_type(&self) -> ActionType {
		self.action_type
	}

	pub fn actor_name(&self) -> &str {
		&self.actor_name
	}

	pub fn actor_id(&self) -> &str {
		&self.actor_id
	}

	pub fn target_name(&self) -> &str {
		&self.target_name
	}

	pub fn target_id(&self) -> &str {
		&self.target_id
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	pub fn occured_at(&self) -> DateTime<Utc> {
		self.occured_at
	}

	pub fn metadata(&self) -> &Map<String, Value> {
		&self.metadata
	}
}
