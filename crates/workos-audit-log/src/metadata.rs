// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event metadata: per-event batches and the default metadata merged into
//! every published event.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::auditable::Auditable;

/// Maximum number of keys an event's metadata may hold.
pub const MAX_METADATA_KEYS: usize = 500;

/// Key under which the display name of an auditable value is stored.
pub(crate) fn name_key(key: &str) -> String {
	format!("{key}_name")
}

/// Key under which the id of an auditable value is stored.
pub(crate) fn id_key(key: &str) -> String {
	format!("{key}_id")
}

/// A value that can be stored as a metadata literal.
///
/// Non-finite floats have no JSON encoding. They are not rewritten to `null`;
/// the conversion reports why the value cannot be encoded.
pub trait MetadataLiteral {
	fn into_json(self) -> Result<Value, String>;
}

macro_rules! lossless_literal {
	($($ty:ty),* $(,)?) => {
		$(
			impl MetadataLiteral for $ty {
				fn into_json(self) -> Result<Value, String> {
					Ok(Value::from(self))
				}
			}
		)*
	};
}

lossless_literal!(
	bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str,
);

impl MetadataLiteral for &String {
	fn into_json(self) -> Result<Value, String> {
		Ok(Value::String(self.clone()))
	}
}

impl MetadataLiteral for f64 {
	fn into_json(self) -> Result<Value, String> {
		if self.is_finite() {
			Ok(Value::from(self))
		} else {
			Err(format!("{self} has no JSON representation"))
		}
	}
}

impl MetadataLiteral for f32 {
	fn into_json(self) -> Result<Value, String> {
		f64::from(self).into_json()
	}
}

impl MetadataLiteral for Value {
	fn into_json(self) -> Result<Value, String> {
		Ok(self)
	}
}

impl MetadataLiteral for Map<String, Value> {
	fn into_json(self) -> Result<Value, String> {
		Ok(Value::Object(self))
	}
}

impl<T: MetadataLiteral> MetadataLiteral for Option<T> {
	fn into_json(self) -> Result<Value, String> {
		self.map_or(Ok(Value::Null), MetadataLiteral::into_json)
	}
}

impl<T: MetadataLiteral> MetadataLiteral for Vec<T> {
	fn into_json(self) -> Result<Value, String> {
		self
			.into_iter()
			.map(MetadataLiteral::into_json)
			.collect::<Result<Vec<_>, _>>()
			.map(Value::Array)
	}
}

/// A single metadata value.
///
/// Auditable values are expanded into `<key>_name` and `<key>_id` when they
/// are added to an event; literals are stored under the key as given.
/// Unencodable values are kept until serialization, which then fails.
pub enum MetadataValue {
	Literal(Value),
	Auditable(Box<dyn Auditable + Send + Sync>),
	/// A value with no JSON encoding, with the reason.
	Unencodable(String),
}

impl MetadataValue {
	pub fn literal(value: impl MetadataLiteral) -> Self {
		match value.into_json() {
			Ok(value) => MetadataValue::Literal(value),
			Err(reason) => MetadataValue::Unencodable(reason),
		}
	}

	pub fn auditable(value: impl Auditable + Send + Sync + 'static) -> Self {
		MetadataValue::Auditable(Box::new(value))
	}
}

impl fmt::Debug for MetadataValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MetadataValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			MetadataValue::Auditable(entity) => f
				.debug_struct("Auditable")
				.field("name", &entity.auditable_name())
				.field("id", &entity.auditable_id())
				.finish(),
			MetadataValue::Unencodable(reason) => {
				f.debug_tuple("Unencodable").field(reason).finish()
			}
		}
	}
}

impl From<Value> for MetadataValue {
	fn from(value: Value) -> Self {
		MetadataValue::Literal(value)
	}
}

/// An ordered batch of metadata entries for [`Event::add_metadata`].
///
/// Entries are applied in insertion order. Inserting the same key twice
/// keeps both entries; the later one wins when applied.
///
/// ```
/// use workos_audit_log::{Entity, Metadata};
///
/// let metadata = Metadata::new()
///     .insert("plan", "enterprise")
///     .insert("seats", 25)
///     .insert_auditable("invited_by", Entity::new("admin@example.com", "user_9"));
/// assert_eq!(metadata.len(), 3);
/// ```
///
/// [`Event::add_metadata`]: crate::Event::add_metadata
#[derive(Debug, Default)]
pub struct Metadata {
	entries: Vec<(String, MetadataValue)>,
}

impl Metadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a literal value.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: MetadataLiteral,
	{
		self.entries.push((key.into(), MetadataValue::literal(value)));
		self
	}

	/// Adds an auditable value, expanded to `<key>_name` / `<key>_id`.
	pub fn insert_auditable<K, A>(mut self, key: K, value: A) -> Self
	where
		K: Into<String>,
		A: Auditable + Send + Sync + 'static,
	{
		self.entries.push((key.into(), MetadataValue::auditable(value)));
		self
	}

	pub fn push(&mut self, key: impl Into<String>, value: MetadataValue) {
		self.entries.push((key.into(), value));
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl IntoIterator for Metadata {
	type Item = (String, MetadataValue);
	type IntoIter = std::vec::IntoIter<(String, MetadataValue)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<K: Into<String>> FromIterator<(K, MetadataValue)> for Metadata {
	fn from_iter<I: IntoIterator<Item = (K, MetadataValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}
}

impl From<Map<String, Value>> for Metadata {
	fn from(map: Map<String, Value>) -> Self {
		map
			.into_iter()
			.map(|(k, v)| (k, MetadataValue::Literal(v)))
			.collect()
	}
}

/// How default metadata is merged with an event's own metadata when both
/// hold the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
	/// The default value replaces the event's value.
	#[default]
	DefaultsWin,
	/// The event's value is kept.
	EventWins,
}

/// Metadata merged into every event at publish time.
///
/// Configure once at startup and share it (it is cheap to wrap in an `Arc`).
/// Merging does not count against [`MAX_METADATA_KEYS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultMetadata {
	values: Map<String, Value>,
	/// Keys whose value has no JSON encoding, with the reason. Disjoint from
	/// `values`.
	unencodable: BTreeMap<String, String>,
	policy: MergePolicy,
}

impl DefaultMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_policy(mut self, policy: MergePolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: MetadataLiteral,
	{
		let key = key.into();
		match value.into_json() {
			Ok(value) => {
				self.unencodable.remove(&key);
				self.values.insert(key, value);
			}
			Err(reason) => {
				self.values.remove(&key);
				self.unencodable.insert(key, reason);
			}
		}
		self
	}

	/// Adds `<key>_name` and `<key>_id` for an auditable value.
	pub fn insert_auditable<A: Auditable + ?Sized>(self, key: &str, value: &A) -> Self {
		self
			.insert(name_key(key), value.auditable_name())
			.insert(id_key(key), value.auditable_id())
	}

	pub fn policy(&self) -> MergePolicy {
		self.policy
	}

	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.unencodable.is_empty()
	}

	/// The first unencodable default that would end up in a record merged
	/// with `event`, as `(key, reason)`.
	pub fn unencodable_for(&self, event: &Map<String, Value>) -> Option<(&String, &String)> {
		self.unencodable.iter().find(|(key, _)| match self.policy {
			MergePolicy::DefaultsWin => true,
			MergePolicy::EventWins => !event.contains_key(key.as_str()),
		})
	}

	/// Returns `event` merged with these defaults according to the policy.
	///
	/// Unencodable defaults are left out; see
	/// [`DefaultMetadata::unencodable_for`].
	pub fn merge(&self, event: &Map<String, Value>) -> Map<String, Value> {
		let mut merged = event.clone();
		for (key, value) in &self.values {
			match self.policy {
				MergePolicy::DefaultsWin => {
					merged.insert(key.clone(), value.clone());
				}
				MergePolicy::EventWins => {
					merged.entry(key.clone()).or_insert_with(|| value.clone());
				}
			}
		}
		merged
	}
}

impl From<Map<String, Value>> for DefaultMetadata {
	fn from(values: Map<String, Value>) -> Self {
		Self {
			values,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::auditable::Entity;
	use proptest::prelude::*;
	use serde_json::json;

	mod metadata_batch {
		use super::*;

		#[test]
		fn preserves_insertion_order() {
			let keys: Vec<String> = Metadata::new()
				.insert("z", 1)
				.insert("a", 2)
				.insert("m", 3)
				.into_iter()
				.map(|(k, _)| k)
				.collect();
			assert_eq!(keys, vec!["z", "a", "m"]);
		}

		#[test]
		fn from_map_is_all_literals() {
			let map = json!({"a": 1, "b": [1, 2]}).as_object().unwrap().clone();
			let metadata = Metadata::from(map);
			assert_eq!(metadata.len(), 2);
			assert!(metadata
				.into_iter()
				.all(|(_, v)| matches!(v, MetadataValue::Literal(_))));
		}

		#[test]
		fn non_finite_floats_are_unencodable() {
			for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
				assert!(matches!(
					MetadataValue::literal(value),
					MetadataValue::Unencodable(_)
				));
			}
			assert!(matches!(
				MetadataValue::literal(f32::NAN),
				MetadataValue::Unencodable(_)
			));
			assert!(matches!(
				MetadataValue::literal(vec![1.0, f64::NAN]),
				MetadataValue::Unencodable(_)
			));
		}

		#[test]
		fn finite_and_optional_values_are_literals() {
			match MetadataValue::literal(0.25) {
				MetadataValue::Literal(value) => assert_eq!(value, json!(0.25)),
				other => panic!("unexpected value: {other:?}"),
			}
			match MetadataValue::literal(None::<f64>) {
				MetadataValue::Literal(value) => assert!(value.is_null()),
				other => panic!("unexpected value: {other:?}"),
			}
			match MetadataValue::literal(vec!["a", "b"]) {
				MetadataValue::Literal(value) => assert_eq!(value, json!(["a", "b"])),
				other => panic!("unexpected value: {other:?}"),
			}
		}

		#[test]
		fn debug_shows_auditable_fields() {
			let value = MetadataValue::auditable(Entity::new("n", "i"));
			let debug = format!("{value:?}");
			assert!(debug.contains("Auditable"));
			assert!(debug.contains("\"n\""));
			assert!(debug.contains("\"i\""));
		}
	}

	mod default_metadata {
		use super::*;

		fn event_map() -> Map<String, Value> {
			json!({"env": "event", "only_event": true})
				.as_object()
				.unwrap()
				.clone()
		}

		#[test]
		fn defaults_win_by_default() {
			let defaults = DefaultMetadata::new()
				.insert("env", "default")
				.insert("region", "us-east-1");
			assert_eq!(defaults.policy(), MergePolicy::DefaultsWin);

			let merged = defaults.merge(&event_map());
			assert_eq!(merged["env"], "default");
			assert_eq!(merged["region"], "us-east-1");
			assert_eq!(merged["only_event"], true);
		}

		#[test]
		fn event_wins_keeps_event_values() {
			let defaults = DefaultMetadata::new()
				.with_policy(MergePolicy::EventWins)
				.insert("env", "default")
				.insert("region", "us-east-1");

			let merged = defaults.merge(&event_map());
			assert_eq!(merged["env"], "event");
			assert_eq!(merged["region"], "us-east-1");
		}

		#[test]
		fn merge_leaves_input_untouched() {
			let event = event_map();
			let _ = DefaultMetadata::new().insert("env", "x").merge(&event);
			assert_eq!(event["env"], "event");
		}

		#[test]
		fn unencodable_default_is_reported_not_merged() {
			let defaults = DefaultMetadata::new().insert("ratio", f64::NAN);

			let merged = defaults.merge(&event_map());
			assert!(!merged.contains_key("ratio"));
			let (key, reason) = defaults.unencodable_for(&event_map()).unwrap();
			assert_eq!(key, "ratio");
			assert!(reason.contains("NaN"));
			assert!(!defaults.is_empty());
		}

		#[test]
		fn event_wins_hides_unencodable_default() {
			let defaults = DefaultMetadata::new()
				.with_policy(MergePolicy::EventWins)
				.insert("env", f64::INFINITY);
			assert!(defaults.unencodable_for(&event_map()).is_none());
			assert!(defaults.unencodable_for(&Map::new()).is_some());
		}

		#[test]
		fn later_insert_replaces_unencodable_default() {
			let defaults = DefaultMetadata::new()
				.insert("ratio", f64::NAN)
				.insert("ratio", 0.5);
			assert!(defaults.unencodable_for(&Map::new()).is_none());
			assert_eq!(defaults.values()["ratio"], 0.5);
		}

		#[test]
		fn insert_auditable_expands() {
			let defaults =
				DefaultMetadata::new().insert_auditable("service", &Entity::new("billing", "svc_1"));
			assert_eq!(defaults.values()["service_name"], "billing");
			assert_eq!(defaults.values()["service_id"], "svc_1");
			assert!(!defaults.values().contains_key("service"));
		}
	}

	proptest! {
		/// Every default key is present after a merge, whatever the policy.
		#[test]
		fn merge_contains_all_default_keys(
			defaults in proptest::collection::btree_map("[a-z]{1,8}", "[a-z]{0,8}", 0..20),
			event in proptest::collection::btree_map("[a-z]{1,8}", "[a-z]{0,8}", 0..20),
			event_wins in any::<bool>(),
		) {
			let policy = if event_wins { MergePolicy::EventWins } else { MergePolicy::DefaultsWin };
			let mut d = DefaultMetadata::new().with_policy(policy);
			for (k, v) in &defaults {
				d = d.insert(k.clone(), v.clone());
			}
			let event_map: Map<String, Value> = event
				.iter()
				.map(|(k, v)| (k.clone(), Value::String(v.clone())))
				.collect();

			let merged = d.merge(&event_map);
			for (k, v) in &defaults {
				prop_assert!(merged.contains_key(k));
				if !event_wins || !event.contains_key(k) {
					prop_assert_eq!(&merged[k], &Value::String(v.clone()));
				}
			}
			for k in event.keys() {
				prop_assert!(merged.contains_key(k));
			}
		}
	}
}
