// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit log events for WorkOS.
//!
//! An [`Event`] is built from [`Auditable`] entities (group, actor, target),
//! enriched with metadata, merged with a [`DefaultMetadata`] value and handed
//! to an [`EventPublisher`] as serialized JSON.
//!
//! ```rust,no_run
//! use workos_audit_log::{
//!     ActionType, AuditLogClient, DefaultMetadata, Entity, Event, HttpPublisherConfig, Metadata,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let defaults = DefaultMetadata::new().insert("environment", "production");
//! let client = AuditLogClient::from_config(HttpPublisherConfig::from_env()?, defaults)?;
//!
//! let user = Entity::new("user@example.com", "user_1");
//! let mut event = Event::new("user.login", ActionType::Create);
//! event.set_actor(&user);
//! event.set_target(&user);
//! event.set_group(&Entity::new("Acme", "organization_1"));
//! event.add_metadata(Metadata::new().insert("plan", "enterprise"))?;
//!
//! client.publish(&event).await?;
//! # Ok(())
//! # }
//! ```

pub mod auditable;
pub mod context;
pub mod error;
pub mod event;
pub mod metadata;
pub mod publisher;

pub use auditable::{Auditable, Entity};
pub use context::{HostnameResolver, RequestContext, RequestInfo, SystemHostname};
pub use error::{AuditLogError, ConfigError, Result, TransportError};
pub use event::{ActionType, Event};
pub use metadata::{
	DefaultMetadata, MergePolicy, Metadata, MetadataLiteral, MetadataValue, MAX_METADATA_KEYS,
};
pub use publisher::{AuditLogClient, EventPublisher, HttpEventPublisher, HttpPublisherConfig};
