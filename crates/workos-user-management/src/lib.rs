// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! WorkOS user management.
//!
//! [`UserManagementClient`] wraps the `/users` API: CRUD on users,
//! organization membership, and the password, code and magic-auth
//! authentication flows. The flows themselves run on WorkOS; this crate only
//! shapes requests and decodes responses.
//!
//! ```rust,no_run
//! use workos_user_management::{
//!     AuthenticateWithPasswordOpts, CreateUserOpts, UserManagementClient, UserManagementConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UserManagementClient::new(UserManagementConfig::from_env()?)?;
//!
//! let user = client
//!     .create_user(&CreateUserOpts::new("marcelina@foo-corp.com").password("i8uv6g34kd490s"))
//!     .await?;
//!
//! let auth = client
//!     .authenticate_user_with_password(&AuthenticateWithPasswordOpts::new(
//!         &user.email,
//!         "i8uv6g34kd490s",
//!     ))
//!     .await?;
//! assert_eq!(auth.user.id, user.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::UserManagementClient;
pub use config::UserManagementConfig;
pub use error::{ConfigError, Result, UserManagementError};
pub use types::{
	AddUserToOrganizationOpts, AuthenticateWithCodeOpts, AuthenticateWithMagicAuthOpts,
	AuthenticateWithPasswordOpts, AuthenticationResponse, ChallengeResponse,
	CompleteEmailVerificationOpts, CompletePasswordResetOpts, CreatePasswordResetChallengeOpts,
	CreateUserOpts, ListUsersOpts, ListUsersResponse, SendMagicAuthCodeOpts, Session,
	SessionOptions, UpdateUserOpts, User, UserType,
};
pub use workos_common_core::{ListMetadata, Order, PaginationParams};
