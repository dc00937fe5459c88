// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by the WorkOS client crates.
//!
//! - [`SecretString`]: wraps API keys and client secrets so they never show
//!   up in logs, debug output or serialized config dumps
//! - [`load_secret_env`] / [`require_secret_env`]: read secrets from `VAR`
//!   or from the file named by `VAR_FILE`
//! - [`load_env`] / [`require_env`]: plain (non-secret) variables

pub mod env;
pub mod secret;

pub use env::{load_env, load_secret_env, require_env, require_secret_env, EnvError};
pub use secret::{SecretString, REDACTED};
