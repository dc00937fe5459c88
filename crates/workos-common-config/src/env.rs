// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets may be provided directly (`WORKOS_API_KEY=sk_...`) or through a
//! file path (`WORKOS_API_KEY_FILE=/run/secrets/workos`), the convention used
//! by Docker and Kubernetes secret mounts. The file variant wins when both
//! are set.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::secret::SecretString;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum EnvError {
	/// A required variable was not set (or was empty).
	#[error("missing environment variable: {0}")]
	Missing(String),

	/// A required secret was set through neither `VAR` nor `VAR_FILE`.
	#[error("required secret not found: set either {var} or {file_var}")]
	MissingSecret { var: String, file_var: String },

	/// The `VAR_FILE` variable was set to an empty path.
	#[error("secret file path in {0} is empty")]
	EmptyPath(String),

	/// The secret file could not be read.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Reads a plain variable, treating an empty value as unset.
pub fn load_env(var: &str) -> Option<String> {
	env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// Reads a plain variable that must be present.
pub fn require_env(var: &str) -> Result<String, EnvError> {
	load_env(var).ok_or_else(|| EnvError::Missing(var.to_string()))
}

/// Reads a secret from `{var}_FILE` or `{var}`.
///
/// A single trailing newline is stripped from file contents. Returns
/// `Ok(None)` when neither variable is set.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, EnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path) = env::var(&file_var) {
		if path.is_empty() {
			return Err(EnvError::EmptyPath(file_var));
		}

		let path = PathBuf::from(path);
		let content = fs::read_to_string(&path).map_err(|source| EnvError::Io {
			path: path.clone(),
			source,
		})?;
		let value = content.strip_suffix('\n').unwrap_or(&content);
		return Ok(Some(SecretString::new(value)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

/// Like [`load_secret_env`] but fails when the secret is absent.
pub fn require_secret_env(var: &str) -> Result<SecretString, EnvError> {
	load_secret_env(var)?.ok_or_else(|| EnvError::MissingSecret {
		var: var.to_string(),
		file_var: format!("{var}_FILE"),
	})
}
