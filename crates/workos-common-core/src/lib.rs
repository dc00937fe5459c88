// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Types shared across WorkOS resources.

pub mod pagination;

pub use pagination::{ListMetadata, Order, PaginationParams, DEFAULT_LIMIT, MAX_LIMIT};
