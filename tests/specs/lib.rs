// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end CLI specs for ploy.
//!
//! The test files under `cli/` are wired into the `ploy` crate as
//! `[[test]]` targets; this member only carries the shared dev-dependency
//! versions.
