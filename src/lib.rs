// Copyright 2026 Syllabo Contributors
// SPDX-License-Identifier: Apache-2.0

//! Syllabo library: course outline extraction through a real browser.
//!
//! This library crate exposes the core modules for the `syllabo` binary
//! and for integration testing.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod diagnostics;
pub mod discover;
pub mod driver;
pub mod errors;
pub mod lessons;
pub mod login;
pub mod outline;
pub mod report;
pub mod session;
pub mod status;
