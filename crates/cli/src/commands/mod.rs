// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations

pub mod account;
pub mod bench;
pub mod log;
pub mod peek;
