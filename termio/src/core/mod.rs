// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common;
pub mod graphemes;
pub mod log;
pub mod test_fixtures;

// Re-export.
pub use common::*;
pub use graphemes::*;
pub use log::*;
pub use test_fixtures::*;
