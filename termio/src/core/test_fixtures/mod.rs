// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixtures for testing code that renders to a terminal or reads input from one. They
//! are public so that integration tests and downstream crates can use them.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod mock_terminal_backend;
pub mod output_device_ext;
pub mod stdout_mock;

// Re-export.
pub use mock_terminal_backend::*;
pub use output_device_ext::*;
pub use stdout_mock::*;
