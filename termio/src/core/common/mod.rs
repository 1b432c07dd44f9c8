// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common_sync;
pub mod ring_buffer_heap;

// Re-export.
pub use common_sync::*;
pub use ring_buffer_heap::*;
