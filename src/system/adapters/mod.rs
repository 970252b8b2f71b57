//! Adapter implementations for system ports.

pub mod memory;
