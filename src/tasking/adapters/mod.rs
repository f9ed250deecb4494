//! Adapter implementations of the tasking ports.

pub mod memory;
