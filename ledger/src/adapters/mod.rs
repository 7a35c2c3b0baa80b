pub mod memory;
mod selector;

pub use memory::{MemoryIdentity, MemoryLedger};
