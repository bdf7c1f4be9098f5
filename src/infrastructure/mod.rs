pub mod events;
pub mod in_memory;
