pub mod json_file;
pub mod memory;

pub use json_file::JsonFileRateLimiter;
pub use memory::MemoryRateLimiter;
