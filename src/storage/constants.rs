// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

// Number of files transferred at the same time within one command
pub const DEFAULT_CONCURRENCY: usize = 4;

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";
