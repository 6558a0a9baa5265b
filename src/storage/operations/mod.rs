// Transfer operation traits and implementations
pub mod download;
pub mod upload;

pub use download::Downloader;
pub use upload::Uploader;
