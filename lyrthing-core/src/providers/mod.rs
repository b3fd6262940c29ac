pub mod directory;
pub mod lrclib;

pub use directory::DirectoryProvider;
pub use lrclib::LrclibRecord;
