pub mod file_source;
pub mod http_source;
pub mod util;

pub use file_source::FilePageSource;
pub use http_source::HttpPageSource;
