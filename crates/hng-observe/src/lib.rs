mod config;
pub use config::LoggerConfig;

mod error;
pub use error::{LoggerError, LoggerResult};

mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod timestamp;
pub use timestamp::{LoggerTimeZone, Rfc3339Timer, init_local_offset};

mod init;
pub use init::init_logger;
