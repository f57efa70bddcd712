mod config;
pub use config::{LogConfig, LogFormat};

mod error;
pub use error::LogError;

mod init;
pub use init::init_logger;
