pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{ClientConfig, LoggingConfig, Settings, load_settings};
