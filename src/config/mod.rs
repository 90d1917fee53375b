pub mod settings;

pub use settings::{AppConfig, ServiceSettings, StorageSettings};
