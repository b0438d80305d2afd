pub mod init;
pub mod list_models;
pub mod progress;
pub mod quiz;
pub mod units;
pub mod validate;
