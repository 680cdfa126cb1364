pub mod generate;
pub mod init;
pub mod repair;
pub mod stats;
pub mod validate;
pub mod weakness;
