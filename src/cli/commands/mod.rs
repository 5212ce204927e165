pub mod backends;
mod command_result;
pub mod context;
pub mod helper;
pub mod init;
pub mod language;
pub mod scan;
pub mod stats;

pub use command_result::*;
