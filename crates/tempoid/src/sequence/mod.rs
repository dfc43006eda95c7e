mod config;
mod file;
mod interface;
mod memory;
mod record;

pub use config::*;
pub use file::*;
pub use interface::*;
pub use memory::*;
pub use record::*;
