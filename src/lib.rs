pub mod config;
pub mod error;
pub mod linked_list;
pub mod logging;
pub mod memory;
pub mod record;
pub mod testcase;
pub mod threading;

pub use error::{Error, Result};
pub use linked_list::LinkedList;
