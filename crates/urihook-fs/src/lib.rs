mod error;
mod rw;
mod scratch;
mod transaction;

pub use error::{Error, Result};
pub use rw::{Options, atomic_read, atomic_write};
pub use scratch::ScratchDir;
pub use transaction::Transaction;
