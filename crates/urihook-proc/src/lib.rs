mod error;
mod invocation;
pub mod os;
mod runner;

pub use error::{Error, Result};
pub use invocation::{Invocation, ToolOutput};
pub use runner::{DirectRunner, Runner, SudoRunner};
