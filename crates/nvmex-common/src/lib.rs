pub mod error;

pub use error::{NvmexError, Result};
