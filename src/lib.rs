pub mod compiler;
pub mod error;
pub mod stream;

pub use compiler::Compiler;
pub use error::Error;
