pub mod config;
pub mod decode;
pub mod lenient;
pub mod persona;
pub mod prompt;
pub mod text;
pub mod types;
pub mod upload;

// Keep the public surface small and intentional.
pub use config::*;
pub use decode::{DecodeFailure, decode};
pub use persona::*;
pub use prompt::*;
pub use types::*;
pub use upload::*;
