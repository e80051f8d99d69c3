#![cfg_attr(not(feature = "std"), no_std)]

pub mod analyzer;
pub mod buffer;
pub mod error;
pub mod frame;
pub mod types;

#[cfg(feature = "std")]
pub mod replay;
#[cfg(feature = "std")]
pub mod stream;

// Re-exports
pub use analyzer::*;
pub use buffer::*;
pub use error::*;
pub use frame::*;
pub use types::*;

#[cfg(feature = "std")]
pub use replay::*;
#[cfg(feature = "std")]
pub use stream::*;
