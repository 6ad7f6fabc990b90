//! FFI surface of the bridge.
//!
//! `raw` declares the engine library's C functions (feature `native`) and
//! the C-compatible types shared with it; `callbacks` holds the entry points
//! the engine calls back into. Users should prefer the safe Rust wrappers in
//! the parent modules.

pub mod callbacks;
pub mod error;
pub mod handles;
pub mod raw;

pub use callbacks::*;
pub use error::check_status;
pub use handles::*;
pub use raw::*;
