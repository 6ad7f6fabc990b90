//! Audio pipeline components.

mod neteq;

pub use neteq::{into_native_raw, BuiltinNetEqFactoryFactory, NetEqFactoryFactory};
