//! NetEq factory factories.

use std::ffi::c_void;
use std::sync::Arc;

use log::warn;

use crate::engine::NativeEngine;
use crate::handle::{NetEqFactoryHandle, Owned};

/// Creates a native `webrtc::NetEqFactory` when the engine builds an audio
/// pipeline.
///
/// The caller takes ownership of the returned factory. Implementations must
/// not keep or later touch the handle.
pub trait NetEqFactoryFactory: Send + Sync {
    /// Returns a new NetEq factory, or `None` if none could be created.
    fn create_native_neteq_factory(&self) -> Option<Owned<NetEqFactoryHandle>>;
}

/// Hands out the engine's built-in NetEq factory.
pub struct BuiltinNetEqFactoryFactory {
    engine: Arc<dyn NativeEngine>,
}

impl BuiltinNetEqFactoryFactory {
    /// Use `engine`'s default NetEq implementation.
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self { engine }
    }
}

impl NetEqFactoryFactory for BuiltinNetEqFactoryFactory {
    fn create_native_neteq_factory(&self) -> Option<Owned<NetEqFactoryHandle>> {
        let factory = Owned::adopt(self.engine.create_neteq_factory(), self.engine.clone());
        if factory.is_none() {
            warn!("engine returned no NetEq factory");
        }
        factory
    }
}

/// Box a factory factory for the native engine.
///
/// The engine calls it through
/// `rtc_bridge_neteq_factory_factory_create_native` and frees it with
/// `rtc_bridge_neteq_factory_factory_free`.
pub fn into_native_raw(factory: Arc<dyn NetEqFactoryFactory>) -> *mut c_void {
    Box::into_raw(Box::new(factory)) as *mut c_void
}
