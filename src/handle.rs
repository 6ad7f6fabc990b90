//! Ownership of native handles.
//!
//! A plain handle (`VideoDecoderHandle`, `EnvironmentHandle`, ...) is `Copy`
//! and only ever forwarded. Ownership is expressed by wrapping a handle in
//! [`Owned`], which releases it through the engine's destroy path exactly
//! once: when dropped, when [`Owned::release`] is called, or never on this
//! side if [`Owned::into_raw`] handed it to the native caller.
//!
//! Context handles (`EnvironmentHandle`, `PeerConnectionHandle`) do not
//! implement [`NativeObject`], so they cannot be wrapped in [`Owned`].

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::Arc;

use log::{debug, error};

use crate::engine::NativeEngine;
use crate::error::Result;
pub use crate::ffi::handles::{
    EnvironmentHandle, NetEqFactoryHandle, NetworkMonitorHandle, PeerConnectionHandle,
    VideoDecoderHandle,
};

/// Kind of native object a handle refers to. Selects the destroy path.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// `webrtc::VideoDecoder`.
    VideoDecoder = 1,
    /// `webrtc::NetEqFactory`.
    NetEqFactory = 2,
    /// Native network monitor.
    NetworkMonitor = 3,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandleKind::VideoDecoder => "video decoder",
            HandleKind::NetEqFactory => "NetEq factory",
            HandleKind::NetworkMonitor => "network monitor",
        };
        f.write_str(name)
    }
}

impl From<HandleKind> for i32 {
    fn from(kind: HandleKind) -> i32 {
        kind as i32
    }
}

impl TryFrom<i32> for HandleKind {
    type Error = crate::Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(HandleKind::VideoDecoder),
            2 => Ok(HandleKind::NetEqFactory),
            3 => Ok(HandleKind::NetworkMonitor),
            other => Err(crate::Error::UnknownHandleKind(other)),
        }
    }
}

/// A handle type that names a native object with a destroy path.
pub trait NativeObject: Copy + Send + Sync + fmt::Debug + 'static {
    /// Destroy path selector.
    const KIND: HandleKind;

    /// Raw value of the handle.
    fn raw(&self) -> u64;

    /// Whether the handle is present (non-zero).
    fn is_present(&self) -> bool {
        self.raw() != 0
    }
}

impl NativeObject for VideoDecoderHandle {
    const KIND: HandleKind = HandleKind::VideoDecoder;

    fn raw(&self) -> u64 {
        self.as_raw()
    }
}

impl NativeObject for NetEqFactoryHandle {
    const KIND: HandleKind = HandleKind::NetEqFactory;

    fn raw(&self) -> u64 {
        self.as_raw()
    }
}

impl NativeObject for NetworkMonitorHandle {
    const KIND: HandleKind = HandleKind::NetworkMonitor;

    fn raw(&self) -> u64 {
        self.as_raw()
    }
}

/// Unique owner of a native object.
///
/// Not `Clone`: there is exactly one owner, and exactly one release.
pub struct Owned<H: NativeObject> {
    handle: H,
    engine: Arc<dyn NativeEngine>,
}

impl<H: NativeObject> Owned<H> {
    /// Take ownership of a freshly created handle.
    ///
    /// Returns `None` for the absent sentinel; there is nothing to release.
    pub(crate) fn adopt(handle: H, engine: Arc<dyn NativeEngine>) -> Option<Self> {
        if !handle.is_present() {
            debug!("native {} not created (absent handle)", H::KIND);
            return None;
        }
        debug!("acquired {} handle {:#x}", H::KIND, handle.raw());
        Some(Self { handle, engine })
    }

    /// Take ownership of a handle obtained elsewhere.
    ///
    /// # Safety
    ///
    /// The handle must have been created by `engine` and must not be owned by
    /// anything else, or it will be released twice.
    pub unsafe fn from_raw(handle: H, engine: Arc<dyn NativeEngine>) -> Option<Self> {
        Self::adopt(handle, engine)
    }

    /// Copy of the handle for forwarding. The copy must not be released.
    pub fn handle(&self) -> H {
        self.handle
    }

    /// Give up ownership, typically to a native caller that will destroy the
    /// object itself. No release happens on this side.
    pub fn into_raw(self) -> H {
        let (handle, engine) = self.into_parts();
        drop(engine);
        debug!("transferred {} handle {:#x} to native", H::KIND, handle.raw());
        handle
    }

    /// Release the object now and report whether the engine accepted it.
    pub fn release(self) -> Result<()> {
        let (handle, engine) = self.into_parts();
        debug!("releasing {} handle {:#x}", H::KIND, handle.raw());
        engine.release(H::KIND, handle.raw())
    }

    fn into_parts(self) -> (H, Arc<dyn NativeEngine>) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the Arc is moved out exactly once.
        let engine = unsafe { ptr::read(&this.engine) };
        (this.handle, engine)
    }
}

impl<H: NativeObject> Drop for Owned<H> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.release(H::KIND, self.handle.raw()) {
            error!("failed to release {} handle {:#x}: {}", H::KIND, self.handle.raw(), e);
        }
    }
}

impl<H: NativeObject> fmt::Debug for Owned<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("kind", &H::KIND)
            .field("handle", &format_args!("{:#x}", self.handle.raw()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackEngine;

    #[test]
    fn test_absent_handle_is_not_adopted() {
        let engine: Arc<dyn NativeEngine> = Arc::new(LoopbackEngine::new());
        assert!(Owned::adopt(VideoDecoderHandle::invalid(), engine).is_none());
    }

    #[test]
    fn test_drop_releases_once() {
        let loopback = Arc::new(LoopbackEngine::new());
        let engine: Arc<dyn NativeEngine> = loopback.clone();
        let raw = engine.create_neteq_factory();
        let owned = Owned::adopt(raw, engine).expect("handle should be present");
        assert_eq!(loopback.live_handles(), 1);

        drop(owned);
        assert_eq!(loopback.live_handles(), 0);
        assert_eq!(loopback.released_count(), 1);
    }

    #[test]
    fn test_into_raw_skips_release() {
        let loopback = Arc::new(LoopbackEngine::new());
        let engine: Arc<dyn NativeEngine> = loopback.clone();
        let owned = Owned::adopt(engine.create_neteq_factory(), engine.clone()).unwrap();

        let raw = owned.into_raw();
        assert_eq!(loopback.live_handles(), 1);

        // The receiving side releases it, once.
        engine.release(HandleKind::NetEqFactory, raw.as_raw()).unwrap();
        let err = engine
            .release(HandleKind::NetEqFactory, raw.as_raw())
            .unwrap_err();
        assert!(err.is_already_released());
    }

    #[test]
    fn test_handle_kind_round_trips_through_i32() {
        for kind in [
            HandleKind::VideoDecoder,
            HandleKind::NetEqFactory,
            HandleKind::NetworkMonitor,
        ] {
            assert_eq!(HandleKind::try_from(i32::from(kind)).unwrap(), kind);
        }
        assert!(HandleKind::try_from(42).is_err());
    }
}
