//! Handle types for opaque references to native engine objects.
//!
//! Each handle type is a newtype wrapper around the u64 bit pattern of a
//! native pointer. The value is never interpreted on the Rust side.

/// Macro to define a handle type.
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            _h: u64,
        }

        impl $name {
            /// Create an invalid (absent) handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self { _h: 0 }
            }

            /// Wrap a raw value received from the native side.
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self { _h: raw }
            }

            /// The raw value, for forwarding across the boundary.
            #[inline]
            pub const fn as_raw(&self) -> u64 {
                self._h
            }

            /// Check if this handle is valid (non-zero).
            #[inline]
            pub const fn is_valid(&self) -> bool {
                self._h != 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

define_handle!(
    /// Native video decoder (`webrtc::VideoDecoder`).
    VideoDecoderHandle
);
define_handle!(
    /// Native NetEq factory (`webrtc::NetEqFactory`).
    NetEqFactoryHandle
);
define_handle!(
    /// Native network monitor that backs a network change detector.
    NetworkMonitorHandle
);
define_handle!(
    /// Native engine environment. Borrowed, never owned by this crate.
    EnvironmentHandle
);
define_handle!(
    /// Native peer connection that stats are collected from. Borrowed.
    PeerConnectionHandle
);
