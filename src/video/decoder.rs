//! Software video decoders wrapped from the native engine.

use std::ffi::c_void;
use std::sync::Arc;

use log::{debug, warn};

use crate::engine::NativeEngine;
use crate::handle::{EnvironmentHandle, Owned, VideoDecoderHandle};
use crate::types::VideoCodec;

/// A decoder implemented entirely in the native engine.
///
/// The Rust object only knows how to ask the engine for an instance; the
/// decoding happens natively.
pub trait WrappedNativeVideoDecoder: Send + Sync {
    /// Codec this decoder handles.
    fn codec(&self) -> VideoCodec;

    /// Whether the engine was built with this decoder.
    ///
    /// Pure and cheap; safe to call before every construction attempt.
    fn is_supported(&self) -> bool;

    /// Create a native decoder bound to `env`.
    ///
    /// Returns `None` if the decoder could not be constructed, e.g. because
    /// the codec is not compiled in. The caller owns the returned decoder.
    fn create_native(&self, env: EnvironmentHandle) -> Option<Owned<VideoDecoderHandle>>;
}

macro_rules! software_decoder {
    ($(#[$meta:meta])* $name:ident, $codec:expr) => {
        $(#[$meta])*
        pub struct $name {
            engine: Arc<dyn NativeEngine>,
        }

        impl $name {
            /// Bind to `engine`.
            pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
                Self { engine }
            }
        }

        impl WrappedNativeVideoDecoder for $name {
            fn codec(&self) -> VideoCodec {
                $codec
            }

            fn is_supported(&self) -> bool {
                self.engine.is_video_decoder_supported($codec)
            }

            fn create_native(&self, env: EnvironmentHandle) -> Option<Owned<VideoDecoderHandle>> {
                create_decoder(&self.engine, $codec, env)
            }
        }
    };
}

software_decoder!(
    /// libvpx VP8 decoder.
    LibvpxVp8Decoder,
    VideoCodec::Vp8
);
software_decoder!(
    /// libvpx VP9 decoder. Only present when the engine is built with VP9.
    LibvpxVp9Decoder,
    VideoCodec::Vp9
);
software_decoder!(
    /// dav1d AV1 decoder.
    Dav1dDecoder,
    VideoCodec::Av1
);

fn create_decoder(
    engine: &Arc<dyn NativeEngine>,
    codec: VideoCodec,
    env: EnvironmentHandle,
) -> Option<Owned<VideoDecoderHandle>> {
    if !env.is_valid() {
        warn!("{} decoder requested without an engine environment", codec);
        return None;
    }
    let decoder = Owned::adopt(engine.create_video_decoder(codec, env), engine.clone());
    match &decoder {
        Some(d) => debug!("created {} decoder {:#x}", codec, d.handle().as_raw()),
        None => debug!("{} decoder unavailable", codec),
    }
    decoder
}

/// Box a decoder for the native engine.
///
/// The engine calls it through `rtc_bridge_video_decoder_create_native` and
/// frees it with `rtc_bridge_video_decoder_free`.
pub fn into_native_raw(decoder: Arc<dyn WrappedNativeVideoDecoder>) -> *mut c_void {
    Box::into_raw(Box::new(decoder)) as *mut c_void
}

/// Decoder for `codec`, bound to `engine`.
pub fn software_decoder(
    engine: Arc<dyn NativeEngine>,
    codec: VideoCodec,
) -> Box<dyn WrappedNativeVideoDecoder> {
    match codec {
        VideoCodec::Vp8 => Box::new(LibvpxVp8Decoder::new(engine)),
        VideoCodec::Vp9 => Box::new(LibvpxVp9Decoder::new(engine)),
        VideoCodec::Av1 => Box::new(Dav1dDecoder::new(engine)),
    }
}
