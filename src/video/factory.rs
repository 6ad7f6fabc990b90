//! Decoder selection.

use std::sync::Arc;

use log::{debug, info, warn};

use super::decoder::{software_decoder, WrappedNativeVideoDecoder};
use crate::engine::NativeEngine;
use crate::handle::{EnvironmentHandle, Owned, VideoDecoderHandle};
use crate::types::VideoCodec;

/// Picks among decoder implementations in preference order.
///
/// # Example
///
/// ```no_run
/// # use rtcbridge::{EnvironmentHandle, VideoCodec, VideoDecoderFactory};
/// # fn example(factory: &VideoDecoderFactory, env: EnvironmentHandle) {
/// match factory.create_preferred(env) {
///     Some((codec, decoder)) => println!("decoding {} with {:?}", codec, decoder),
///     None => println!("no software decoder available"),
/// }
/// # }
/// ```
pub struct VideoDecoderFactory {
    decoders: Vec<Box<dyn WrappedNativeVideoDecoder>>,
}

impl VideoDecoderFactory {
    /// Software decoders for `preference`, most preferred first. Repeated
    /// codecs are ignored.
    pub fn new(engine: Arc<dyn NativeEngine>, preference: &[VideoCodec]) -> Self {
        let mut decoders: Vec<Box<dyn WrappedNativeVideoDecoder>> = Vec::new();
        for &codec in preference {
            if decoders.iter().any(|d| d.codec() == codec) {
                continue;
            }
            decoders.push(software_decoder(engine.clone(), codec));
        }
        Self { decoders }
    }

    /// Use the given decoders, in order.
    pub fn with_decoders(decoders: Vec<Box<dyn WrappedNativeVideoDecoder>>) -> Self {
        Self { decoders }
    }

    /// Decoder registered for `codec`.
    pub fn decoder(&self, codec: VideoCodec) -> Option<&dyn WrappedNativeVideoDecoder> {
        self.decoders
            .iter()
            .find(|d| d.codec() == codec)
            .map(|d| d.as_ref())
    }

    /// Codecs whose decoder is available, in preference order.
    pub fn supported_codecs(&self) -> Vec<VideoCodec> {
        self.decoders
            .iter()
            .filter(|d| d.is_supported())
            .map(|d| d.codec())
            .collect()
    }

    /// Create a decoder for `codec`, if registered and available.
    pub fn create_decoder(
        &self,
        codec: VideoCodec,
        env: EnvironmentHandle,
    ) -> Option<Owned<VideoDecoderHandle>> {
        let decoder = self.decoder(codec)?;
        if !decoder.is_supported() {
            debug!("{} decoder not supported on this platform", codec);
            return None;
        }
        decoder.create_native(env)
    }

    /// Create the most preferred decoder that is available.
    ///
    /// Unsupported codecs and failed constructions fall through to the next
    /// preference.
    pub fn create_preferred(
        &self,
        env: EnvironmentHandle,
    ) -> Option<(VideoCodec, Owned<VideoDecoderHandle>)> {
        for decoder in &self.decoders {
            let codec = decoder.codec();
            if !decoder.is_supported() {
                debug!("skipping {}: not supported", codec);
                continue;
            }
            match decoder.create_native(env) {
                Some(handle) => {
                    info!("selected {} decoder", codec);
                    return Some((codec, handle));
                }
                None => warn!("{} decoder reported supported but construction failed", codec),
            }
        }
        warn!("no video decoder available");
        None
    }
}
