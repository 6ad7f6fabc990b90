//! Video decoders.

mod decoder;
mod factory;

pub use decoder::{
    into_native_raw, software_decoder, Dav1dDecoder, LibvpxVp8Decoder, LibvpxVp9Decoder,
    WrappedNativeVideoDecoder,
};
pub use factory::VideoDecoderFactory;
