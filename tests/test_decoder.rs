//! Video decoder and handle ownership tests.

use std::sync::Arc;

use rtcbridge::{
    Dav1dDecoder, EnvironmentHandle, HandleKind, LibvpxVp8Decoder, LibvpxVp9Decoder,
    LoopbackEngine, NativeEngine, VideoCodec, VideoDecoderFactory, WrappedNativeVideoDecoder,
};

fn env() -> EnvironmentHandle {
    EnvironmentHandle::from_raw(0x1000)
}

#[test]
fn test_is_supported_is_repeatable_and_side_effect_free() {
    let engine = Arc::new(LoopbackEngine::new().with_video_codecs(&[VideoCodec::Vp8]));
    let vp8 = LibvpxVp8Decoder::new(engine.clone());
    let av1 = Dav1dDecoder::new(engine.clone());

    for _ in 0..3 {
        assert!(vp8.is_supported(), "VP8 should be supported");
        assert!(!av1.is_supported(), "AV1 should not be supported");
    }
    assert_eq!(engine.live_handles(), 0, "queries must not create objects");
}

#[test]
fn test_create_native_returns_owned_decoder() {
    let engine = Arc::new(LoopbackEngine::new());
    let decoder = LibvpxVp9Decoder::new(engine.clone());
    assert_eq!(decoder.codec(), VideoCodec::Vp9);

    let owned = decoder.create_native(env()).expect("VP9 decoder should be created");
    assert!(owned.handle().is_valid());
    assert!(engine.is_live(owned.handle().as_raw()));

    drop(owned);
    assert_eq!(engine.live_handles(), 0, "drop should release the decoder");
    assert_eq!(engine.released_count(), 1);
}

#[test]
fn test_unsupported_codec_yields_none() {
    let engine = Arc::new(LoopbackEngine::new().with_video_codecs(&[VideoCodec::Vp8]));
    let decoder = LibvpxVp9Decoder::new(engine.clone());

    assert!(!decoder.is_supported());
    assert!(decoder.create_native(env()).is_none());
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn test_missing_environment_yields_none() {
    let engine = Arc::new(LoopbackEngine::new());
    let decoder = LibvpxVp8Decoder::new(engine.clone());

    assert!(decoder.create_native(EnvironmentHandle::invalid()).is_none());
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn test_each_create_is_independent() {
    let engine = Arc::new(LoopbackEngine::new());
    let decoder = LibvpxVp8Decoder::new(engine.clone());

    let a = decoder.create_native(env()).unwrap();
    let b = decoder.create_native(env()).unwrap();
    assert_ne!(a.handle(), b.handle());
    assert_eq!(engine.live_handles(), 2);

    a.release().expect("first decoder should release");
    assert_eq!(engine.live_handles(), 1);
    drop(b);
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn test_second_release_is_rejected() {
    let engine = Arc::new(LoopbackEngine::new());
    let decoder = LibvpxVp8Decoder::new(engine.clone());

    let raw = decoder.create_native(env()).unwrap().into_raw();
    assert!(engine.is_live(raw.as_raw()), "into_raw must not release");

    engine
        .release(HandleKind::VideoDecoder, raw.as_raw())
        .expect("first release should succeed");
    let err = engine
        .release(HandleKind::VideoDecoder, raw.as_raw())
        .unwrap_err();
    assert!(err.is_already_released(), "unexpected error: {}", err);
}

#[test]
fn test_factory_falls_back_to_next_preference() {
    let engine = Arc::new(LoopbackEngine::new().with_video_codecs(&[VideoCodec::Vp8]));
    let factory = VideoDecoderFactory::new(
        engine.clone(),
        &[VideoCodec::Av1, VideoCodec::Vp9, VideoCodec::Vp8],
    );

    assert_eq!(factory.supported_codecs(), vec![VideoCodec::Vp8]);

    let (codec, decoder) = factory
        .create_preferred(env())
        .expect("VP8 should be selected");
    assert_eq!(codec, VideoCodec::Vp8);
    assert_eq!(engine.live_handles(), 1);
    drop(decoder);

    assert!(factory.create_decoder(VideoCodec::Av1, env()).is_none());
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn test_factory_with_nothing_available() {
    let engine = Arc::new(LoopbackEngine::new().with_video_codecs(&[]));
    let factory = VideoDecoderFactory::new(engine.clone(), &[VideoCodec::Vp8, VideoCodec::Vp8]);

    assert!(factory.supported_codecs().is_empty());
    assert!(factory.decoder(VideoCodec::Vp8).is_some());
    assert!(factory.decoder(VideoCodec::Vp9).is_none());
    assert!(factory.create_preferred(env()).is_none());
}

#[test]
fn test_factory_with_custom_decoders() {
    struct NeverSupported;

    impl WrappedNativeVideoDecoder for NeverSupported {
        fn codec(&self) -> VideoCodec {
            VideoCodec::Av1
        }

        fn is_supported(&self) -> bool {
            false
        }

        fn create_native(
            &self,
            _env: EnvironmentHandle,
        ) -> Option<rtcbridge::Owned<rtcbridge::VideoDecoderHandle>> {
            panic!("create_native called on an unsupported decoder");
        }
    }

    let engine = Arc::new(LoopbackEngine::new());
    let decoders: Vec<Box<dyn WrappedNativeVideoDecoder>> = vec![
        Box::new(NeverSupported) as Box<dyn WrappedNativeVideoDecoder>,
        Box::new(LibvpxVp8Decoder::new(engine.clone())),
    ];
    let factory = VideoDecoderFactory::with_decoders(decoders);

    let (codec, _decoder) = factory.create_preferred(env()).unwrap();
    assert_eq!(codec, VideoCodec::Vp8);
}
