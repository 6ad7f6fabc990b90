//! The bridge: component factories offered to one native engine.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::audio::{BuiltinNetEqFactoryFactory, NetEqFactoryFactory};
use crate::config::{BridgeConfig, DetectorSelection, NetEqSelection};
use crate::engine::NativeEngine;
use crate::handle::{NetEqFactoryHandle, Owned, PeerConnectionHandle};
use crate::network::{
    DefaultNetworkChangeDetectorFactory, NetworkChangeDetector, NetworkChangeDetectorFactory,
    NetworkChangeObserver, PlatformContext,
};
use crate::stats::StatsCollector;
use crate::video::VideoDecoderFactory;

/// What the native engine asks the bridge to build.
pub enum ComponentRequest {
    /// A NetEq factory for a new audio pipeline.
    NetEqFactory,
    /// A network change detector reporting to `observer`.
    NetworkChangeDetector {
        /// Observer implemented by the engine-facing glue.
        observer: Arc<dyn NetworkChangeObserver>,
        /// Platform context to watch.
        context: PlatformContext,
    },
}

/// A built component.
///
/// Either a native object whose ownership goes to the engine, or a Rust
/// object the engine keeps talking to.
pub enum Component {
    /// Native object. Hand it over with [`Component::into_native_raw`].
    NativeOwned(Owned<NetEqFactoryHandle>),
    /// Rust object that owns its own native state.
    ///
    /// Keeps the observer alive for as long as the detector, since the
    /// detector itself only holds it weakly.
    ObserverBacked {
        /// The detector. Dropped, and so stopped, before the observer.
        detector: Box<dyn NetworkChangeDetector>,
        /// Observer the detector reports to.
        observer: Arc<dyn NetworkChangeObserver>,
    },
}

impl Component {
    /// Transfer a native-owned component to the engine.
    ///
    /// Returns the handle, which the engine must now destroy. An
    /// observer-backed component is handed back unchanged as the error.
    pub fn into_native_raw(self) -> std::result::Result<NetEqFactoryHandle, Self> {
        match self {
            Component::NativeOwned(owned) => Ok(owned.into_raw()),
            other => Err(other),
        }
    }

    /// The detector, for an observer-backed component.
    pub fn as_detector(&self) -> Option<&dyn NetworkChangeDetector> {
        match self {
            Component::ObserverBacked { detector, .. } => Some(detector.as_ref()),
            Component::NativeOwned(_) => None,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::NativeOwned(owned) => f.debug_tuple("NativeOwned").field(owned).finish(),
            Component::ObserverBacked { .. } => f.write_str("ObserverBacked(..)"),
        }
    }
}

/// Component factories for one engine, selected by configuration.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rtcbridge::{Bridge, BridgeConfig, EnvironmentHandle, LoopbackEngine};
///
/// let bridge = Bridge::new(Arc::new(LoopbackEngine::new()), BridgeConfig::default());
/// let decoders = bridge.video_decoder_factory();
/// println!("decoders: {:?}", decoders.supported_codecs());
/// ```
pub struct Bridge {
    engine: Arc<dyn NativeEngine>,
    config: BridgeConfig,
    neteq: Option<Arc<dyn NetEqFactoryFactory>>,
    network: Option<Arc<dyn NetworkChangeDetectorFactory>>,
}

impl Bridge {
    /// Build the configured factories for `engine`.
    pub fn new(engine: Arc<dyn NativeEngine>, config: BridgeConfig) -> Self {
        let neteq: Option<Arc<dyn NetEqFactoryFactory>> = match config.audio.neteq {
            NetEqSelection::Builtin => {
                Some(Arc::new(BuiltinNetEqFactoryFactory::new(engine.clone())))
            }
            NetEqSelection::Disabled => None,
        };
        let network: Option<Arc<dyn NetworkChangeDetectorFactory>> =
            match config.network.detector {
                DetectorSelection::Platform => {
                    Some(Arc::new(DefaultNetworkChangeDetectorFactory::new(engine.clone())))
                }
                DetectorSelection::Disabled => None,
            };
        info!(
            "bridge ready: decoders {:?}, neteq {:?}, network detector {:?}",
            config.video.decoder_preference, config.audio.neteq, config.network.detector
        );
        Self {
            engine,
            config,
            neteq,
            network,
        }
    }

    /// Offer an application-supplied NetEq factory factory instead.
    pub fn with_neteq_factory_factory(mut self, factory: Arc<dyn NetEqFactoryFactory>) -> Self {
        self.neteq = Some(factory);
        self
    }

    /// Offer an application-supplied network change detector factory instead.
    pub fn with_network_change_detector_factory(
        mut self,
        factory: Arc<dyn NetworkChangeDetectorFactory>,
    ) -> Self {
        self.network = Some(factory);
        self
    }

    /// The engine.
    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    /// The configuration this bridge was built from.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Decoders in configured preference order.
    pub fn video_decoder_factory(&self) -> VideoDecoderFactory {
        VideoDecoderFactory::new(self.engine.clone(), &self.config.video.decoder_preference)
    }

    /// The NetEq factory factory, unless disabled.
    pub fn neteq_factory_factory(&self) -> Option<Arc<dyn NetEqFactoryFactory>> {
        self.neteq.clone()
    }

    /// The network change detector factory, unless disabled.
    pub fn network_change_detector_factory(&self) -> Option<Arc<dyn NetworkChangeDetectorFactory>> {
        self.network.clone()
    }

    /// Stats collector for a peer connection.
    pub fn stats_collector(&self, peer: PeerConnectionHandle) -> StatsCollector {
        StatsCollector::new(self.engine.clone(), peer)
    }

    /// Build a component on behalf of the engine.
    ///
    /// `None` means the component is disabled or could not be created; the
    /// engine should carry on without it.
    pub fn create_component(&self, request: ComponentRequest) -> Option<Component> {
        match request {
            ComponentRequest::NetEqFactory => {
                let factory = self.neteq.as_ref()?;
                factory
                    .create_native_neteq_factory()
                    .map(Component::NativeOwned)
            }
            ComponentRequest::NetworkChangeDetector { observer, context } => {
                let Some(factory) = self.network.as_ref() else {
                    debug!("network change detection disabled");
                    return None;
                };
                let detector = factory.create(observer.clone(), &context)?;
                Some(Component::ObserverBacked { detector, observer })
            }
        }
    }
}
