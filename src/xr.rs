//! Immersive XR experience
//!
//! Tracks the XR session state of a viewer. Session negotiation itself is the
//! engine's job; this type only sequences the enter/exit requests and reports
//! every state change through a callback.

use modelbox_engine::{EngineError, RenderEngine, SceneKey};

use crate::config::XrConfig;

/// State of the immersive session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum XrState {
    /// Regular (non-immersive) viewing
    #[default]
    NotInXr,
    /// Enter request made, session not running yet
    EnteringXr,
    /// Session running
    InXr,
    /// Exit request made, session still running
    ExitingXr,
}

/// Immersive session bookkeeping of one viewer
#[derive(Debug, Clone, Default)]
pub struct XrExperience {
    config: XrConfig,
    supported: bool,
    state: XrState,
}

impl XrExperience {
    pub fn new(config: XrConfig) -> Self {
        Self {
            config,
            supported: false,
            state: XrState::NotInXr,
        }
    }

    /// Ask the engine whether the configured session mode is available
    pub async fn probe<E: RenderEngine>(&mut self, engine: &mut E) -> bool {
        self.supported = engine.is_xr_supported(&self.config.session_mode).await;
        self.supported
    }

    /// Result of the last probe
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn state(&self) -> XrState {
        self.state
    }

    /// Whether a session is running
    pub fn in_xr(&self) -> bool {
        self.state == XrState::InXr
    }

    pub fn config(&self) -> &XrConfig {
        &self.config
    }

    fn transition(&mut self, state: XrState, on_state: &mut dyn FnMut(XrState)) {
        if self.state != state {
            self.state = state;
            on_state(state);
        }
    }

    /// Enter an immersive session
    ///
    /// Requires a successful earlier probe and re-checks support before
    /// requesting the session. Fails with [`EngineError::XrUnsupported`]
    /// without any state change when either check fails.
    pub async fn start<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        scene: SceneKey,
        on_state: &mut dyn FnMut(XrState),
    ) -> Result<(), EngineError> {
        if self.state != XrState::NotInXr {
            return Ok(());
        }
        if !self.supported || !engine.is_xr_supported(&self.config.session_mode).await {
            return Err(EngineError::XrUnsupported);
        }

        self.transition(XrState::EnteringXr, on_state);
        match engine
            .enter_xr(scene, &self.config.session_mode, &self.config.reference_space)
            .await
        {
            Ok(()) => {
                self.transition(XrState::InXr, on_state);
                log::info!("Entered XR ({}, {})", self.config.session_mode, self.config.reference_space);
                Ok(())
            }
            Err(err) => {
                self.transition(XrState::NotInXr, on_state);
                Err(err)
            }
        }
    }

    /// Leave the immersive session
    ///
    /// Returns false without doing anything when no session is running.
    pub async fn exit<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        scene: SceneKey,
        on_state: &mut dyn FnMut(XrState),
    ) -> Result<bool, EngineError> {
        if self.state != XrState::InXr {
            return Ok(false);
        }

        self.transition(XrState::ExitingXr, on_state);
        match engine.exit_xr(scene).await {
            Ok(()) => {
                self.transition(XrState::NotInXr, on_state);
                log::info!("Exited XR");
                Ok(true)
            }
            Err(err) => {
                self.transition(XrState::InXr, on_state);
                Err(err)
            }
        }
    }
}
