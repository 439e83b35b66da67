//! Shared pulse animation
//!
//! Every marker pulse is driven by the same animation group: the pulse grows
//! from its base size to `scale_factor` times that size while its material
//! fades to fully transparent, then the loop starts over. Adding a new pulse
//! never restarts the group, so all pulses stay in phase.

use modelbox_engine::{
    AnimatedProperty, AnimationCurve, AnimationGroupKey, PrimitiveKey, RenderEngine, SceneKey, Vec3,
};

use crate::{AnnotationError, PulseConfig};

/// Name of the shared animation group
pub const PULSE_GROUP_NAME: &str = "animation group for annotations";

/// Scale + fade animation shared by all marker pulses
#[derive(Clone, Debug)]
pub struct PulseAnimation {
    group: AnimationGroupKey,
    scale: AnimationCurve,
    fade: AnimationCurve,
    normalize_to: f32,
}

impl PulseAnimation {
    /// Create the (empty) animation group in `scene`
    ///
    /// `base_opacity` is the alpha the fade starts from.
    pub fn new<E: RenderEngine>(
        engine: &mut E,
        scene: SceneKey,
        config: &PulseConfig,
        base_opacity: f32,
    ) -> Result<Self, AnnotationError> {
        let scale = AnimationCurve::vector3(
            "scaling",
            AnimatedProperty::Scaling,
            config.frame_rate,
            &[(0.0, Vec3::ONE), (config.frames, Vec3::splat(config.scale_factor))],
        );
        let fade = AnimationCurve::float(
            "alpha",
            AnimatedProperty::MaterialAlpha,
            config.frame_rate,
            &[(0.0, base_opacity), (config.frames, 0.0)],
        );
        let group = engine.create_animation_group(scene, PULSE_GROUP_NAME)?;
        Ok(Self {
            group,
            scale,
            fade,
            normalize_to: config.normalize_to,
        })
    }

    /// Animate another pulse primitive
    ///
    /// The group is (re)normalized and played looped; if it is already
    /// playing the timeline carries on.
    pub fn attach<E: RenderEngine>(&self, engine: &mut E, pulse: PrimitiveKey) -> Result<(), AnnotationError> {
        engine.add_targeted_animation(self.group, &self.scale, pulse)?;
        engine.add_targeted_animation(self.group, &self.fade, pulse)?;
        engine.normalize_animation_group(self.group, 0.0, self.normalize_to)?;
        engine.play_animation_group(self.group, true)?;
        Ok(())
    }

    /// Handle of the animation group
    pub fn group(&self) -> AnimationGroupKey {
        self.group
    }

    /// Scaling curve
    pub fn scale_curve(&self) -> &AnimationCurve {
        &self.scale
    }

    /// Alpha curve
    pub fn fade_curve(&self) -> &AnimationCurve {
        &self.fade
    }
}
