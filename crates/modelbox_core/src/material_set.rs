//! Per-state marker material templates
//!
//! Templates are never assigned to primitives directly. Annotations clone
//! them onto their own primitives so that property changes stay local.

use modelbox_engine::{Color3, MaterialDesc, MaterialKey, RenderEngine, SceneKey};

use crate::{AnnotationError, MarkerConfig, VisualState};

/// Color and opacity of a marker style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialStyle {
    /// Emissive color
    pub color: Color3,
    /// Opacity (1.0 = opaque)
    pub opacity: f32,
}

impl MaterialStyle {
    pub fn new(color: Color3, opacity: f32) -> Self {
        Self { color, opacity }
    }

    /// Unlit material description of this style
    pub fn to_desc(self) -> MaterialDesc {
        MaterialDesc {
            emissive_color: self.color,
            alpha: self.opacity,
            disable_lighting: true,
        }
    }
}

/// One material template per [`VisualState`]
#[derive(Clone, Debug)]
pub struct MaterialSet {
    inactive: (MaterialStyle, MaterialKey),
    hover: (MaterialStyle, MaterialKey),
    active: (MaterialStyle, MaterialKey),
}

impl MaterialSet {
    /// Create the three templates in `scene`
    pub fn new<E: RenderEngine>(engine: &mut E, scene: SceneKey, config: &MarkerConfig) -> Result<Self, AnnotationError> {
        let mut created: Vec<(MaterialStyle, MaterialKey)> = Vec::with_capacity(VisualState::ALL.len());
        for state in VisualState::ALL {
            let style = config.style(state);
            match engine.create_material(scene, &format!("material_for_{}_markers", state.name()), &style.to_desc()) {
                Ok(material) => created.push((style, material)),
                Err(err) => {
                    for (_, material) in created {
                        engine.dispose_material(material);
                    }
                    return Err(err.into());
                }
            }
        }
        let (inactive, hover, active) = (created[0], created[1], created[2]);
        Ok(Self { inactive, hover, active })
    }

    fn entry(&self, state: VisualState) -> &(MaterialStyle, MaterialKey) {
        match state {
            VisualState::Inactive => &self.inactive,
            VisualState::Hover => &self.hover,
            VisualState::Active => &self.active,
        }
    }

    /// Style of a state
    pub fn style(&self, state: VisualState) -> MaterialStyle {
        self.entry(state).0
    }

    /// Template material of a state
    pub fn material(&self, state: VisualState) -> MaterialKey {
        self.entry(state).1
    }

    /// Dispose the templates
    pub fn dispose<E: RenderEngine>(&self, engine: &mut E) {
        for state in VisualState::ALL {
            engine.dispose_material(self.material(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelbox_engine::HeadlessEngine;

    #[test]
    fn test_templates_follow_config() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let set = MaterialSet::new(&mut engine, scene, &MarkerConfig::default()).unwrap();

        let inactive = engine.material(set.material(VisualState::Inactive)).unwrap();
        assert_eq!(inactive.name, "material_for_inactive_markers");
        assert_eq!(inactive.emissive_color, Color3::RED);
        assert_eq!(inactive.alpha, 0.8);
        assert!(inactive.disable_lighting);

        let active = engine.material(set.material(VisualState::Active)).unwrap();
        assert_eq!(active.emissive_color, Color3::BLUE);
        assert_eq!(set.style(VisualState::Hover).color, Color3::GREEN);
    }

    #[test]
    fn test_new_on_disposed_scene_fails() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        engine.dispose_scene(scene);
        assert!(MaterialSet::new(&mut engine, scene, &MarkerConfig::default()).is_err());
        assert_eq!(engine.material_count(), 0);
    }

    #[test]
    fn test_dispose() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let set = MaterialSet::new(&mut engine, scene, &MarkerConfig::default()).unwrap();
        set.dispose(&mut engine);
        assert_eq!(engine.material_count(), 0);
    }
}
