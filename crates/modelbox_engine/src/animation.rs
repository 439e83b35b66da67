//! Keyframe animation curves
//!
//! Curves are plain data handed to the engine, which samples them every frame
//! for each target primitive of an animation group.

use modelbox_math::{lerp, inverse_lerp, Vec3};

/// Property of a primitive driven by a curve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatedProperty {
    /// Primitive scaling (vector)
    Scaling,
    /// Alpha of the primitive's material (float)
    MaterialAlpha,
}

/// Value of a keyframe
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationValue {
    Float(f32),
    Vector3(Vec3),
}

impl AnimationValue {
    fn interpolate(self, other: Self, t: f32) -> Self {
        match (self, other) {
            (AnimationValue::Float(a), AnimationValue::Float(b)) => AnimationValue::Float(lerp(a, b, t)),
            (AnimationValue::Vector3(a), AnimationValue::Vector3(b)) => AnimationValue::Vector3(a.lerp(b, t)),
            // Curves are built from a single value type
            (a, _) => a,
        }
    }
}

/// A single keyframe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub frame: f32,
    pub value: AnimationValue,
}

impl Keyframe {
    pub fn new(frame: f32, value: AnimationValue) -> Self {
        Self { frame, value }
    }
}

/// A named keyframed curve for one property
///
/// Curves hold their last value past the final keyframe; looping is a
/// property of the animation group playing them.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationCurve {
    /// Curve name (for debugging)
    pub name: String,
    /// Property driven by this curve
    pub property: AnimatedProperty,
    /// Frames per second
    pub frame_rate: f32,
    keys: Vec<Keyframe>,
}

impl AnimationCurve {
    /// Create a curve of float keys `(frame, value)`
    pub fn float(name: impl Into<String>, property: AnimatedProperty, frame_rate: f32, keys: &[(f32, f32)]) -> Self {
        let mut keys: Vec<Keyframe> = keys
            .iter()
            .map(|&(frame, v)| Keyframe::new(frame, AnimationValue::Float(v)))
            .collect();
        keys.sort_by(|a, b| a.frame.total_cmp(&b.frame));
        Self {
            name: name.into(),
            property,
            frame_rate,
            keys,
        }
    }

    /// Create a curve of vector keys `(frame, value)`
    pub fn vector3(name: impl Into<String>, property: AnimatedProperty, frame_rate: f32, keys: &[(f32, Vec3)]) -> Self {
        let mut keys: Vec<Keyframe> = keys
            .iter()
            .map(|&(frame, v)| Keyframe::new(frame, AnimationValue::Vector3(v)))
            .collect();
        keys.sort_by(|a, b| a.frame.total_cmp(&b.frame));
        Self {
            name: name.into(),
            property,
            frame_rate,
            keys,
        }
    }

    /// Keyframes, sorted by frame
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Frame of the last keyframe
    pub fn last_frame(&self) -> f32 {
        self.keys.last().map(|k| k.frame).unwrap_or(0.0)
    }

    /// Sample the curve at `frame`
    ///
    /// Frames before the first key return the first value, frames after the
    /// last key return the last value. A curve without keys yields None.
    pub fn sample(&self, frame: f32) -> Option<AnimationValue> {
        let first = self.keys.first()?;
        if frame <= first.frame {
            return Some(first.value);
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if frame <= b.frame {
                let t = inverse_lerp(a.frame, b.frame, frame);
                return Some(a.value.interpolate(b.value, t));
            }
        }
        self.keys.last().map(|k| k.value)
    }
}
