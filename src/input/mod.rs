//! Input handling module
//!
//! Maps raw host pointer and keyboard events to viewer inputs.

mod pointer_mapper;

pub use pointer_mapper::{PointerMapper, PointerInput, InputAction, Key, KeyState};
