//! Vector and matrix primitives.

pub mod mat4;
pub mod utils;
pub mod vec2;
pub mod vec3;
pub mod vec4;
