use std::fmt::{self, Debug, Display};
use std::panic::Location;
use thiserror::Error;

/// Shader-level type of an expression node, fixed once per node.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub enum ShaderType {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    /// Opaque keywords the generated source passes through verbatim
    /// (`discard`, sampler names). Never declared, never promoted.
    Keyword,
}

impl ShaderType {
    pub fn is_vector(self) -> bool {
        matches!(self, ShaderType::Vec2 | ShaderType::Vec3 | ShaderType::Vec4)
    }

    /// The type's spelling in generated source and uniform keys.
    pub fn glsl(self) -> &'static str {
        match self {
            ShaderType::Int => "int",
            ShaderType::Float => "float",
            ShaderType::Vec2 => "vec2",
            ShaderType::Vec3 => "vec3",
            ShaderType::Vec4 => "vec4",
            ShaderType::Keyword => "keyword",
        }
    }

    /// Resolves a user-facing uniform mode name.
    pub fn from_mode(mode: &str) -> Option<Self> {
        Some(match mode {
            "int" => ShaderType::Int,
            "float" => ShaderType::Float,
            "vec2" => ShaderType::Vec2,
            "vec3" => ShaderType::Vec3,
            "vec4" => ShaderType::Vec4,
            _ => return None,
        })
    }
}

/// The implicit-conversion table. In priority order: equal types keep their
/// type, a vector absorbs a float scalar (broadcast), int widens to float.
/// Everything else is a mismatch.
pub fn promote(a: ShaderType, b: ShaderType) -> Option<ShaderType> {
    match (a, b) {
        _ if a == b => Some(a),
        (v, ShaderType::Float) if v.is_vector() => Some(v),
        (ShaderType::Float, v) if v.is_vector() => Some(v),
        (ShaderType::Float, ShaderType::Int) | (ShaderType::Int, ShaderType::Float) => Some(ShaderType::Float),
        _ => None,
    }
}

/// Two operand types the promotion table cannot reconcile. `location` is the
/// best-effort source position of the combining call, when one was captured.
#[derive(Clone, Copy, Debug, Error)]
#[error("cannot combine `{left}` with `{right}`")]
pub struct TypeMismatch {
    pub left: ShaderType,
    pub right: ShaderType,
    pub location: Option<&'static Location<'static>>,
}

impl Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl())
    }
}

impl Debug for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_types_keep_their_type() {
        for ty in [ShaderType::Int, ShaderType::Float, ShaderType::Vec2, ShaderType::Vec3, ShaderType::Vec4] {
            assert_eq!(promote(ty, ty), Some(ty));
        }
    }

    #[test]
    fn vector_absorbs_float() {
        for vec in [ShaderType::Vec2, ShaderType::Vec3, ShaderType::Vec4] {
            assert_eq!(promote(vec, ShaderType::Float), Some(vec));
            assert_eq!(promote(ShaderType::Float, vec), Some(vec));
        }
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(promote(ShaderType::Int, ShaderType::Float), Some(ShaderType::Float));
        assert_eq!(promote(ShaderType::Float, ShaderType::Int), Some(ShaderType::Float));
    }

    #[test]
    fn everything_else_mismatches() {
        assert_eq!(promote(ShaderType::Vec2, ShaderType::Vec3), None);
        assert_eq!(promote(ShaderType::Vec4, ShaderType::Vec2), None);
        assert_eq!(promote(ShaderType::Vec3, ShaderType::Int), None);
        assert_eq!(promote(ShaderType::Int, ShaderType::Vec4), None);
        assert_eq!(promote(ShaderType::Keyword, ShaderType::Float), None);
    }
}
