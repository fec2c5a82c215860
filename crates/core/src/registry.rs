use crate::graph::ShaderType;
use indexmap::IndexMap;
use thiserror::Error;

/// Default value of a declared uniform, handed back to the host shader
/// program alongside the generated hook bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f64),
    Int(i64),
    Vec2([f64; 2]),
    Vec3([f64; 3]),
    Vec4([f64; 4]),
}

impl UniformValue {
    pub fn shader_type(&self) -> ShaderType {
        match self {
            UniformValue::Float(_) => ShaderType::Float,
            UniformValue::Int(_) => ShaderType::Int,
            UniformValue::Vec2(_) => ShaderType::Vec2,
            UniformValue::Vec3(_) => ShaderType::Vec3,
            UniformValue::Vec4(_) => ShaderType::Vec4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown uniform mode `{0}`")]
    UnknownMode(String),

    #[error("uniform `{name}` declared as `{declared}` cannot be redeclared as `{requested}`")]
    TypeConflict {
        name: String,
        declared: ShaderType,
        requested: ShaderType,
    },

    #[error("uniform `{name}` declared as `{mode}` but its default value is `{value}`")]
    ValueType {
        name: String,
        mode: ShaderType,
        value: ShaderType,
    },
}

/// The uniform table of one compile session, shared by both hooks.
///
/// Keys are `"<type> <name>"` pairs in declaration order; re-declaring the
/// same name under the same type overwrites the default value.
#[derive(Default, Debug)]
pub struct Registry {
    uniforms: IndexMap<String, UniformValue>,
}

impl Registry {
    pub fn declare(&mut self, ty: ShaderType, name: &str, value: UniformValue) -> Result<(), RegistryError> {
        if value.shader_type() != ty {
            return Err(RegistryError::ValueType {
                name: name.to_string(),
                mode: ty,
                value: value.shader_type(),
            });
        }

        for key in self.uniforms.keys() {
            let Some((declared, declared_name)) = key.split_once(' ') else {
                continue;
            };

            if declared_name == name && declared != ty.glsl() {
                return Err(RegistryError::TypeConflict {
                    name: name.to_string(),
                    declared: ShaderType::from_mode(declared).unwrap_or(ShaderType::Keyword),
                    requested: ty,
                });
            }
        }

        self.uniforms.insert(format!("{} {}", ty.glsl(), name), value);
        Ok(())
    }

    pub fn uniforms(&self) -> &IndexMap<String, UniformValue> {
        &self.uniforms
    }

    pub fn into_uniforms(self) -> IndexMap<String, UniformValue> {
        self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_declaration_wins() {
        let mut registry = Registry::default();
        registry.declare(ShaderType::Float, "brightness", UniformValue::Float(1.0)).unwrap();
        registry.declare(ShaderType::Float, "brightness", UniformValue::Float(0.5)).unwrap();

        assert_eq!(registry.uniforms().len(), 1);
        assert_eq!(registry.uniforms()["float brightness"], UniformValue::Float(0.5));
    }

    #[test]
    fn conflicting_redeclaration_is_rejected() {
        let mut registry = Registry::default();
        registry.declare(ShaderType::Float, "tint", UniformValue::Float(1.0)).unwrap();

        let err = registry.declare(ShaderType::Vec3, "tint", UniformValue::Vec3([1.0, 0.0, 0.0]));
        assert!(matches!(err, Err(RegistryError::TypeConflict { .. })));
    }

    #[test]
    fn value_must_agree_with_mode() {
        let mut registry = Registry::default();
        let err = registry.declare(ShaderType::Vec2, "offset", UniformValue::Float(0.0));
        assert!(matches!(err, Err(RegistryError::ValueType { .. })));
    }

    #[test]
    fn declaration_order_is_preserved() {
        let mut registry = Registry::default();
        registry.declare(ShaderType::Float, "b", UniformValue::Float(1.0)).unwrap();
        registry.declare(ShaderType::Int, "a", UniformValue::Int(2)).unwrap();

        let keys: Vec<_> = registry.uniforms().keys().cloned().collect();
        assert_eq!(keys, ["float b", "int a"]);
    }
}
