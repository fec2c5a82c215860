pub mod graph {
    pub use shadeform_core::graph::*;
}

pub use shadeform_core::shader::{
    Expr, IntoComponent, IntoOperand, discard, float, instance_index, int, sampler2d, texture,
    uniform, uniform_float, uniform_int, uniform_vec2, uniform_vec3, uniform_vec4, uv_coordinates,
    variable, vec2, vec3, vec4,
};
pub use shadeform_core::{Graph, Registry, RegistryError, ShaderType, StateError, TypeMismatch, UniformValue};
pub use shadeform_glsl::{CompileError, Modifier, Options, ShaderOutput, ShaderProgram, compile, compile_with};

#[cfg(feature = "rewrite")]
pub use shadeform_rewrite::{ParseError, rewrite_function};
