mod expr;
mod vars;

pub use expr::{Expr, IntoComponent, IntoOperand};
pub use vars::{
    discard, float, instance_index, int, sampler2d, texture, uniform, uniform_float, uniform_int,
    uniform_vec2, uniform_vec3, uniform_vec4, uv_coordinates, variable, vec2, vec3, vec4,
};
