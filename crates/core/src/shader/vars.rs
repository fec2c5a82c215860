use super::expr::{Expr, IntoComponent};
use crate::graph::{Axis, NodeValue, Scalar, ShaderType};
use crate::registry::{RegistryError, UniformValue};
use crate::session;
use std::panic::Location;

/// Wraps a host float literal into a graph node.
#[track_caller]
pub fn float(value: f64) -> Expr {
    Expr::from_node(session::push_node(
        NodeValue::Float(Scalar::Lit(value)),
        false,
        Some(Location::caller()),
    ))
}

/// Wraps a host integer literal into a graph node.
#[track_caller]
pub fn int(value: i64) -> Expr {
    Expr::from_node(session::push_node(
        NodeValue::Int(Scalar::Lit(value as f64)),
        false,
        Some(Location::caller()),
    ))
}

#[track_caller]
pub fn vec2(x: impl IntoComponent, y: impl IntoComponent) -> Expr {
    let location = Location::caller();
    let comps = [x.into_component(), y.into_component()];
    Expr::from_node(session::push_node(NodeValue::Vec2(comps), false, Some(location)))
}

#[track_caller]
pub fn vec3(x: impl IntoComponent, y: impl IntoComponent, z: impl IntoComponent) -> Expr {
    let location = Location::caller();
    let comps = [x.into_component(), y.into_component(), z.into_component()];
    Expr::from_node(session::push_node(NodeValue::Vec3(comps), false, Some(location)))
}

#[track_caller]
pub fn vec4(
    x: impl IntoComponent,
    y: impl IntoComponent,
    z: impl IntoComponent,
    w: impl IntoComponent,
) -> Expr {
    let location = Location::caller();
    let comps = [
        x.into_component(),
        y.into_component(),
        z.into_component(),
        w.into_component(),
    ];
    Expr::from_node(session::push_node(NodeValue::Vec4(comps), false, Some(location)))
}

/// Reference to a variable the host program provides (a hook argument, a
/// varying, an attribute).
///
/// Vector-typed variables eagerly carry one accessor child per axis name, so
/// repeated component access resolves to the same node.
pub fn variable(name: impl Into<String>, ty: ShaderType) -> Expr {
    let id = session::push_node(NodeValue::Var { name: name.into(), ty }, false, None);
    let accessors = ty
        .is_vector()
        .then(|| Axis::ALL.map(|axis| session::push_node(NodeValue::Component { parent: id, axis }, true, None)));

    Expr::with_accessors(id, accessors)
}

/// Declares a `float` uniform and returns a reference to it.
#[track_caller]
pub fn uniform_float(name: &str, value: f64) -> Expr {
    declare(ShaderType::Float, name, UniformValue::Float(value))
}

/// Declares an `int` uniform and returns a reference to it.
#[track_caller]
pub fn uniform_int(name: &str, value: i64) -> Expr {
    declare(ShaderType::Int, name, UniformValue::Int(value))
}

/// Declares a `vec2` uniform and returns a reference to it.
#[track_caller]
pub fn uniform_vec2(name: &str, value: [f64; 2]) -> Expr {
    declare(ShaderType::Vec2, name, UniformValue::Vec2(value))
}

/// Declares a `vec3` uniform and returns a reference to it.
#[track_caller]
pub fn uniform_vec3(name: &str, value: [f64; 3]) -> Expr {
    declare(ShaderType::Vec3, name, UniformValue::Vec3(value))
}

/// Declares a `vec4` uniform and returns a reference to it.
#[track_caller]
pub fn uniform_vec4(name: &str, value: [f64; 4]) -> Expr {
    declare(ShaderType::Vec4, name, UniformValue::Vec4(value))
}

/// Declares a uniform by user-facing mode name. An unknown mode or a default
/// value disagreeing with the mode is a fatal registry fault.
#[track_caller]
pub fn uniform(mode: &str, name: &str, value: UniformValue) -> Expr {
    match ShaderType::from_mode(mode) {
        Some(ty) => declare(ty, name, value),
        None => {
            session::record_registry_fault(RegistryError::UnknownMode(mode.to_string()));
            variable(name, value.shader_type())
        }
    }
}

#[track_caller]
fn declare(ty: ShaderType, name: &str, value: UniformValue) -> Expr {
    session::declare_uniform(ty, name, value);
    variable(name, ty)
}

/// Index of the instance being drawn. A fresh reference node per call.
pub fn instance_index() -> Expr {
    variable("gl_InstanceID", ShaderType::Int)
}

/// Texture coordinates of the current fragment. A fresh reference node per
/// call.
pub fn uv_coordinates() -> Expr {
    variable("vTexCoord", ShaderType::Vec2)
}

/// The `discard` keyword. A fresh reference node per call.
pub fn discard() -> Expr {
    variable("discard", ShaderType::Keyword)
}

/// Reference to an externally bound 2D sampler, for [`texture`].
pub fn sampler2d(name: &str) -> Expr {
    variable(name, ShaderType::Keyword)
}

/// Samples `sampler` at `coords`, routing both through a call node.
#[track_caller]
pub fn texture(sampler: Expr, coords: Expr) -> Expr {
    Expr::from_node(session::push_node(
        NodeValue::Call {
            name: "texture",
            ret: ShaderType::Vec4,
            args: vec![sampler.into_node(), coords.into_node()],
        },
        false,
        Some(Location::caller()),
    ))
}
