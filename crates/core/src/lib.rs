pub mod graph;
pub mod registry;
pub mod session;
pub mod shader;

pub use graph::{Graph, ShaderType, TypeMismatch};
pub use registry::{Registry, RegistryError, UniformValue};
pub use session::{SessionGuard, StateError};
pub use shader::{Expr, IntoComponent, IntoOperand};
