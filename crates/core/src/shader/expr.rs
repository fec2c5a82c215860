use crate::graph::{Axis, BinOp, NodeId, NodeValue, Scalar, ShaderType, TypeMismatch, promote};
use crate::session;
use std::ops::{Add, Div, Mul, Rem, Sub};
use std::panic::Location;

/// Handle to one expression node of the in-flight modifier graph.
///
/// `Expr` is deliberately untyped on the Rust side: the shader-level type of
/// every node lives in the graph and is combined through the promotion
/// table, so mixing incompatible operands surfaces as a `TypeMismatch` from
/// `compile` rather than a Rust type error. The named methods
/// (`add`/`sub`/`mult`/`div`/`modulo`) are the core contract; the `std::ops`
/// impls below delegate to them.
#[derive(Clone, Copy)]
pub struct Expr {
    id: NodeId,
    accessors: Option<[NodeId; 4]>,
}

impl Expr {
    pub(crate) fn new(id: NodeId) -> Self {
        Self { id, accessors: None }
    }

    pub(crate) fn with_accessors(id: NodeId, accessors: Option<[NodeId; 4]>) -> Self {
        Self { id, accessors }
    }

    #[doc(hidden)]
    pub fn from_node(id: NodeId) -> Self {
        Self::new(id)
    }

    #[doc(hidden)]
    pub fn into_node(self) -> NodeId {
        self.id
    }

    fn ty(self) -> ShaderType {
        session::type_of(self.id)
    }

    #[track_caller]
    pub fn add(self, rhs: impl IntoOperand) -> Expr {
        self.binary(BinOp::Add, rhs)
    }

    #[track_caller]
    pub fn sub(self, rhs: impl IntoOperand) -> Expr {
        self.binary(BinOp::Sub, rhs)
    }

    #[track_caller]
    pub fn mult(self, rhs: impl IntoOperand) -> Expr {
        self.binary(BinOp::Mul, rhs)
    }

    #[track_caller]
    pub fn div(self, rhs: impl IntoOperand) -> Expr {
        self.binary(BinOp::Div, rhs)
    }

    #[track_caller]
    pub fn modulo(self, rhs: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let rhs = rhs.into_operand(self.ty());
        Expr::new(session::push_node(
            NodeValue::Modulus { lhs: self.id, rhs: rhs.id },
            false,
            Some(location),
        ))
    }

    #[track_caller]
    fn binary(self, op: BinOp, rhs: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let rhs = rhs.into_operand(self.ty());
        Expr::new(session::push_node(
            NodeValue::Binary { op, lhs: self.id, rhs: rhs.id },
            false,
            Some(location),
        ))
    }

    /// Operator-overload path: same nodes as the named methods, but no
    /// source capture, since the caller frame would point inside this crate.
    fn op_binary(self, op: BinOp, rhs: impl IntoOperand) -> Expr {
        let rhs = rhs.into_operand(self.ty());
        Expr::new(session::push_node(
            NodeValue::Binary { op, lhs: self.id, rhs: rhs.id },
            false,
            None,
        ))
    }

    fn op_modulo(self, rhs: impl IntoOperand) -> Expr {
        let rhs = rhs.into_operand(self.ty());
        Expr::new(session::push_node(
            NodeValue::Modulus { lhs: self.id, rhs: rhs.id },
            false,
            None,
        ))
    }

    #[track_caller]
    pub fn x(self) -> Expr {
        self.component(Axis::X)
    }

    #[track_caller]
    pub fn y(self) -> Expr {
        self.component(Axis::Y)
    }

    #[track_caller]
    pub fn z(self) -> Expr {
        self.component(Axis::Z)
    }

    #[track_caller]
    pub fn w(self) -> Expr {
        self.component(Axis::W)
    }

    #[track_caller]
    fn component(self, axis: Axis) -> Expr {
        if let Some(accessors) = self.accessors {
            return Expr::new(accessors[axis as usize]);
        }

        Expr::new(session::push_node(
            NodeValue::Component { parent: self.id, axis },
            false,
            Some(Location::caller()),
        ))
    }

    #[track_caller]
    pub fn sin(self) -> Expr {
        self.call1("sin")
    }

    #[track_caller]
    pub fn cos(self) -> Expr {
        self.call1("cos")
    }

    #[track_caller]
    pub fn sqrt(self) -> Expr {
        self.call1("sqrt")
    }

    #[track_caller]
    pub fn abs(self) -> Expr {
        self.call1("abs")
    }

    #[track_caller]
    pub fn floor(self) -> Expr {
        self.call1("floor")
    }

    #[track_caller]
    pub fn fract(self) -> Expr {
        self.call1("fract")
    }

    #[track_caller]
    pub fn min(self, rhs: impl IntoOperand) -> Expr {
        self.call2("min", rhs)
    }

    #[track_caller]
    pub fn max(self, rhs: impl IntoOperand) -> Expr {
        self.call2("max", rhs)
    }

    #[track_caller]
    pub fn pow(self, rhs: impl IntoOperand) -> Expr {
        self.call2("pow", rhs)
    }

    #[track_caller]
    pub fn step(self, edge: impl IntoOperand) -> Expr {
        self.call2("step", edge)
    }

    #[track_caller]
    pub fn clamp(self, lo: impl IntoOperand, hi: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let lo = lo.into_operand(self.ty());
        let hi = hi.into_operand(self.ty());
        Expr::new(session::push_node(
            NodeValue::Call {
                name: "clamp",
                ret: self.ty(),
                args: vec![self.id, lo.id, hi.id],
            },
            false,
            Some(location),
        ))
    }

    #[track_caller]
    pub fn mix(self, other: impl IntoOperand, t: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let other = other.into_operand(self.ty());
        let t = t.into_operand(ShaderType::Float);
        let ret = self.promoted(other, location);
        Expr::new(session::push_node(
            NodeValue::Call {
                name: "mix",
                ret,
                args: vec![self.id, other.id, t.id],
            },
            false,
            Some(location),
        ))
    }

    #[track_caller]
    pub fn dot(self, rhs: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let rhs = rhs.into_operand(self.ty());
        self.promoted(rhs, location);
        Expr::new(session::push_node(
            NodeValue::Call {
                name: "dot",
                ret: ShaderType::Float,
                args: vec![self.id, rhs.id],
            },
            false,
            Some(location),
        ))
    }

    #[track_caller]
    pub fn length(self) -> Expr {
        Expr::new(session::push_node(
            NodeValue::Call {
                name: "length",
                ret: ShaderType::Float,
                args: vec![self.id],
            },
            false,
            Some(Location::caller()),
        ))
    }

    #[track_caller]
    pub fn normalize(self) -> Expr {
        Expr::new(session::push_node(
            NodeValue::Call {
                name: "normalize",
                ret: self.ty(),
                args: vec![self.id],
            },
            false,
            Some(Location::caller()),
        ))
    }

    #[track_caller]
    fn call1(self, name: &'static str) -> Expr {
        Expr::new(session::push_node(
            NodeValue::Call {
                name,
                ret: self.ty(),
                args: vec![self.id],
            },
            false,
            Some(Location::caller()),
        ))
    }

    #[track_caller]
    fn call2(self, name: &'static str, rhs: impl IntoOperand) -> Expr {
        let location = Location::caller();
        let rhs = rhs.into_operand(self.ty());
        let ret = self.promoted(rhs, location);
        Expr::new(session::push_node(
            NodeValue::Call {
                name,
                ret,
                args: vec![self.id, rhs.id],
            },
            false,
            Some(location),
        ))
    }

    /// Promotes this node's type with `rhs`, recording a session fault on
    /// mismatch and falling back to `float` so building continues inertly.
    fn promoted(self, rhs: Expr, location: &'static Location<'static>) -> ShaderType {
        let (left, right) = (self.ty(), rhs.ty());
        match promote(left, right) {
            Some(ty) => ty,
            None => {
                session::record_mismatch(TypeMismatch {
                    left,
                    right,
                    location: Some(location),
                });
                ShaderType::Float
            }
        }
    }
}

/// Conversion of operands into graph nodes.
///
/// A raw numeric literal becomes an internal scalar wrapper sized to the
/// other operand's intness: int literals stay int next to an int node and
/// widen to float next to everything else.
pub trait IntoOperand {
    fn into_operand(self, other: ShaderType) -> Expr;
}

impl IntoOperand for Expr {
    fn into_operand(self, _other: ShaderType) -> Expr {
        self
    }
}

impl IntoOperand for f64 {
    fn into_operand(self, _other: ShaderType) -> Expr {
        Expr::new(session::push_node(NodeValue::Float(Scalar::Lit(self)), true, None))
    }
}

impl IntoOperand for f32 {
    fn into_operand(self, other: ShaderType) -> Expr {
        (self as f64).into_operand(other)
    }
}

impl IntoOperand for i64 {
    fn into_operand(self, other: ShaderType) -> Expr {
        let value = if other == ShaderType::Int {
            NodeValue::Int(Scalar::Lit(self as f64))
        } else {
            NodeValue::Float(Scalar::Lit(self as f64))
        };
        Expr::new(session::push_node(value, true, None))
    }
}

impl IntoOperand for i32 {
    fn into_operand(self, other: ShaderType) -> Expr {
        (self as i64).into_operand(other)
    }
}

/// Conversion of vector constructor arguments into internal scalar
/// component wrappers.
pub trait IntoComponent {
    fn into_component(self) -> NodeId;
}

impl IntoComponent for Expr {
    fn into_component(self) -> NodeId {
        session::push_node(NodeValue::Float(Scalar::Node(self.into_node())), true, None)
    }
}

macro_rules! impl_component {
    ($($num:ty),*) => {
        $(impl IntoComponent for $num {
            fn into_component(self) -> NodeId {
                session::push_node(NodeValue::Float(Scalar::Lit(self as f64)), true, None)
            }
        })*
    };
}

impl_component!(f64, f32, i64, i32);

macro_rules! impl_ops {
    ($($rhs:ty),*) => {
        $(
            impl Add<$rhs> for Expr {
                type Output = Expr;
                fn add(self, rhs: $rhs) -> Expr {
                    self.op_binary(BinOp::Add, rhs)
                }
            }

            impl Sub<$rhs> for Expr {
                type Output = Expr;
                fn sub(self, rhs: $rhs) -> Expr {
                    self.op_binary(BinOp::Sub, rhs)
                }
            }

            impl Mul<$rhs> for Expr {
                type Output = Expr;
                fn mul(self, rhs: $rhs) -> Expr {
                    self.op_binary(BinOp::Mul, rhs)
                }
            }

            impl Div<$rhs> for Expr {
                type Output = Expr;
                fn div(self, rhs: $rhs) -> Expr {
                    self.op_binary(BinOp::Div, rhs)
                }
            }

            impl Rem<$rhs> for Expr {
                type Output = Expr;
                fn rem(self, rhs: $rhs) -> Expr {
                    self.op_modulo(rhs)
                }
            }
        )*
    };
}

macro_rules! impl_ops_rev {
    ($($lhs:ty),*) => {
        $(
            impl Add<Expr> for $lhs {
                type Output = Expr;
                fn add(self, rhs: Expr) -> Expr {
                    self.into_operand(rhs.ty()).op_binary(BinOp::Add, rhs)
                }
            }

            impl Sub<Expr> for $lhs {
                type Output = Expr;
                fn sub(self, rhs: Expr) -> Expr {
                    self.into_operand(rhs.ty()).op_binary(BinOp::Sub, rhs)
                }
            }

            impl Mul<Expr> for $lhs {
                type Output = Expr;
                fn mul(self, rhs: Expr) -> Expr {
                    self.into_operand(rhs.ty()).op_binary(BinOp::Mul, rhs)
                }
            }

            impl Div<Expr> for $lhs {
                type Output = Expr;
                fn div(self, rhs: Expr) -> Expr {
                    self.into_operand(rhs.ty()).op_binary(BinOp::Div, rhs)
                }
            }

            impl Rem<Expr> for $lhs {
                type Output = Expr;
                fn rem(self, rhs: Expr) -> Expr {
                    self.into_operand(rhs.ty()).op_modulo(rhs)
                }
            }
        )*
    };
}

impl_ops!(Expr, f64, f32, i64, i32);
impl_ops_rev!(f64, f32, i64, i32);
