use super::types::{ShaderType, TypeMismatch, promote};
use std::fmt::{Debug, LowerHex};

/// Address of a node inside one hook's expression graph.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn into_raw(self) -> usize {
        self.0 as _
    }

    pub fn from_raw(raw: usize) -> Self {
        Self(raw as _)
    }
}

/// Payload of a scalar wrapper node: a host literal, or another node whose
/// value the wrapper adapts to its declared scalar type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Lit(f64),
    Node(NodeId),
}

/// Component axis of a vector value.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::W];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::W => "w",
        }
    }
}

/// Arithmetic operator of a binary node. Modulus is its own node kind since
/// it renders as a `mod(..)` call for non-integer operands.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeValue {
    Float(Scalar),
    Int(Scalar),

    Vec2([NodeId; 2]),
    Vec3([NodeId; 3]),
    Vec4([NodeId; 4]),

    Call {
        name: &'static str,
        ret: ShaderType,
        args: Vec<NodeId>,
    },

    Var {
        name: String,
        ty: ShaderType,
    },

    Component {
        parent: NodeId,
        axis: Axis,
    },

    Binary {
        op: BinOp,
        lhs: NodeId,
        rhs: NodeId,
    },

    Modulus {
        lhs: NodeId,
        rhs: NodeId,
    },
}

impl NodeValue {
    /// Result type of this node given the types of its operands. Operator
    /// nodes go through the promotion table; everything else is fixed at
    /// construction.
    pub fn result_type(&self, ty_of: impl Fn(NodeId) -> ShaderType) -> Result<ShaderType, TypeMismatch> {
        Ok(match *self {
            NodeValue::Float(_) => ShaderType::Float,
            NodeValue::Int(_) => ShaderType::Int,

            NodeValue::Vec2(_) => ShaderType::Vec2,
            NodeValue::Vec3(_) => ShaderType::Vec3,
            NodeValue::Vec4(_) => ShaderType::Vec4,

            NodeValue::Call { ret, .. } => ret,
            NodeValue::Var { ty, .. } => ty,
            NodeValue::Component { .. } => ShaderType::Float,

            NodeValue::Binary { lhs, rhs, .. } | NodeValue::Modulus { lhs, rhs } => {
                let (left, right) = (ty_of(lhs), ty_of(rhs));
                match promote(left, right) {
                    Some(ty) => ty,
                    None => {
                        return Err(TypeMismatch {
                            left,
                            right,
                            location: None,
                        });
                    }
                }
            }
        })
    }

    pub fn index_dependency(&self, idx: usize) -> Option<NodeId> {
        match *self {
            NodeValue::Float(Scalar::Node(x)) | NodeValue::Int(Scalar::Node(x)) => (idx == 0).then_some(x),
            NodeValue::Float(Scalar::Lit(_)) | NodeValue::Int(Scalar::Lit(_)) => None,

            NodeValue::Vec2(comps) => comps.get(idx).copied(),
            NodeValue::Vec3(comps) => comps.get(idx).copied(),
            NodeValue::Vec4(comps) => comps.get(idx).copied(),

            NodeValue::Call { ref args, .. } => args.get(idx).copied(),
            NodeValue::Var { .. } => None,
            NodeValue::Component { parent, .. } => (idx == 0).then_some(parent),

            NodeValue::Binary { lhs, rhs, .. } | NodeValue::Modulus { lhs, rhs } => match idx {
                0 => Some(lhs),
                1 => Some(rhs),
                _ => None,
            },
        }
    }

    pub fn iter_dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut i = 0;
        std::iter::from_fn(move || {
            let dep = self.index_dependency(i)?;
            i += 1;
            Some(dep)
        })
    }

    /// True for the binary operator kinds (modulus included).
    pub fn is_binary(&self) -> bool {
        matches!(self, NodeValue::Binary { .. } | NodeValue::Modulus { .. })
    }

    pub fn is_var(&self) -> bool {
        matches!(self, NodeValue::Var { .. })
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:0>4x}", self.0)
    }
}

impl LowerHex for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
