mod node;
mod types;

use std::fmt::Debug;
use std::panic::Location;

pub use node::*;
pub use types::*;

/// One hook's expression graph.
///
/// Built by executing the hook's modifier function: every helper call appends
/// a node ([`NodeValue`]) referring to earlier nodes by address ([`NodeId`]).
/// Nodes are append-only and typed once, at push time.
pub struct Graph {
    nodes: Vec<GraphNode>,
    root: NodeId,
}

#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    fault: Option<TypeMismatch>,
}

struct GraphNode {
    value: NodeValue,
    ty: ShaderType,
    internal: bool,
    location: Option<&'static Location<'static>>,
    dependants: Vec<NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node, typing it from its already-typed operands and
    /// recording a dependant edge on each operand (one edge per use).
    ///
    /// A failed promotion records the first fault and falls back to `float`
    /// so graph building continues inertly; the fault aborts the compile
    /// before anything is rendered.
    pub fn push(
        &mut self,
        value: NodeValue,
        internal: bool,
        location: Option<&'static Location<'static>>,
    ) -> NodeId {
        let ty = match value.result_type(|id| self.nodes[id.into_raw()].ty) {
            Ok(ty) => ty,
            Err(mismatch) => {
                self.record_fault(TypeMismatch { location, ..mismatch });
                ShaderType::Float
            }
        };

        let id = NodeId::from_raw(self.nodes.len());
        for dep in value.iter_dependencies() {
            self.nodes[dep.into_raw()].dependants.push(id);
        }

        self.nodes.push(GraphNode {
            value,
            ty,
            internal,
            location: if internal { None } else { location },
            dependants: Vec::new(),
        });
        id
    }

    pub fn record_fault(&mut self, fault: TypeMismatch) {
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }

    pub fn type_of(&self, id: NodeId) -> ShaderType {
        self.nodes[id.into_raw()].ty
    }

    pub fn finish(self, root: NodeId) -> Result<Graph, TypeMismatch> {
        match self.fault {
            Some(fault) => Err(fault),
            None => Ok(Graph { nodes: self.nodes, root }),
        }
    }
}

impl Graph {
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + DoubleEndedIterator + '_ {
        (0..self.nodes.len()).map(NodeId::from_raw)
    }

    pub fn value_of(&self, id: NodeId) -> &NodeValue {
        &self.nodes[id.into_raw()].value
    }

    pub fn type_of(&self, id: NodeId) -> ShaderType {
        self.nodes[id.into_raw()].ty
    }

    /// True for nodes the compiler synthesized itself (literal wrappers,
    /// vector components, eager variable accessors).
    pub fn is_internal(&self, id: NodeId) -> bool {
        self.nodes[id.into_raw()].internal
    }

    pub fn location_of(&self, id: NodeId) -> Option<&'static Location<'static>> {
        self.nodes[id.into_raw()].location
    }

    /// Number of times `id` appears as an operand of another node. The final
    /// read of the root is not an operand use.
    pub fn uses_of(&self, id: NodeId) -> usize {
        self.nodes[id.into_raw()].dependants.len()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph {{")?;
        for id in self.iter() {
            writeln!(f, "\t{:?} {:?} = {:?}", id, self.type_of(id), self.value_of(id))?;
        }
        writeln!(f, "}}")?;

        Ok(())
    }
}
