use shadeform_core::graph::{Graph, NodeId, NodeValue, Scalar, ShaderType};
use std::collections::HashMap;
use std::fmt::Write;

/// Per-hook rendering state: the temporary-name counter, the ordered list of
/// declaration statements, and the names already assigned to hoisted nodes.
///
/// One context lives exactly as long as one hook's body is being assembled;
/// the next hook starts from a fresh one, so temporary names and
/// declarations never leak across hooks.
pub(crate) struct RenderContext {
    next_temp: u32,
    decls: Vec<String>,
    temps: HashMap<NodeId, String>,
    source_comments: bool,
}

impl RenderContext {
    pub fn new(source_comments: bool) -> Self {
        Self {
            next_temp: 0,
            decls: Vec::new(),
            temps: HashMap::new(),
            source_comments,
        }
    }

    pub fn declarations(&self) -> &[String] {
        &self.decls
    }
}

/// Renders `id` to an expression fragment, hoisting it into a named
/// temporary first when the planner calls for it. Hoisting is idempotent:
/// a node renders its declaration once and its cached name thereafter.
pub(crate) fn render(graph: &Graph, id: NodeId, ctx: &mut RenderContext) -> String {
    if let Some(name) = ctx.temps.get(&id) {
        return name.clone();
    }

    let text = render_value(graph, id, ctx);
    if !should_hoist(graph, id) {
        return text;
    }

    let name = format!("temp_{}", ctx.next_temp);
    ctx.next_temp += 1;

    let mut decl = String::new();
    if ctx.source_comments
        && let Some(location) = graph.location_of(id)
    {
        writeln!(decl, "// {}:{}", location.file(), location.line()).ok();
    }
    write!(decl, "{} {} = {};", graph.type_of(id).glsl(), name, text).ok();

    ctx.decls.push(decl);
    ctx.temps.insert(id, name.clone());
    name
}

/// Hoisting policy. Variables and compiler-internal wrappers always render
/// inline; everything else is scored as
/// `1 (binary) + 2 (vector-typed) + use-count` and hoisted above 3.
fn should_hoist(graph: &Graph, id: NodeId) -> bool {
    let value = graph.value_of(id);
    if value.is_var() || graph.is_internal(id) {
        return false;
    }

    let mut score = graph.uses_of(id);
    if value.is_binary() {
        score += 1;
    }
    if graph.type_of(id).is_vector() {
        score += 2;
    }

    score > 3
}

fn render_value(graph: &Graph, id: NodeId, ctx: &mut RenderContext) -> String {
    let ty = graph.type_of(id);
    match graph.value_of(id) {
        NodeValue::Float(Scalar::Lit(x)) => format!("{:.4}", x),
        NodeValue::Int(Scalar::Lit(x)) => format!("{}", *x as i64),

        NodeValue::Float(Scalar::Node(inner)) => {
            let text = render(graph, *inner, ctx);
            if graph.type_of(*inner) == ShaderType::Float {
                text
            } else {
                format!("float({})", text)
            }
        }

        NodeValue::Int(Scalar::Node(inner)) => {
            let text = render(graph, *inner, ctx);
            if graph.type_of(*inner) == ShaderType::Int {
                text
            } else {
                format!("int({})", text)
            }
        }

        NodeValue::Vec2(comps) => constructor(graph, ty, comps, ctx),
        NodeValue::Vec3(comps) => constructor(graph, ty, comps, ctx),
        NodeValue::Vec4(comps) => constructor(graph, ty, comps, ctx),

        NodeValue::Call { name, args, .. } => {
            let args: Vec<String> = args.iter().map(|arg| render(graph, *arg, ctx)).collect();
            format!("{}({})", name, args.join(", "))
        }

        NodeValue::Var { name, .. } => name.clone(),

        NodeValue::Component { parent, axis } => {
            format!("{}.{}", render(graph, *parent, ctx), axis.name())
        }

        NodeValue::Binary { op, lhs, rhs } => {
            let lhs = operand(graph, *lhs, ty, ctx);
            let rhs = operand(graph, *rhs, ty, ctx);
            format!("{} {} {}", lhs, op.symbol(), rhs)
        }

        NodeValue::Modulus { lhs, rhs } => {
            if graph.type_of(*lhs) == ShaderType::Int && graph.type_of(*rhs) == ShaderType::Int {
                format!(
                    "{} % {}",
                    operand(graph, *lhs, ty, ctx),
                    operand(graph, *rhs, ty, ctx)
                )
            } else {
                format!(
                    "mod({}, {})",
                    float_cast(graph, *lhs, ctx),
                    float_cast(graph, *rhs, ctx)
                )
            }
        }
    }
}

/// Vector nodes always render as a constructor call listing all components.
fn constructor(graph: &Graph, ty: ShaderType, comps: &[NodeId], ctx: &mut RenderContext) -> String {
    let comps: Vec<String> = comps.iter().map(|comp| render(graph, *comp, ctx)).collect();
    format!("{}({})", ty.glsl(), comps.join(", "))
}

/// Renders a binary operand: a nested operator node that was not hoisted is
/// parenthesized to preserve grouping, and an int operand feeding a
/// float-typed node gets an explicit cast.
fn operand(graph: &Graph, id: NodeId, parent_ty: ShaderType, ctx: &mut RenderContext) -> String {
    let mut text = render(graph, id, ctx);
    if renders_as_operator(graph, id) && !ctx.temps.contains_key(&id) {
        text = format!("({})", text);
    }
    if parent_ty == ShaderType::Float && graph.type_of(id) == ShaderType::Int {
        text = format!("float({})", text);
    }
    text
}

/// Whether `id` renders with infix operator syntax. Modulus only does for
/// integer operands; the `mod(..)` call form needs no grouping.
fn renders_as_operator(graph: &Graph, id: NodeId) -> bool {
    match graph.value_of(id) {
        NodeValue::Binary { .. } => true,
        NodeValue::Modulus { lhs, rhs } => {
            graph.type_of(*lhs) == ShaderType::Int && graph.type_of(*rhs) == ShaderType::Int
        }
        _ => false,
    }
}

fn float_cast(graph: &Graph, id: NodeId, ctx: &mut RenderContext) -> String {
    let text = render(graph, id, ctx);
    if graph.type_of(id) == ShaderType::Int {
        format!("float({})", text)
    } else {
        text
    }
}
