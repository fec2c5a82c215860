use crate::codegen::{RenderContext, render};
use indexmap::IndexMap;
use shadeform_core::graph::Graph;
use shadeform_core::session::SessionGuard;
use shadeform_core::shader::variable;
use shadeform_core::{Expr, RegistryError, ShaderType, StateError, TypeMismatch, UniformValue};
use std::fmt::Write;
use thiserror::Error;

/// The two hook points a modifier can replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hook {
    WorldPosition,
    FinalColor,
}

impl Hook {
    fn function_name(self) -> &'static str {
        match self {
            Hook::WorldPosition => "getWorldPosition",
            Hook::FinalColor => "getFinalColor",
        }
    }

    fn argument(self) -> &'static str {
        match self {
            Hook::WorldPosition => "position",
            Hook::FinalColor => "color",
        }
    }

    fn argument_type(self) -> ShaderType {
        match self {
            Hook::WorldPosition => ShaderType::Vec3,
            Hook::FinalColor => ShaderType::Vec4,
        }
    }
}

type HookFn = Box<dyn Fn(Expr) -> Expr>;

/// Up to two hook implementations for one shader program. A hook that is
/// not provided keeps the program's stock behavior.
#[derive(Default)]
pub struct Modifier {
    world_position: Option<HookFn>,
    final_color: Option<HookFn>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the vertex-stage world position hook. The function receives
    /// the `position` argument as a `vec3` variable node.
    pub fn world_position(mut self, f: impl Fn(Expr) -> Expr + 'static) -> Self {
        self.world_position = Some(Box::new(f));
        self
    }

    /// Replaces the fragment-stage final color hook. The function receives
    /// the `color` argument as a `vec4` variable node.
    pub fn final_color(mut self, f: impl Fn(Expr) -> Expr + 'static) -> Self {
        self.final_color = Some(Box::new(f));
        self
    }

    fn hook(&self, hook: Hook) -> Option<&HookFn> {
        match hook {
            Hook::WorldPosition => self.world_position.as_ref(),
            Hook::FinalColor => self.final_color.as_ref(),
        }
    }
}

/// Target of a compile: the external shader program object that receives the
/// generated hook bodies.
pub trait ShaderProgram {
    /// Called once at compile start so the target can prepare its hook
    /// table. Side-effect-free from the compiler's perspective.
    fn inspect_hooks(&mut self);
}

/// Compiler output: the uniform table plus the generated hook bodies, both
/// keyed the way the host shader program consumes them.
#[derive(Debug, Default)]
pub struct ShaderOutput {
    pub uniforms: IndexMap<String, UniformValue>,
    pub functions: IndexMap<String, String>,
    pub vertex: String,
    pub fragment: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Prefix hoisted declarations with `// file:line` comments pointing at
    /// the modifier source that produced them.
    pub source_comments: bool,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Type(#[from] TypeMismatch),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub fn compile(program: &mut dyn ShaderProgram, modifier: &Modifier) -> Result<ShaderOutput, CompileError> {
    compile_with(program, modifier, Options::default())
}

/// Compiles `modifier` against `program`, returning the uniform table and
/// the generated hook bodies. Fails without partial output: a type, state or
/// registry fault anywhere in the modifier aborts the whole compile.
pub fn compile_with(
    program: &mut dyn ShaderProgram,
    modifier: &Modifier,
    options: Options,
) -> Result<ShaderOutput, CompileError> {
    let mut session = SessionGuard::begin()?;
    program.inspect_hooks();

    let mut output = ShaderOutput::default();
    for hook in [Hook::WorldPosition, Hook::FinalColor] {
        let Some(f) = modifier.hook(hook) else {
            continue;
        };

        let graph = session.collect(|| {
            let argument = variable(hook.argument(), hook.argument_type());
            f(argument).into_node()
        })?;

        if let Some(fault) = session.registry_fault() {
            return Err(fault.into());
        }

        let body = assemble(&graph, hook, options);
        match hook {
            Hook::WorldPosition => output.vertex = body.clone(),
            Hook::FinalColor => output.fragment = body.clone(),
        }
        output.functions.insert(hook.function_name().to_string(), body);
    }

    output.uniforms = session.finish()?.into_uniforms();
    Ok(output)
}

/// Assembles one hook's body: hoisted declarations in first-hoist order, the
/// assignment of the root expression to the hook argument, and the return of
/// that argument.
fn assemble(graph: &Graph, hook: Hook, options: Options) -> String {
    let mut ctx = RenderContext::new(options.source_comments);
    let root = render(graph, graph.root(), &mut ctx);

    let mut body = String::new();
    for decl in ctx.declarations() {
        body.push_str(decl);
        body.push('\n');
    }

    writeln!(body, "{} = {};", hook.argument(), root).ok();
    write!(body, "return {};", hook.argument()).ok();
    body
}
