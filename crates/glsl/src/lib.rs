mod codegen;
mod compile;

pub use compile::{CompileError, Modifier, Options, ShaderOutput, ShaderProgram, compile, compile_with};
