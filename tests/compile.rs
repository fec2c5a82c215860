use pretty_assertions::assert_eq;
use shadeform::{
    CompileError, Modifier, Options, RegistryError, ShaderProgram, ShaderType, UniformValue,
    compile, compile_with, discard, float, instance_index, int, sampler2d, texture, uniform,
    uniform_float, uniform_vec3, uv_coordinates, vec2, vec3,
};

#[derive(Default)]
struct NullProgram {
    inspected: u32,
}

impl ShaderProgram for NullProgram {
    fn inspect_hooks(&mut self) {
        self.inspected += 1;
    }
}

/// a basic test that offsets the world position by a constant vector
/// - tests that compiling even works
/// - literal formatting (4 decimal places) and vector constructor rendering
/// - a root expression scoring 3 stays inline, so the body has no declarations
#[test]
fn offset_world_position() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().world_position(|pos| pos + vec3(0.0, 1.0, 0.0));

    let output = compile(&mut program, &modifier).unwrap();

    assert_eq!(program.inspected, 1);
    assert_eq!(
        output.vertex,
        "position = position + vec3(0.0000, 1.0000, 0.0000);\nreturn position;"
    );
    assert_eq!(output.functions["getWorldPosition"], output.vertex);
    assert_eq!(output.fragment, "");
    assert!(!output.functions.contains_key("getFinalColor"));
    assert!(output.uniforms.is_empty());
}

/// a vector combined with a float scalar broadcasts:
/// - the scalar renders without a cast
/// - the vector renders as a constructor call of its own arity
#[test]
fn scalar_broadcast() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().world_position(|pos| vec3(1.0, 2.0, 3.0) * pos.x());

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(
        output.vertex,
        "position = vec3(1.0000, 2.0000, 3.0000) * position.x;\nreturn position;"
    );
}

/// scalar constructors format deterministically: floats with four decimal
/// places, integers truncated, and an int operand of a float node cast
#[test]
fn literal_formatting() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| color + float(2.0).add(int(3)));

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(
        output.fragment,
        "color = color + (2.0000 + float(3));\nreturn color;"
    );
}

/// a uniform referenced twice inside a reused product is computed once:
/// - the doubly-used product scores 1 + 2 = 4 and is hoisted exactly once
/// - later references reuse the cached temporary name
/// - declarations appear in first-hoist order
#[test]
fn repeated_subexpression_is_hoisted_once() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let brightness = uniform_float("brightness", 1.0);
        let squared = brightness * brightness;
        color * squared + squared
    });

    let output = compile(&mut program, &modifier).unwrap();

    assert_eq!(
        output.fragment,
        "float temp_0 = brightness * brightness;\n\
         vec4 temp_1 = color * temp_0;\n\
         color = temp_1 + temp_0;\n\
         return color;"
    );
    assert_eq!(output.fragment.matches("brightness * brightness").count(), 1);
    assert_eq!(output.uniforms["float brightness"], UniformValue::Float(1.0));
}

/// hooks compile against isolated render contexts:
/// - temporary names restart at `temp_0` in the second hook
/// - no declaration from the first hook leaks into the second
#[test]
fn hooks_do_not_share_temporaries() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new()
        .world_position(|pos| {
            let doubled = pos * 2.0;
            doubled + doubled
        })
        .final_color(|color| {
            let halved = color * 0.5;
            halved + halved
        });

    let output = compile(&mut program, &modifier).unwrap();

    assert_eq!(
        output.vertex,
        "vec3 temp_0 = position * 2.0000;\nposition = temp_0 + temp_0;\nreturn position;"
    );
    assert_eq!(
        output.fragment,
        "vec4 temp_0 = color * 0.5000;\ncolor = temp_0 + temp_0;\nreturn color;"
    );
    assert!(!output.fragment.contains("temp_1"));
}

/// combining two different vector types is the one documented type error
#[test]
fn mismatched_vectors_fail() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let _bad = vec2(0.0, 0.0) + vec3(1.0, 0.0, 0.0);
        color
    });

    match compile(&mut program, &modifier) {
        Err(CompileError::Type(mismatch)) => {
            assert_eq!(mismatch.left, ShaderType::Vec2);
            assert_eq!(mismatch.right, ShaderType::Vec3);
        }
        other => panic!("expected a type mismatch, got {:?}", other.map(|o| o.fragment)),
    }
}

/// every documented promotion succeeds: equal types, vector ⊕ float in both
/// orders, and int widening to float
#[test]
fn documented_promotions_succeed() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let v = vec3(1.0, 1.0, 1.0) + vec3(0.0, 0.0, 0.0);
        let broadcast = 2.0f64 * v * 0.5f64;
        let widened = broadcast.x() + instance_index();
        color + widened
    });

    assert!(compile(&mut program, &modifier).is_ok());
}

/// int scalars pick operator syntax for modulus, everything else the
/// `mod(..)` call form, and int operands of float nodes get a cast
#[test]
fn modulus_rendering() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let wave = color.x().modulo(0.25);
        let parity = instance_index().modulo(2);
        color + wave.add(parity)
    });

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(
        output.fragment,
        "color = color + (mod(color.x, 0.2500) + float((gl_InstanceID % 2)));\nreturn color;"
    );
}

/// an int-typed node used as a vector component is wrapped with a cast
#[test]
fn component_wrappers_cast_when_needed() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|_color| {
        let coords = vec2(instance_index(), 1.0);
        texture(sampler2d("palette"), coords)
    });

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(
        output.fragment,
        "color = texture(palette, vec2(float(gl_InstanceID), 1.0000));\nreturn color;"
    );
}

/// nested compiles fail fast with a state error and leave the outer
/// compile intact
#[test]
fn nested_compile_is_rejected() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let mut inner = NullProgram::default();
        let inner_result = compile(&mut inner, &Modifier::new());
        assert!(matches!(inner_result, Err(CompileError::State(_))));
        color
    });

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(output.fragment, "color = color;\nreturn color;");
}

/// a second compile on the same thread starts from a clean session
#[test]
fn sessions_reset_between_compiles() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        uniform_float("first", 1.0);
        color
    });
    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(output.uniforms.len(), 1);

    let modifier = Modifier::new().final_color(|color| {
        uniform_float("second", 2.0);
        color
    });
    let output = compile(&mut program, &modifier).unwrap();

    assert_eq!(output.uniforms.len(), 1);
    assert!(output.uniforms.contains_key("float second"));
}

/// redeclaring a uniform under a different type aborts the compile
#[test]
fn conflicting_uniforms_fail() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        uniform_float("tint", 1.0);
        uniform_vec3("tint", [1.0, 0.0, 0.0]);
        color
    });

    assert!(matches!(
        compile(&mut program, &modifier),
        Err(CompileError::Registry(RegistryError::TypeConflict { .. }))
    ));
}

/// an unknown uniform mode aborts the compile
#[test]
fn unknown_uniform_mode_fails() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let m = uniform("mat4", "model", UniformValue::Float(0.0));
        color + m
    });

    assert!(matches!(
        compile(&mut program, &modifier),
        Err(CompileError::Registry(RegistryError::UnknownMode(_)))
    ));
}

/// uniforms persist across both hooks of one compile, keyed in declaration
/// order, and redeclaring the same name+type keeps the last default
#[test]
fn uniforms_span_hooks() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new()
        .world_position(|pos| {
            let sway = uniform_float("sway", 0.25);
            pos + vec3(0.0, 1.0, 0.0) * sway
        })
        .final_color(|color| {
            let sway = uniform_float("sway", 0.5);
            let tint = uniform_vec3("tint", [1.0, 0.9, 0.8]);
            color * sway + tint.x()
        });

    let output = compile(&mut program, &modifier).unwrap();

    let keys: Vec<_> = output.uniforms.keys().cloned().collect();
    assert_eq!(keys, ["float sway", "vec3 tint"]);
    assert_eq!(output.uniforms["float sway"], UniformValue::Float(0.5));
}

/// builtin accessors construct fresh reference nodes on every call; unused
/// ones never reach the rendered body
#[test]
fn builtins_are_fresh_per_call() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let _ = discard();
        let _ = discard();
        let uv = uv_coordinates();
        color + uv.x() + uv.y()
    });

    let output = compile(&mut program, &modifier).unwrap();
    assert_eq!(
        output.fragment,
        "vec4 temp_0 = color + vTexCoord.x;\ncolor = temp_0 + vTexCoord.y;\nreturn color;"
    );
    assert!(!output.fragment.contains("discard"));
}

/// source comments attach the declaring line to hoisted temporaries
#[test]
fn source_comments_point_at_the_modifier() {
    let mut program = NullProgram::default();
    let modifier = Modifier::new().final_color(|color| {
        let brightness = uniform_float("brightness", 1.0);
        let squared = brightness.mult(brightness);
        color.mult(squared).add(squared)
    });

    let output = compile_with(&mut program, &modifier, Options { source_comments: true }).unwrap();

    let decl = output
        .fragment
        .lines()
        .find(|line| line.starts_with("//"))
        .expect("a source comment before the first declaration");
    assert!(decl.contains("compile.rs:"), "unexpected comment {decl:?}");
}
