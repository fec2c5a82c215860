use criterion::{Criterion, criterion_group, criterion_main};
use shadeform::{Modifier, ShaderProgram, compile, uniform_float, uniform_vec3, vec3, vec4};
use std::hint::black_box;

struct BenchProgram;

impl ShaderProgram for BenchProgram {
    fn inspect_hooks(&mut self) {}
}

fn modifier() -> Modifier {
    Modifier::new()
        .world_position(|pos| {
            let sway = uniform_float("sway", 0.5);
            let offset = vec3(pos.x().sin(), 0.0, pos.z().cos()) * sway;
            pos + offset
        })
        .final_color(|color| {
            let tint = uniform_vec3("tint", [1.0, 0.9, 0.8]);
            let lit = vec4(tint.x(), tint.y(), tint.z(), 1.0);
            color * lit + color * 0.1
        })
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("compile (two hooks)", |b| {
        b.iter(|| {
            let mut program = BenchProgram;
            black_box(compile(&mut program, &modifier()).unwrap())
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
