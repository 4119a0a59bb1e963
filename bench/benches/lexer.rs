use criterion::{criterion_group, criterion_main, Criterion};
use minicc::{lexer, token::Token};
use std::hint::black_box;

fn input() -> String {
    let mut src = String::with_capacity(64 * 1024);
    for i in 0..2_000 {
        src.push_str("{ return ");
        src.push_str(&i.to_string());
        src.push_str("; }\n<% %> <<= >>= ... -> ## %:%: ;\n");
    }
    src
}

fn lexer(input: &str, tokens: &mut Vec<Token>) {
    lexer::lex(input, tokens).unwrap();
    black_box(tokens.len());
}

fn criterion_benchmark(c: &mut Criterion) {
    let input = input();
    let mut tokens = Vec::with_capacity(lexer::SUGGESTED_TOKENS_CAPACITY * 32);

    c.bench_function("lexer", |b| {
        b.iter(|| {
            tokens.clear();
            lexer(black_box(&input), &mut tokens);
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
