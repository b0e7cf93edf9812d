use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_regex::Regex;

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_datetime", |b| {
        b.iter(|| Regex::new(black_box(r"\d\d?:\d\d?:\d\d?")).unwrap())
    });
}

fn bench_find(c: &mut Criterion) {
    let re = Regex::new(r"[Hh]ello [Ww]orld\s*[!]?").unwrap();
    let text = "x".repeat(200) + "Hello world !";
    c.bench_function("find_greeting", |b| b.iter(|| re.find(black_box(&text)).unwrap()));
}

fn bench_count(c: &mut Criterion) {
    let re = Regex::new(r"\w+").unwrap();
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    c.bench_function("count_words", |b| b.iter(|| re.count_matches(black_box(&text))));
}

fn bench_backtracking(c: &mut Criterion) {
    // a digit run that almost matches at every position
    let re = Regex::new(r"\d+5x").unwrap();
    let text = "1234567890".repeat(30);
    c.bench_function("backtrack_digits", |b| b.iter(|| re.find(black_box(&text))));
}

criterion_group!(
    benches,
    bench_compile,
    bench_find,
    bench_count,
    bench_backtracking
);
criterion_main!(benches);
