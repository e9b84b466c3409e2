use bwtzip::{decode, Encoder, SuffixArray, SuffixTree, Traversal};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Generate repetitive text data
fn generate_repetitive_text(size: usize) -> Vec<u8> {
    let pattern = b"the_quick_brown_fox_jumps_over_the_lazy_dog_";
    let mut text = pattern.repeat(size / pattern.len());
    text.push(b'$');
    text
}

/// Generate source code-like data
fn generate_source_code(size: usize) -> Vec<u8> {
    let patterns: [&[u8]; 7] = [
        b"fn_main()_{;",
        b"let_x=42;",
        b"println(Hello,_world);",
        b"if_x>0_{",
        b"return_x;",
        b"}",
        b"}",
    ];

    let mut text = Vec::new();
    let mut i = 0;
    while text.len() < size {
        text.extend_from_slice(patterns[i % patterns.len()]);
        i += 1;
    }
    text.truncate(size);
    text.push(b'$');
    text
}

/// Generate low-repetition data (simulating base64)
fn generate_low_repetition(size: usize) -> Vec<u8> {
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut text = Vec::with_capacity(size + 1);
    let mut seed = 12345u64;

    for _ in 0..size {
        // Simple LCG random
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        text.push(chars[(seed % chars.len() as u64) as usize]);
    }
    text.push(b'$');
    text
}

fn bench_tree_construction(c: &mut Criterion) {
    let sizes = [1_000, 10_000, 50_000];
    let mut group = c.benchmark_group("suffix_tree");

    for size in sizes.iter() {
        let data = generate_repetitive_text(*size);

        for traversal in [Traversal::SkipCount, Traversal::Naive] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", traversal), size),
                &data,
                |b, data| {
                    b.iter(|| {
                        let tree = SuffixTree::build_with(black_box(data), traversal).unwrap();
                        black_box(tree.node_count())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_suffix_array(c: &mut Criterion) {
    let sizes = [1_000, 10_000, 50_000];
    let mut group = c.benchmark_group("suffix_array");

    for size in sizes.iter() {
        let data = generate_source_code(*size);
        let tree = SuffixTree::build(&data).unwrap();

        group.bench_with_input(BenchmarkId::new("from_tree", size), &tree, |b, tree| {
            b.iter(|| black_box(SuffixArray::from_tree(tree)));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let sizes = [1_000, 10_000, 50_000];
    let mut group = c.benchmark_group("encode");

    for size in sizes.iter() {
        let inputs = [
            ("repetitive", generate_repetitive_text(*size)),
            ("source_code", generate_source_code(*size)),
            ("low_repetition", generate_low_repetition(*size)),
        ];

        for (name, data) in inputs.iter() {
            group.bench_with_input(BenchmarkId::new(*name, size), data, |b, data| {
                b.iter(|| black_box(Encoder::new().encode(black_box(data)).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let sizes = [1_000, 10_000, 100_000];
    let mut group = c.benchmark_group("decode");

    for size in sizes.iter() {
        let inputs = [
            ("repetitive", generate_repetitive_text(*size)),
            ("low_repetition", generate_low_repetition(*size)),
        ];

        for (name, data) in inputs.iter() {
            let packed = Encoder::new().encode(data).unwrap();

            group.bench_with_input(BenchmarkId::new(*name, size), &packed, |b, packed| {
                b.iter(|| black_box(decode(black_box(packed)).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_construction,
    bench_suffix_array,
    bench_encode,
    bench_decode
);
criterion_main!(benches);
