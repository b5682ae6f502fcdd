use balanced_collections::arena::{Handle, TypedArena};
use criterion::{criterion_group, criterion_main, Criterion};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 100;

struct Link {
    next: Option<Handle>,
}

fn bench_arena(c: &mut Criterion) {
    c.bench_function("bench arena", |b| {
        b.iter(|| {
            let mut arena = TypedArena::new(CHUNK_SIZE);
            let mut curr = arena.allocate(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena.allocate(Link { next: Some(curr) });
            }
            arena
        })
    });
}

fn bench_arena_recycle(c: &mut Criterion) {
    c.bench_function("bench arena recycle", |b| {
        let mut arena = TypedArena::new(CHUNK_SIZE);
        b.iter(|| {
            let mut curr = arena.allocate(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena.allocate(Link { next: Some(curr) });
            }
            let mut next = Some(curr);
            while let Some(handle) = next {
                next = arena.free(&handle).next;
            }
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box", |b| {
        b.iter(|| {
            struct Boxed {
                next: Option<Box<Boxed>>,
            }

            let mut curr = Box::new(Boxed { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = Box::new(Boxed { next: Some(curr) });
            }
            curr
        })
    });
}

criterion_group!(benches, bench_arena, bench_arena_recycle, bench_box);
criterion_main!(benches);
