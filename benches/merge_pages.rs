use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use feedpager::{
    core::pagination::{Message, PaginationState},
    AccumulatorConfig, Cursor,
};

const PAGES: usize = 40;
const PAGE_SIZE: usize = 50;

fn run_session(config: AccumulatorConfig) -> usize {
    let mut state = PaginationState::<u32, u64>::new(config);
    state.update(Message::SessionRestarted { params: 0 });

    for page in 0..PAGES {
        let start = (page * PAGE_SIZE) as u64;
        let items = (start..start + PAGE_SIZE as u64).collect::<Vec<_>>();
        state.update(Message::PageLoaded {
            generation: state.generation(),
            fetched: items.len(),
            items,
            continuation: Cursor::from((page + 1).to_string()),
        });
        state.update(Message::NextPageRequested);
    }

    state.items().len()
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("append-pages", |b| {
        b.iter(|| run_session(black_box(AccumulatorConfig::default())))
    });

    c.bench_function("prepend-pages", |b| {
        b.iter(|| run_session(black_box(AccumulatorConfig::default().reversed(true))))
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
