use criterion::{black_box, criterion_group, criterion_main, Criterion};

use recite_core::model::UnitFilter;
use recite_core::parser::parse_bank_str;
use recite_core::pool::filter_pool;

fn synthetic_bank(units: usize, per_unit: usize) -> String {
    let mut s = String::new();
    for u in 0..units {
        s.push_str(&format!("[Unit {} > Part {} > Lesson {u}]\n", u / 10, u % 10));
        s.push_str(&format!("#Grammar point for lesson {u}.\n"));
        for i in 0..per_unit {
            s.push_str(&format!("This is sentence {i} of lesson {u}.|이것은 {u}과의 {i}번 문장이다.\n"));
        }
        s.push('\n');
    }
    s
}

fn bench_parse_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bank");

    let small = synthetic_bank(5, 10);
    let large = synthetic_bank(100, 30);

    group.bench_function("small", |b| b.iter(|| parse_bank_str(black_box(&small))));
    group.bench_function("large", |b| b.iter(|| parse_bank_str(black_box(&large))));

    group.finish();
}

fn bench_filter_pool(c: &mut Criterion) {
    let bank = parse_bank_str(&synthetic_bank(100, 30));
    let mastered: Vec<_> = bank.questions.iter().step_by(3).cloned().collect();
    let units: UnitFilter = "Unit 3".parse().unwrap();

    c.bench_function("filter_pool_all_units", |b| {
        b.iter(|| {
            filter_pool(
                black_box(&bank.questions),
                &UnitFilter::all(),
                black_box(&mastered),
                false,
            )
        })
    });

    c.bench_function("filter_pool_one_major", |b| {
        b.iter(|| filter_pool(black_box(&bank.questions), &units, black_box(&mastered), false))
    });
}

criterion_group!(benches, bench_parse_bank, bench_filter_pool);
criterion_main!(benches);
