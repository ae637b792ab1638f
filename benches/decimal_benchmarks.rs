use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal_macros::dec;

use flowpath_core::decimal::{ops, ExchangeRate, Money, MoneyMap};

fn bench_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimal_ops");

    group.bench_function("rescale", |b| {
        b.iter(|| ops::rescale(black_box(dec!(123.456789)), black_box(4)).unwrap())
    });

    group.bench_function("mul_rescale", |b| {
        b.iter(|| ops::mul_rescale(black_box(dec!(100.00)), black_box(dec!(0.92)), black_box(2)).unwrap())
    });

    group.bench_function("div_rescale", |b| {
        b.iter(|| ops::div_rescale(black_box(dec!(100.00)), black_box(dec!(0.92)), black_box(6)).unwrap())
    });

    group.bench_function("compare_at", |b| {
        b.iter(|| ops::compare_at(black_box(dec!(1.000001)), black_box(dec!(1.000002)), black_box(18)).unwrap())
    });

    group.finish();
}

fn bench_money(c: &mut Criterion) {
    let mut group = c.benchmark_group("money");

    let usd_a = Money::new("USD", dec!(100.50), 2).unwrap();
    let usd_b = Money::new("USD", dec!(42.25), 2).unwrap();

    group.bench_function("add", |b| {
        b.iter(|| black_box(&usd_a).add(black_box(&usd_b)).unwrap())
    });

    group.bench_function("compare", |b| {
        b.iter(|| black_box(&usd_a).compare(black_box(&usd_b)).unwrap())
    });

    for count in [1usize, 10, 50].iter() {
        group.bench_with_input(BenchmarkId::new("money_map_add", count), count, |b, &count| {
            b.iter(|| {
                let mut map = MoneyMap::new();
                for i in 0..count {
                    let currency = if i % 2 == 0 { "USD" } else { "EUR" };
                    map.add(Money::new(currency, dec!(1.23), 2).unwrap()).unwrap();
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

fn bench_exchange_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange_rate");

    let rate = ExchangeRate::new("USD", "EUR", dec!(0.92), 6).unwrap();

    group.bench_function("convert", |b| {
        b.iter(|| rate.convert(black_box(dec!(100.00)), black_box(2)).unwrap())
    });

    group.bench_function("invert", |b| b.iter(|| black_box(&rate).invert().unwrap()));

    group.finish();
}

criterion_group!(benches, bench_ops, bench_money, bench_exchange_rate);
criterion_main!(benches);
