use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::prelude::*;
use sqlweave::{PLACEHOLDER, PlaceholderStyle, rewrite_placeholders};

/// `n` conditions alternating OR/AND, every fourth one wrapped in a group.
fn conditions(n: usize) -> Vec<Clause> {
    (0..n)
        .map(|i| -> Clause {
            let c = eq(format!("col{i}"), i as i64);
            let c = if i % 2 == 0 { c.or() } else { c };
            if i % 4 == 0 {
                grouping([c]).into()
            } else {
                c.into()
            }
        })
        .collect()
}

fn bench_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/where");

    for n in [1, 5, 10, 50, 100] {
        let clauses = conditions(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &clauses, |b, clauses| {
            let mut qb = Composer::new(Vendor::PostgreSql);
            b.iter(|| black_box(qb.where_clause(clauses.iter().cloned())));
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select");

    for n in [1, 10, 100] {
        let clauses = conditions(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &clauses, |b, clauses| {
            let mut qb = Composer::new(Vendor::MySql);
            b.iter(|| {
                let mut args = clauses.clone();
                args.push(limit(20, Some(40)).into());
                args.push(order_by(["col0"], Direction::Desc).unwrap().into());
                black_box(qb.select("t", ["*"], args))
            });
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/rewrite_placeholders");

    for n in [5, 20, 100, 500] {
        let list = vec![PLACEHOLDER; n].join(", ");
        let sql = format!("SELECT * FROM t WHERE id IN ({list})");
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(rewrite_placeholders(sql, PlaceholderStyle::Numbered)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_where, bench_select, bench_rewrite);
criterion_main!(benches);
