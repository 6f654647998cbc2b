use criterion::{Criterion, criterion_group, criterion_main};
use listql::{
    Column, ColumnOptions, DataType, EvaluateOptions, Join, List, ListDefinition, Qualifier,
    Row, StandardEscape,
};
use std::hint::black_box;

const JOINS: usize = 12;

/// A chain of joins, each requiring the previous one, with a column per join.
fn list() -> List {
    let mut definition = ListDefinition::new("base");
    for i in 0..JOINS {
        let mut join = Join::new(format!("t{i}"), format!("JOIN t{i} ON t{i}.id = base.t{i}_id"));
        if i > 0 {
            join = join.require_join([format!("t{}", i - 1)]);
        }
        definition = definition.join(join).column(
            Column::with_options(
                format!("c{i}"),
                format!("t{i}.value"),
                ColumnOptions::default()
                    .require_join([format!("t{i}")])
                    .filter_group(if i % 2 == 0 { "even" } else { "odd" }),
            )
            .unwrap(),
        );
    }
    definition = definition
        .column(
            Column::with_options(
                "amount",
                "base.amount",
                ColumnOptions::default().datatype(DataType::Integer),
            )
            .unwrap(),
        )
        .qualifier(Qualifier::new("base.deleted_at IS NULL"));
    List::new(definition.into_shared())
}

fn render(c: &mut Criterion) {
    let list = list();
    let columns: Vec<String> = (0..JOINS).map(|i| format!("c{i}")).chain(["amount".to_owned()]).collect();
    let options = (0..JOINS)
        .fold(EvaluateOptions::new(), |o, i| o.filter(format!("c{i}"), "needle"))
        .sort("amount desc")
        .page(4)
        .page_size(50);

    let mut group = c.benchmark_group("render");
    group.bench_function("full_chain", |b| {
        b.iter(|| {
            list.to_sql(black_box(columns.as_slice()), black_box(&options), &StandardEscape)
                .unwrap()
        })
    });
    group.bench_function("single_column", |b| {
        b.iter(|| {
            list.to_sql(black_box(&["amount"][..]), black_box(&EvaluateOptions::new()), &StandardEscape)
                .unwrap()
        })
    });
    group.finish();
}

fn decode(c: &mut Criterion) {
    let list = list();
    let rows: Vec<Row> = (0..500)
        .map(|i| {
            let amount = i.to_string();
            let mut row = Row::with_capacity(JOINS + 1);
            for j in 0..JOINS {
                row.push(format!("c{j}"), Some(format!("value {i}-{j}")));
            }
            row.push("amount", Some(amount));
            row
        })
        .collect();

    c.bench_function("prepare_result_set", |b| {
        b.iter(|| {
            list.prepare_result_set(black_box(&rows), Some(1), Some(500), 500, &[])
                .unwrap()
        })
    });
}

criterion_group!(benches, render, decode);
criterion_main!(benches);
