use binval::{from_slice, to_vec, Decimal, RecordValue, SequenceValue, Value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;

fn user(id: u32) -> Value {
    Value::Record(RecordValue::of([
        ("id", Value::from(id)),
        ("name", Value::from(format!("User {}", id))),
        ("email", Value::from(format!("user{}@example.com", id))),
        ("active", Value::from(id % 2 == 0)),
    ]))
}

fn product(i: u32) -> Value {
    Value::Record(RecordValue::of([
        ("sku", Value::from(format!("SKU{}", i))),
        (
            "price",
            Value::from(Decimal::new(BigInt::from(999 + i), -2)),
        ),
        ("quantity", Value::from(i)),
    ]))
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let value = user(123);

    c.bench_function("serialize_simple_record", |b| {
        b.iter(|| to_vec(black_box(&value)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let bytes = to_vec(&user(123)).unwrap();

    c.bench_function("deserialize_simple_record", |b| {
        b.iter(|| from_slice(black_box(&bytes)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10u32, 50, 100, 500].iter() {
        let products = Value::from((0..*size).map(product).collect::<Vec<_>>());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_vec(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10u32, 50, 100, 500].iter() {
        let products = Value::from((0..*size).map(product).collect::<Vec<_>>());
        let bytes = to_vec(&products).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_slice(black_box(&bytes)))
        });
    }
    group.finish();
}

fn benchmark_shared_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_strings");
    let shared = Value::from("a string repeated through the whole sequence");

    for size in [100usize, 1000].iter() {
        let aliased = Value::from(vec![shared.clone(); *size]);
        let distinct = Value::from(
            (0..*size)
                .map(|_| Value::from("a string repeated through the whole sequence"))
                .collect::<Vec<_>>(),
        );

        group.bench_with_input(BenchmarkId::new("aliased", size), size, |b, _| {
            b.iter(|| to_vec(black_box(&aliased)))
        });
        group.bench_with_input(BenchmarkId::new("distinct", size), size, |b, _| {
            b.iter(|| to_vec(black_box(&distinct)))
        });
    }
    group.finish();
}

fn benchmark_big_integers(c: &mut Criterion) {
    let values: Vec<Value> = (0..100u32)
        .map(|i| {
            let magnitude = BigInt::from(u64::MAX).pow(1 + i % 8);
            Value::from(if i % 2 == 0 { magnitude } else { -magnitude })
        })
        .collect();
    let value = Value::from(values);
    let bytes = to_vec(&value).unwrap();

    c.bench_function("serialize_big_integers", |b| {
        b.iter(|| to_vec(black_box(&value)))
    });
    c.bench_function("deserialize_big_integers", |b| {
        b.iter(|| from_slice(black_box(&bytes)))
    });
}

fn benchmark_cyclic_graph(c: &mut Criterion) {
    let nodes: Vec<RecordValue> = (0..100)
        .map(|i| RecordValue::of([("id", Value::from(i))]))
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        let next = &nodes[(i + 1) % nodes.len()];
        node.set("next", Value::Record(next.clone()));
    }
    let root = Value::Record(nodes[0].clone());
    let bytes = to_vec(&root).unwrap();

    c.bench_function("serialize_ring_100", |b| {
        b.iter(|| to_vec(black_box(&root)))
    });
    c.bench_function("deserialize_ring_100", |b| {
        b.iter(|| {
            let back = from_slice(black_box(&bytes)).unwrap();
            // break the decoded ring so each iteration frees its nodes
            if let Some(record) = back.as_record() {
                record.remove("next");
            }
        })
    });

    for node in &nodes {
        node.clear();
    }
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let value = Value::Sequence(SequenceValue::of((0..20).map(user)));

    c.bench_function("roundtrip_users", |b| {
        b.iter(|| {
            let bytes = to_vec(black_box(&value)).unwrap();
            let _back = from_slice(black_box(&bytes)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_shared_strings,
    benchmark_big_integers,
    benchmark_cyclic_graph,
    benchmark_roundtrip
);
criterion_main!(benches);
