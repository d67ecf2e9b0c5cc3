// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property Codec Benchmark
//!
//! Measures the hot paths a server runs per entity update:
//! - network encode/decode of scalar, vector and fixed dict properties
//! - persistent encode with default substitution
//! - vector bind (in-place update of the host vector)
//! - schema load including fingerprinting

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use entity_schema::{
    AttributeMap, DataTypes, FixedDictField, FixedDictType, MemoryStream, PropertyDef,
    PropertyDescription, SchemaFingerprint, SchemaLoader, ScriptVector, Value, VectorArity,
};
use std::collections::HashMap;

fn game_types() -> DataTypes {
    let mut types = DataTypes::with_builtins();
    let uint64 = types.get("UINT64").expect("builtin");
    let string = types.get("STRING").expect("builtin");
    let vector3 = types.get("VECTOR3").expect("builtin");
    types
        .register_with("AVATAR_INFO", |id| {
            FixedDictType::new(
                id,
                "AVATAR_INFO",
                vec![
                    FixedDictField::new("dbid", uint64),
                    FixedDictField::new("name", string),
                    FixedDictField::new("home", vector3),
                ],
            )
        })
        .expect("register AVATAR_INFO");
    types
}

fn describe(types: &DataTypes, def: PropertyDef) -> PropertyDescription {
    let mut fp = SchemaFingerprint::new();
    let dt = types.get(&def.type_name);
    PropertyDescription::create(def, dt, &mut fp).expect("descriptor")
}

fn avatar_info() -> Value {
    let mut entries = HashMap::new();
    entries.insert("dbid".to_string(), Value::U64(1 << 40));
    entries.insert("name".to_string(), Value::from("wanderer"));
    entries.insert(
        "home".to_string(),
        Value::Vector(ScriptVector::new(&[10.0, 0.0, -4.5]).expect("vector")),
    );
    Value::Dict(entries)
}

fn bench_encode_decode(c: &mut Criterion) {
    let types = game_types();
    let cases = [
        ("int32", describe(&types, PropertyDef::new(1, "hp", "INT32")), Value::I32(-77)),
        (
            "vector3",
            describe(&types, PropertyDef::new(2, "position", "VECTOR3")),
            Value::from(vec![1.0f32, 2.0, 3.0]),
        ),
        (
            "fixed_dict",
            describe(&types, PropertyDef::new(3, "info", "AVATAR_INFO")),
            avatar_info(),
        ),
    ];

    let mut group = c.benchmark_group("property_roundtrip");
    for (label, desc, value) in &cases {
        group.bench_function(*label, |b| {
            let mut stream = MemoryStream::with_capacity(64);
            b.iter(|| {
                stream.clear();
                desc.encode(&mut stream, black_box(value)).expect("encode");
                black_box(desc.decode(&mut stream).expect("decode"));
            });
        });
    }
    group.finish();
}

fn bench_persistent_default(c: &mut Criterion) {
    let types = game_types();
    let desc = describe(
        &types,
        PropertyDef::new(1, "level", "UINT16")
            .persistent()
            .with_default("1"),
    );

    c.bench_function("encode_persistent_default", |b| {
        let mut stream = MemoryStream::with_capacity(16);
        b.iter(|| {
            stream.clear();
            desc.encode_persistent(&mut stream, None)
                .expect("encode_persistent");
        });
    });
}

fn bench_vector_bind(c: &mut Criterion) {
    let types = game_types();
    let desc = describe(&types, PropertyDef::new(1, "position", "VECTOR3"));
    let mut host = AttributeMap::new();
    desc.bind(&mut host, Value::Vector(ScriptVector::zero(VectorArity::Three)))
        .expect("initial bind");
    let update = Value::from(vec![4.0f32, 5.0, 6.0]);

    c.bench_function("vector_bind_in_place", |b| {
        b.iter(|| {
            black_box(desc.bind(&mut host, black_box(update.clone())).expect("bind"));
        });
    });
}

fn bench_schema_load(c: &mut Criterion) {
    let types = game_types();
    let defs: Vec<PropertyDef> = (0..64u16)
        .map(|i| {
            let type_name = match i % 4 {
                0 => "INT32",
                1 => "VECTOR3",
                2 => "STRING",
                _ => "AVATAR_INFO",
            };
            PropertyDef::new(i, format!("prop_{}", i), type_name).persistent()
        })
        .collect();

    c.bench_function("schema_load_64_properties", |b| {
        b.iter(|| {
            let mut loader = SchemaLoader::new(&types);
            loader
                .load_entity("Bench", defs.clone())
                .expect("load_entity");
            black_box(loader.finish().digest());
        });
    });
}

criterion_group!(
    benches,
    bench_encode_decode,
    bench_persistent_default,
    bench_vector_bind,
    bench_schema_load
);
criterion_main!(benches);
