// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unreadable_literal)] // Golden digests

//! Schema fingerprint tests.
//!
//! The digest is compared between processes before they exchange entity
//! data, so its byte layout is a wire contract. `GOLDEN_AVATAR` pins it.

use entity_schema::{
    DataTypes, PropertyDef, PropertyDescription, SchemaDigest, SchemaFingerprint, SchemaLoader,
};

/// MD5 over the canonical bytes of `avatar_defs()` with the builtin ids.
const GOLDEN_AVATAR: &str = "c66fcaf267cb4f5eb327696436789880";

fn avatar_defs() -> Vec<PropertyDef> {
    vec![
        PropertyDef::new(1, "name", "STRING")
            .with_flags(0x01)
            .persistent()
            .with_database_length(32),
        PropertyDef::new(2, "level", "UINT16")
            .with_flags(0x02)
            .persistent()
            .with_default("1"),
        PropertyDef::new(3, "position", "VECTOR3")
            .with_flags(0x04)
            .with_default("0 0 0")
            .with_detail_level(1),
        // Persistence is requested but mailboxes never persist.
        PropertyDef::new(4, "owner", "MAILBOX")
            .with_flags(0x08)
            .persistent(),
    ]
}

fn digest_of(defs: Vec<PropertyDef>) -> SchemaDigest {
    let types = DataTypes::with_builtins();
    let mut fingerprint = SchemaFingerprint::new();
    for def in defs {
        let dt = types.get(&def.type_name);
        PropertyDescription::create(def, dt, &mut fingerprint).unwrap();
    }
    fingerprint.finalize()
}

#[test]
fn test_golden_digest() {
    assert_eq!(digest_of(avatar_defs()).to_hex(), GOLDEN_AVATAR);
}

#[test]
fn test_loader_digest_matches_direct_construction() {
    let types = DataTypes::with_builtins();
    let mut loader = SchemaLoader::new(&types);
    loader.load_entity("Avatar", avatar_defs()).unwrap();
    let schema = loader.finish();

    assert_eq!(schema.digest().to_hex(), GOLDEN_AVATAR);
    assert_eq!(schema.property_count(), 4);
}

#[test]
fn test_deterministic_across_processes() {
    // Two independent registries and fingerprints stand in for two processes.
    let a = digest_of(avatar_defs());
    let b = digest_of(avatar_defs());
    assert_eq!(a, b);
}

#[test]
fn test_declaration_order_matters() {
    let mut reversed = avatar_defs();
    reversed.reverse();
    assert_ne!(digest_of(avatar_defs()), digest_of(reversed));
}

#[test]
fn test_every_canonical_field_is_covered() {
    let baseline = digest_of(avatar_defs());

    let edits: Vec<Box<dyn Fn(&mut PropertyDef)>> = vec![
        Box::new(|d| d.name.push('x')),
        Box::new(|d| d.default_expr.push('7')),
        Box::new(|d| d.utype += 100),
        Box::new(|d| d.flags ^= 0x80),
        Box::new(|d| d.persistent = !d.persistent),
        Box::new(|d| d.identifier = !d.identifier),
        Box::new(|d| d.database_length += 1),
        Box::new(|d| d.detail_level += 1),
        Box::new(|d| d.type_name = "UINT32".into()),
    ];

    for (i, edit) in edits.iter().enumerate() {
        let mut defs = avatar_defs();
        edit(&mut defs[1]);
        assert_ne!(digest_of(defs), baseline, "edit #{} not reflected", i);
    }
}

#[test]
fn test_codec_id_is_covered() {
    // Same declared name, different codec behind it.
    let mut a_types = DataTypes::with_builtins();
    a_types.alias("HEALTH", "INT32").unwrap();
    let mut b_types = DataTypes::with_builtins();
    b_types.alias("HEALTH", "INT16").unwrap();

    let digest = |types: &DataTypes| {
        let mut fp = SchemaFingerprint::new();
        let def = PropertyDef::new(9, "hp", "HEALTH");
        PropertyDescription::create(def, types.get("HEALTH"), &mut fp).unwrap();
        fp.finalize()
    };
    assert_ne!(digest(&a_types), digest(&b_types));
}

#[test]
fn test_mailbox_persistence_request_does_not_change_digest() {
    let mut without = avatar_defs();
    without[3].persistent = false;
    assert_eq!(digest_of(without).to_hex(), GOLDEN_AVATAR);
}

#[test]
fn test_inert_descriptor_hashes_codec_id_zero() {
    let mut fp = SchemaFingerprint::new();
    let desc = PropertyDescription::create(PropertyDef::new(5, "ai", "BRAIN"), None, &mut fp)
        .unwrap();

    let bytes = desc.canonical_bytes();
    assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);
    assert_eq!(fp.property_count(), 1);
    assert_eq!(fp.bytes_appended(), bytes.len() as u64);
}

#[test]
fn test_external_bytes_mix_in() {
    let mut plain = SchemaFingerprint::new();
    let mut salted = SchemaFingerprint::new();
    salted.append(b"entity-defs-v2");

    let types = DataTypes::with_builtins();
    for fp in [&mut plain, &mut salted] {
        let def = PropertyDef::new(1, "hp", "INT32");
        PropertyDescription::create(def, types.get("INT32"), fp).unwrap();
    }
    assert_eq!(plain.property_count(), salted.property_count());
    assert_ne!(plain.finalize(), salted.finalize());
}
