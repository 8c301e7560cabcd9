// Copyright 2020 Yao Pengfei.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

//! SM2 / SM3 benchmarks

use criterion::{criterion_group, criterion_main, measurement::Measurement, BenchmarkGroup, Criterion};
use hex_literal::hex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sm2_core::elem::{elem_inv, elem_mul, elem_to_mont, FieldElem, Scalar, Unencoded};
use sm2_core::jacobian::mul::{base_point_mul, point_mul};
use sm2_core::jacobian::Point;
use sm2_core::sm3::compress_block;
use sm2_core::{sm2_verify, KeyPair, Sm3};
use std::hint::black_box;

const PRIVATE_KEY: [u8; 32] =
    hex!("4BB8DF505722299592CBED4283B354A13FF5D3FEEB3A0660C5BDF3C87C559499");

fn test_scalar() -> Scalar {
    black_box(
        Scalar::from_be_bytes(&hex!(
            "6CB28D99385C175C94F94E934817663FC176D925DD72B727260DBAAE1FB2F96F"
        ))
        .unwrap(),
    )
}

fn test_field_elem() -> FieldElem {
    let x = FieldElem::<Unencoded>::from_be_bytes(&hex!(
        "1ccbe91c075fc7f4f033bfa248db8fccd3565de94bbfb12f3c59ff46c271bf83"
    ))
    .unwrap();
    black_box(elem_to_mont(&x))
}

fn bench_field<'a, M: Measurement>(group: &mut BenchmarkGroup<'a, M>) {
    let x = test_field_elem();
    group.bench_function("field mul", |b| b.iter(|| elem_mul(&x, &x)));
    group.bench_function("field invert", |b| b.iter(|| elem_inv(&x)));
    let k = elem_to_mont(&test_scalar());
    group.bench_function("scalar invert", |b| b.iter(|| elem_inv(&k)));
}

fn bench_point<'a, M: Measurement>(group: &mut BenchmarkGroup<'a, M>) {
    let k = test_scalar();
    let p = point_mul(&Point::generator(), &[3, 0, 0, 0]);
    group.bench_function("base point mul", |b| b.iter(|| base_point_mul(&k.limbs)));
    group.bench_function("point mul", |b| b.iter(|| point_mul(&p, &k.limbs)));
}

fn bench_signatures<'a, M: Measurement>(group: &mut BenchmarkGroup<'a, M>) {
    let key_pair = KeyPair::new(&PRIVATE_KEY).unwrap();
    let digest = Sm3::digest(b"benchmark message");
    let mut rng = StdRng::seed_from_u64(0);
    let sig = key_pair.sign_digest(&mut rng, &digest).unwrap();

    group.bench_function("sign", |b| {
        b.iter(|| key_pair.sign_digest(&mut rng, &digest).unwrap())
    });
    group.bench_function("verify", |b| {
        b.iter(|| sm2_verify(&digest, key_pair.public_key(), &sig))
    });
}

fn bench_sm3<'a, M: Measurement>(group: &mut BenchmarkGroup<'a, M>) {
    let block = [0x61u8; 64];
    let mut state = [0u32; 8];
    group.bench_function("compress block", |b| {
        b.iter(|| compress_block(&mut state, black_box(&block)))
    });
    let data = vec![0x5au8; 1024];
    group.bench_function("digest 1KiB", |b| b.iter(|| Sm3::digest(&data)));
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    bench_field(&mut group);
    bench_point(&mut group);
    group.finish();
}

fn bench_sm2(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm2");
    bench_signatures(&mut group);
    group.finish();
}

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm3");
    bench_sm3(&mut group);
    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_sm2, bench_hash);
criterion_main!(benches);
