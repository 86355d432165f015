//! Benchmarks for complete lookup sessions
//!
//! Uses 1024-bit Paillier keys so a run finishes in reasonable time;
//! encryption cost scales roughly cubically with key size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use leakcheck::curve::{CurveGroup, CurveName};
use leakcheck::paillier::KeyPair;
use leakcheck::{run_session, Client, Credential, CredentialHash, LeakRecord, Server};
use rand::rngs::OsRng;
use std::sync::Arc;

fn credentials(count: usize) -> Vec<Credential> {
    (0..count)
        .map(|i| Credential::new(format!("user{i}"), format!("secret{i}")))
        .collect()
}

/// Half the records overlap the client's credentials
fn records(count: usize) -> Vec<LeakRecord> {
    (0..count)
        .map(|i| {
            let identifier = if i % 2 == 0 { format!("user{i}") } else { format!("other{i}") };
            LeakRecord::new(CredentialHash::of(&identifier, &format!("secret{i}")), i as u64 + 1)
        })
        .collect()
}

fn benchmark_session(c: &mut Criterion) {
    let keypair = Arc::new(KeyPair::generate(1024, &mut OsRng).unwrap());
    let curve_group = Arc::new(CurveGroup::named(CurveName::Sm2p256v1).unwrap());

    let mut group = c.benchmark_group("psi_session");
    group.sample_size(10);

    for size in [10usize, 50, 100] {
        let server = Server::new(Arc::clone(&curve_group), Arc::clone(&keypair), records(size));
        let client = Client::new(
            Arc::clone(&curve_group),
            server.public_key().clone(),
            credentials(size),
        );

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| run_session(&client, &server, &mut OsRng).unwrap());
        });
    }

    group.finish();
}

fn benchmark_keygen(c: &mut Criterion) {
    let mut group = c.benchmark_group("paillier_keygen");
    group.sample_size(10);

    group.bench_function("1024", |b| {
        b.iter(|| KeyPair::generate(1024, &mut OsRng).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_session, benchmark_keygen);
criterion_main!(benches);
