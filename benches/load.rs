//! Benchmarks for mock configuration loading.
//!
//! Compares direct, promoted and qualified path spellings, and the cost of
//! tracing a load.

use cfgmock::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

#[derive(Debug, Default, Resolve)]
struct Smtp {
    #[resolve(alias = "Host")]
    host: String,
    #[resolve(alias = "Port")]
    port: u16,
    #[resolve(alias = "Username")]
    username: String,
    #[resolve(alias = "Password")]
    password: String,
}

#[derive(Debug, Default, Resolve)]
struct Common {
    #[resolve(alias = "JwtSecret")]
    jwt_secret: String,
    #[resolve(alias = "DatabaseUrl")]
    database_url: String,
    #[resolve(alias = "RedisUrl")]
    redis_url: String,
}

#[derive(Debug, Default, Resolve)]
struct AppConfig {
    #[resolve(embed)]
    common: Common,
    #[resolve(nested, alias = "Smtp")]
    smtp: Smtp,
    #[resolve(alias = "ApiKey")]
    api_key: String,
    #[resolve(alias = "Workers")]
    workers: u32,
}

fn nested_entries() -> Vec<(&'static str, Value)> {
    vec![
        ("Smtp.Host", Value::from("smtp.example.com")),
        ("Smtp.Port", Value::from(587)),
        ("Smtp.Username", Value::from("mailer")),
        ("Smtp.Password", Value::from("secret")),
        ("ApiKey", Value::from("key")),
        ("Workers", Value::from(8)),
    ]
}

fn loader_with(common: [(&'static str, &'static str); 3]) -> MockLoader {
    let mut entries = nested_entries();
    entries.extend(common.into_iter().map(|(k, v)| (k, Value::from(v))));
    MockLoader::new(entries)
}

fn promoted_loader() -> MockLoader {
    loader_with([
        ("JwtSecret", "a-very-long-secret"),
        ("DatabaseUrl", "postgres://localhost/app"),
        ("RedisUrl", "redis://localhost"),
    ])
}

fn qualified_loader() -> MockLoader {
    loader_with([
        ("Common.JwtSecret", "a-very-long-secret"),
        ("Common.DatabaseUrl", "postgres://localhost/app"),
        ("Common.RedisUrl", "redis://localhost"),
    ])
}

fn bench_load(c: &mut Criterion) {
    let loader = promoted_loader();

    c.bench_function("load", |b| {
        b.iter(|| {
            let mut config = AppConfig::default();
            black_box(&loader).load(&mut config).unwrap();
            black_box(config)
        })
    });
}

fn bench_spellings(c: &mut Criterion) {
    let mut group = c.benchmark_group("embedded_spelling");

    let promoted = promoted_loader();
    let qualified = qualified_loader();
    let overridden = promoted_loader()
        .with_override("Common.JwtSecret", "another-long-secret")
        .with_override("Smtp.Port", 2525);

    group.bench_function("promoted", |b| {
        b.iter(|| {
            let mut config = AppConfig::default();
            black_box(&promoted).load(&mut config).unwrap();
            black_box(config)
        })
    });

    group.bench_function("qualified", |b| {
        b.iter(|| {
            let mut config = AppConfig::default();
            black_box(&qualified).load(&mut config).unwrap();
            black_box(config)
        })
    });

    group.bench_function("with overrides", |b| {
        b.iter(|| {
            let mut config = AppConfig::default();
            black_box(&overridden).load(&mut config).unwrap();
            black_box(config)
        })
    });

    group.finish();
}

fn bench_traced(c: &mut Criterion) {
    let loader = promoted_loader().with_override("Workers", 16);

    c.bench_function("load_traced", |b| {
        b.iter(|| {
            let mut config = AppConfig::default();
            let trace = black_box(&loader).load_traced(&mut config).unwrap();
            black_box((config, trace))
        })
    });
}

criterion_group!(benches, bench_load, bench_spellings, bench_traced);
criterion_main!(benches);
