//! Performance benchmarks for xdscan components.
//!
//! These benchmarks measure the hot per-domain operations (policy
//! parsing and target normalization) to ensure the tool stays fast on
//! large policies and long input lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use xdscan::domain_utils::{is_ipv4_literal, registrable_domain};
use xdscan::fetcher::{FetchStatus, PolicyDocument};
use xdscan::policy::parse;

/// Representative real-world policy for benchmarking
const SAMPLE_POLICY: &str = r#"<?xml version="1.0"?>
<!DOCTYPE cross-domain-policy SYSTEM "http://www.adobe.com/xml/dtds/cross-domain-policy.dtd">
<cross-domain-policy>
  <site-control permitted-cross-domain-policies="master-only"/>
  <allow-access-from domain="partner.example.com"/>
  <allow-access-from domain="*.cdn.example.net" secure="false"/>
  <allow-http-request-headers-from domain="api.example.org" headers="SOAPAction"/>
</cross-domain-policy>"#;

/// Large policy with many allow-access-from rules for stress testing
fn generate_large_policy(num_rules: usize) -> String {
    let mut body = String::with_capacity(SAMPLE_POLICY.len() + num_rules * 60);
    body.push_str("<?xml version=\"1.0\"?>\n<cross-domain-policy>\n");
    for i in 0..num_rules {
        body.push_str(&format!(
            "  <allow-access-from domain=\"host{}.partner{}.example.com\"/>\n",
            i,
            i % 50
        ));
    }
    body.push_str("</cross-domain-policy>\n");
    body
}

fn doc(body: String) -> PolicyDocument {
    PolicyDocument {
        domain: "example.com".to_string(),
        status: FetchStatus::Ok,
        body,
    }
}

fn bench_policy_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_parsing");

    let sample = doc(SAMPLE_POLICY.to_string());
    group.throughput(Throughput::Bytes(sample.body.len() as u64));
    group.bench_function("sample_policy", |b| {
        b.iter(|| parse(black_box(&sample)));
    });

    for num_rules in [10usize, 100, 1000] {
        let large = doc(generate_large_policy(num_rules));
        group.throughput(Throughput::Bytes(large.body.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("large_policy", num_rules),
            &large,
            |b, large| {
                b.iter(|| parse(black_box(large)));
            },
        );
    }

    group.finish();
}

fn bench_target_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_normalization");

    let targets = [
        "partner.example.com",
        "*.cdn.example.co.uk",
        "http://192.168.1.1:81/",
        "deep.sub.domain.example.org",
    ];

    group.bench_function("registrable_domain", |b| {
        b.iter(|| {
            for t in &targets {
                black_box(registrable_domain(black_box(t)));
            }
        });
    });

    group.bench_function("ipv4_literal_check", |b| {
        b.iter(|| {
            for t in &targets {
                black_box(is_ipv4_literal(black_box(t)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_policy_parsing, bench_target_normalization);
criterion_main!(benches);
