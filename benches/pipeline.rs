//! Benchmarks for the local request pipeline: redaction, language detection
//! and cache fingerprinting. These run on every full analysis before any
//! provider call, so they should stay well under a millisecond.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nordicsense::analysis::{
    pii, Language, LanguageResolver, ResolvedRequest, ResultCache, SummaryLength,
};

const REVIEW: &str = "Leveransen var sen och kundtjänsten svarade aldrig på mina mejl. \
                      Ring mig på 070-123 45 67 eller skriv till kund@example.se, \
                      personnummer 850709-9805. Jag har betalat med 4111 1111 1111 1111.";

fn bench_anonymize(c: &mut Criterion) {
    c.bench_function("pii_anonymize_review", |b| {
        b.iter(|| pii::anonymize(black_box(REVIEW)))
    });

    let clean = "Mycket bra service och snabb leverans, rekommenderas varmt.".repeat(20);
    c.bench_function("pii_anonymize_clean_1k", |b| {
        b.iter(|| pii::anonymize(black_box(&clean)))
    });
}

fn bench_language_detection(c: &mut Criterion) {
    let resolver = LanguageResolver::default();
    c.bench_function("language_detect_swedish", |b| {
        b.iter(|| resolver.detect(black_box(REVIEW)))
    });
    c.bench_function("language_detect_short_fallback", |b| {
        b.iter(|| resolver.detect(black_box("Hej då")))
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let request = ResolvedRequest {
        text: REVIEW.repeat(50),
        language: Language::Sv,
        summary_length: SummaryLength::Long,
    };
    c.bench_function("cache_fingerprint_10k", |b| {
        b.iter(|| ResultCache::fingerprint(black_box(&request)))
    });
}

criterion_group!(
    benches,
    bench_anonymize,
    bench_language_detection,
    bench_fingerprint
);
criterion_main!(benches);
