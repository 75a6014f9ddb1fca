//! Latency benchmarks for review cleaning and classification
//!
//! Run with: cargo bench -p reviewreply-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use reviewreply_classifiers::{ReviewProcessor, SentimentClassifier, TextNormalizer, TextProcessingConfig};
use reviewreply_core::Review;

fn test_cases() -> Vec<(&'static str, String)> {
    vec![
        ("short_clean", "Produit correct.".to_string()),
        (
            "short_noisy",
            "Produit FANTASTIQUE! 😊 http://test.com J'adore vraiment!".to_string(),
        ),
        (
            "medium",
            "Très déçu de cet achat. Qualité médiocre, ne correspond pas à la description. \
             Livraison en retard et produit abîmé, demande de remboursement en cours."
                .to_string(),
        ),
        (
            "max_length",
            "Excellent produit, livraison rapide 👍 www.boutique.fr ".repeat(36),
        ),
    ]
}

fn benchmark_normalizer(c: &mut Criterion) {
    let normalizer = TextNormalizer::new().expect("Failed to create normalizer");

    let mut group = c.benchmark_group("Text_Normalizer");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases() {
        group.bench_with_input(BenchmarkId::new("normalize", name), &text, |b, text| {
            b.iter(|| normalizer.normalize(black_box(text)));
        });
    }

    group.finish();
}

fn benchmark_keyword_classifier(c: &mut Criterion) {
    let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
    let classifier = SentimentClassifier::new().expect("Failed to create classifier");

    let mut group = c.benchmark_group("Keyword_Classifier");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases() {
        let cleaned = normalizer.normalize(&text);
        group.bench_with_input(BenchmarkId::new("classify_by_text", name), &cleaned, |b, text| {
            b.iter(|| classifier.classify_by_text(black_box(text)));
        });
    }

    group.finish();
}

fn benchmark_review_processor(c: &mut Criterion) {
    let processor = ReviewProcessor::from_config(&TextProcessingConfig::default())
        .expect("Failed to create processor");

    let mut group = c.benchmark_group("Review_Processor");
    group.sample_size(100);

    for (name, text) in test_cases() {
        let review = Review::new(text, None).expect("valid review");
        group.bench_with_input(BenchmarkId::new("process", name), &review, |b, review| {
            b.iter(|| processor.process(black_box(review)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalizer,
    benchmark_keyword_classifier,
    benchmark_review_processor
);
criterion_main!(benches);
