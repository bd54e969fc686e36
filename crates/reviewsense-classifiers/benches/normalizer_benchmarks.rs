//! Throughput benchmarks for the pre-classification path
//!
//! Run with: cargo bench -p reviewsense-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

use reviewsense_classifiers::{map_scores, Classifier, LexiconSentimentClassifier, TextNormalizer};

fn benchmark_normalizer(c: &mut Criterion) {
    let normalizer = TextNormalizer::new().expect("Failed to create normalizer");

    let long_review = "This product is great. ".repeat(200);
    let test_cases = vec![
        ("short_plain", "Great product, very satisfied!".to_string()),
        (
            "short_html",
            "<div>This product is <strong>fantastic</strong>!</div>".to_string(),
        ),
        (
            "medium_mixed",
            "Check out my full review here: https://reviewsite.com/review123. #Happy @Company"
                .repeat(5),
        ),
        ("long_1000_words", long_review),
    ];

    let mut group = c.benchmark_group("Text_Normalizer");
    for (name, text) in &test_cases {
        group.bench_with_input(BenchmarkId::new("normalize", name), text, |b, text| {
            b.iter(|| normalizer.normalize(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_lexicon_end_to_end(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
    let classifier = LexiconSentimentClassifier::new().expect("Failed to create classifier");

    c.bench_function("normalize_classify_map", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cleaned = normalizer.normalize(black_box(
                    "<p>This is terrible. I regret buying this product.</p>",
                ));
                let result = classifier.classify(&cleaned).await.unwrap();
                map_scores(&result)
            })
        })
    });
}

criterion_group!(benches, benchmark_normalizer, benchmark_lexicon_end_to_end);
criterion_main!(benches);
