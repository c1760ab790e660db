//! Criterion benchmarks for termscan.
//!
//! Covers the stages of an extraction:
//! - Sentence splitting and tokenization
//! - Query bigram encoding and window scanning
//! - Whole-text extraction against dictionaries of growing size

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use termscan::analysis::tokenizer::Tokenizer;
use termscan::extraction::{Extractor, JsonRecord, MemoryDictionary};
use termscan::matching::{Matcher, MatcherConfig};

const WORDS: &[&str] = &[
    "dwarf", "mining", "ship", "hologram", "mechanoid", "computer", "stasis", "booth",
    "curry", "lager", "android", "skutter", "starbug", "deck", "captain", "technician",
    "the", "and", "of", "in", "is", "a",
];

/// Generate a text of `sentences` sentences.
fn generate_text(sentences: usize) -> String {
    let mut text = String::new();
    for i in 0..sentences {
        let length = 8 + (i % 12);
        let words: Vec<_> = (0..length)
            .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
            .collect();
        text.push_str(&words.join(" "));
        text.push_str(if i % 5 == 0 { ", said Lister. " } else { ". " });
    }
    text
}

/// Generate a dictionary of two-word terms.
fn generate_dictionary(terms: usize) -> MemoryDictionary {
    (0..terms)
        .map(|i| {
            let term = format!(
                "{} {}",
                WORDS[(i * 3) % WORDS.len()],
                WORDS[(i * 5 + 1) % WORDS.len()]
            );
            (term, JsonRecord::new().with_field("id", i))
        })
        .fold(MemoryDictionary::new(), |dictionary, (term, record)| {
            dictionary.with_record(term, record)
        })
}

fn bench_tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenization");

    let tokenizer = Tokenizer::new("english").unwrap();
    let text = generate_text(200);

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("sentences", |b| {
        b.iter(|| black_box(tokenizer.sentences(black_box(&text)).count()))
    });
    group.bench_function("sentences_and_tokens", |b| {
        b.iter(|| {
            let tokens: usize = tokenizer
                .sentences(black_box(&text))
                .map(|sentence| tokenizer.tokenize(sentence).count())
                .sum();
            black_box(tokens)
        })
    });

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    let matcher = Matcher::new(MatcherConfig::default()).unwrap();
    let text = generate_text(200);
    let prepared = matcher.text(&text);
    let query = matcher.sequence_bigrams("hologram technican");

    group.bench_function("prepare_text", |b| {
        b.iter(|| black_box(matcher.text(black_box(&text)).sentences().len()))
    });
    group.bench_function("scan_prepared_text", |b| {
        b.iter(|| black_box(prepared.matches(black_box(&query), 0.7).count()))
    });

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    let text = generate_text(100);
    for terms in [10, 100, 500] {
        let extractor = Extractor::new(generate_dictionary(terms))
            .unwrap()
            .with_default_threshold(0.8);

        group.throughput(Throughput::Elements(terms as u64));
        group.bench_with_input(BenchmarkId::new("extract", terms), &extractor, |b, extractor| {
            b.iter(|| black_box(extractor.extract(black_box(&text)).count()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenization, bench_matching, bench_extraction);
criterion_main!(benches);
