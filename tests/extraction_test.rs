//! End-to-end extraction over a short article.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use termscan::extraction::{
    Dictionary, Extractor, Match, MemoryDictionary, Record, TaggedRecord,
};
use termscan::matching::MatcherConfig;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    death: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fictional: Option<bool>,
    #[serde(
        rename = "_matching_threshold",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    threshold: Option<f64>,
}

impl TaggedRecord for Person {
    const TAG: &'static str = "person";

    fn matching_threshold(&self) -> Option<f64> {
        self.threshold
    }
}

fn born(birth: &str) -> Person {
    Person {
        birth: Some(birth.to_string()),
        ..Person::default()
    }
}

fn fictional() -> Person {
    Person {
        fictional: Some(true),
        ..Person::default()
    }
}

fn dictionary() -> MemoryDictionary {
    MemoryDictionary::new()
        .with_record(
            "Barrie, Chris",
            Person {
                nationality: Some("British".to_string()),
                ..born("28 March 1960")
            },
        )
        .with_record("Rimmer, Arnold", fictional())
        .with_record("Charles, Craig", born("11 July 1964"))
        .with_record(
            "Lister, David",
            Person {
                threshold: Some(0.75),
                ..Person {
                    fictional: Some(true),
                    ..born("unknown")
                }
            },
        )
        .with_record("John-Jules, Danny", born("16 September 1960"))
        .with_record(
            "Cat",
            Person {
                death: Some("9 to go".to_string()),
                ..fictional()
            },
        )
        .with_record("Llewellyn, Robert", born("10 March 1956"))
        .with_record(
            "Kryten",
            Person {
                nationality: Some("N/A".to_string()),
                ..Person {
                    fictional: Some(true),
                    ..born("none, manufactured")
                }
            },
        )
        .with_record(
            "Lovett, Norman",
            Person {
                nationality: Some("British".to_string()),
                ..born("31 October 1946")
            },
        )
        .with_record(
            "Holly",
            Person {
                fictional: Some(true),
                ..born("none, manufactured")
            },
        )
        .with_record("Grant, Rob", Person::default())
        .with_record("Naylor, Doug", born("31 December 1955"))
}

const TEXT: &str = concat!(
    "\n",
    "Red Dwarf is a British science fiction comedy franchise created by Rob Grant ",
    "and Doug Naylor, which primarily consists of a television sitcom that aired on ",
    "BBC Two between 1988 and 1999, and on Dave since 2009, gaining a cult ",
    "following.[1] The series follows low-ranking technician Dave Lister, who ",
    "awakens after being in suspended animation for three million years to find that ",
    "he is the last living human, and that he is alone on the mining spacecraft Red ",
    "Dwarf—save for a hologram of his deceased bunkmate Arnold Rimmer and \"Cat\", a ",
    "life form which evolved from Lister's pregnant cat.\n",
    "\n",
    "As of 2020, the cast includes Chris Barrie as Rimmer, Craig Charles as Lister, ",
    "Danny John-Jules as Cat, Robert Llewellyn as the sanitation droid Kryten, and ",
    "Norman Lovett as the ship's computer, Holly.\n"
);

/// `(term, begin, end, score, token)` in emission order.
fn expected() -> Vec<(&'static str, usize, usize, f64, &'static str)> {
    vec![
        // 1st sentence
        ("Grant, Rob", 68, 77, 2.0 * 6.0 / (7.0 + 6.0), "Rob Grant"),
        ("Naylor, Doug", 82, 93, 2.0 * 8.0 / (9.0 + 8.0), "Doug Naylor"),
        // 2nd sentence
        ("Rimmer, Arnold", 510, 523, 2.0 * 10.0 / (11.0 + 10.0), "Arnold Rimmer"),
        ("Lister, David", 283, 294, 2.0 * 7.0 / (10.0 + 8.0), "Dave Lister"),
        ("Cat", 529, 532, 1.0, "Cat"),
        // 3rd sentence
        ("Barrie, Chris", 620, 632, 2.0 * 9.0 / (10.0 + 9.0), "Chris Barrie"),
        ("Charles, Craig", 644, 657, 2.0 * 10.0 / (11.0 + 10.0), "Craig Charles"),
        ("John-Jules, Danny", 669, 685, 2.0 * 12.0 / (13.0 + 12.0), "Danny John-Jules"),
        ("Cat", 689, 692, 1.0, "Cat"),
        ("Llewellyn, Robert", 694, 710, 2.0 * 13.0 / (14.0 + 13.0), "Robert Llewellyn"),
        ("Kryten", 735, 741, 1.0, "Kryten"),
        ("Lovett, Norman", 747, 760, 2.0 * 10.0 / (11.0 + 10.0), "Norman Lovett"),
        ("Holly", 785, 790, 1.0, "Holly"),
    ]
}

fn summary(matches: &[Match]) -> Vec<(&str, usize, usize, f64, &str)> {
    matches
        .iter()
        .map(|found| {
            (
                found.term.as_str(),
                found.begin,
                found.end,
                found.score,
                found.token.as_str(),
            )
        })
        .collect()
}

fn char_slice(text: &str, begin: usize, end: usize) -> String {
    text.chars().skip(begin).take(end - begin).collect()
}

#[test]
fn test_extraction() {
    let extractor = Extractor::new(dictionary())
        .unwrap()
        .with_default_threshold(0.8);

    let matches: Vec<Match> = extractor.extract(TEXT).collect();
    assert_eq!(summary(&matches), expected());

    for found in &matches {
        assert_eq!(char_slice(TEXT, found.begin, found.end), found.token);
        let record = extractor.dictionary().get(&found.term).unwrap();
        assert!(Arc::ptr_eq(record, &found.record));
    }
}

#[test]
fn test_records_are_handed_back() {
    let extractor = Extractor::new(dictionary())
        .unwrap()
        .with_default_threshold(0.8);

    let lister = extractor
        .extract(TEXT)
        .find(|found| found.term == "Lister, David")
        .unwrap();
    let person = lister.record.downcast_ref::<Person>().unwrap();
    assert_eq!(person.birth.as_deref(), Some("unknown"));
    assert_eq!(lister.record.matching_threshold(), Some(0.75));
    assert!(lister.score < 0.8);
}

#[test]
fn test_default_threshold_only_finds_exact_terms() {
    let extractor = Extractor::new(dictionary()).unwrap();

    // Lister keeps its own, lower threshold
    let terms: Vec<_> = extractor.extract(TEXT).map(|found| found.term).collect();
    assert_eq!(terms, vec!["Lister, David", "Cat", "Cat", "Kryten", "Holly"]);
}

#[test]
fn test_emission_follows_dictionary_order_per_sentence() {
    let sorted: BTreeMap<String, Arc<dyn Record>> = dictionary()
        .items()
        .map(|(term, record)| (term.to_string(), Arc::clone(record)))
        .collect();
    let extractor = Extractor::with_options(sorted, 0.8, MatcherConfig::default()).unwrap();

    let spans: Vec<_> = extractor
        .extract(TEXT)
        .map(|found| (found.term, found.begin))
        .take(5)
        .collect();
    assert_eq!(
        spans,
        vec![
            ("Grant, Rob".to_string(), 68),
            ("Naylor, Doug".to_string(), 82),
            ("Cat".to_string(), 529),
            ("Lister, David".to_string(), 283),
            ("Rimmer, Arnold".to_string(), 510),
        ]
    );
}

#[test]
fn test_shared_across_threads() {
    let extractor = Extractor::new(dictionary())
        .unwrap()
        .with_default_threshold(0.8);

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| extractor.extract(TEXT).count()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert_eq!(counts, vec![expected().len(); 4]);
}
