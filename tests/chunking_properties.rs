//! Chunker properties over a spread of scripts and bounds.

use readio::chunker::{chunk, word_count, SENTENCE_DELIMITER};
use readio::synthesis::estimate_duration;

const SCRIPTS: &[&str] = &[
    "Discover this amazing book: The Left Hand of Darkness. An envoy arrives on a frozen world. \
     Its people have no fixed gender. Politics, trust, and a long walk across the ice follow.",
    "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.",
    "A single run-on sentence with no delimiter at all that keeps going well past any bound",
    "Short. A considerably longer sentence that on its own exceeds a small bound. Short again.",
    "Ünïcödé sentences count. Characters, not bytes. Ça va.",
];

const BOUNDS: &[usize] = &[1, 5, 20, 50, 150, 10_000];

fn sentences(script: &str) -> Vec<String> {
    script
        .split(SENTENCE_DELIMITER)
        .map(|s| s.trim().trim_end_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[test]
fn test_joining_chunks_reconstructs_script() {
    for script in SCRIPTS {
        for &bound in BOUNDS {
            let chunks = chunk(script, bound);
            assert_eq!(chunks.join(" "), *script, "bound {bound}");
        }
    }
}

#[test]
fn test_sentences_are_never_split() {
    for script in SCRIPTS {
        let expected = sentences(script);
        for &bound in BOUNDS {
            let from_chunks: Vec<String> = chunk(script, bound)
                .iter()
                .flat_map(|c| sentences(c))
                .collect();
            assert_eq!(from_chunks, expected, "bound {bound}");
        }
    }
}

#[test]
fn test_multi_sentence_chunks_stay_under_bound() {
    for script in SCRIPTS {
        for &bound in BOUNDS {
            for c in chunk(script, bound) {
                if c.contains(SENTENCE_DELIMITER) {
                    assert!(c.chars().count() < bound, "{c:?} at bound {bound}");
                }
            }
        }
    }
}

#[test]
fn test_chunks_are_trimmed_and_non_empty() {
    for script in SCRIPTS {
        for &bound in BOUNDS {
            for c in chunk(script, bound) {
                assert!(!c.is_empty());
                assert_eq!(c, c.trim());
            }
        }
    }
}

#[test]
fn test_large_bound_keeps_script_whole() {
    for script in SCRIPTS {
        assert_eq!(chunk(script, 10_000), vec![script.to_string()]);
    }
}

#[test]
fn test_segment_durations_add_up_to_script_duration() {
    let script = SCRIPTS[0];
    let total: f64 = chunk(script, 20)
        .iter()
        .map(|c| estimate_duration(c, 150.0))
        .sum();
    let whole = estimate_duration(script, 150.0);
    assert!((total - whole).abs() < 1e-9);
    assert_eq!(whole, word_count(script) as f64 / 150.0 * 60.0);
}
