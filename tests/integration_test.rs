use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use keyspace::indexer::{encode, total_combinations};
use keyspace::{search, Alphabet, Eta, KeyspaceError, Preset, Progress, Reporter, SearchResult, SearchState};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Everything a run reported, shared with the test after the builder
/// takes ownership of the reporter.
#[derive(Default)]
struct Recorded {
    events:   Vec<Progress>,
    finished: Vec<SearchResult>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Recorded>>);

impl Recorder {
    fn take(&self) -> Recorded {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl Reporter for Recorder {
    fn progress(&mut self, event: &Progress) {
        self.0.lock().unwrap().events.push(event.clone());
    }

    fn finish(&mut self, result: &SearchResult) {
        self.0.lock().unwrap().finished.push(result.clone());
    }
}

fn ab() -> Alphabet {
    Alphabet::new("ab").unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn finds_two_digit_target_with_exact_count() {
    let result = search("42")
        .preset(Preset::Digits)
        .max_length(2)
        .threads(4)
        .run()
        .unwrap();

    assert!(result.found);
    assert_eq!(result.candidate.as_deref(), Some("42"));
    assert_eq!(result.tested_total, 10 + 43, "all of length 1, then 00..=42");
    assert_eq!(result.total_combinations, 110);
    assert!(!result.cancelled);
}

#[test]
fn exhausts_space_when_target_uses_foreign_symbols() {
    let result = search("zz")
        .alphabet(ab())
        .max_length(3)
        .threads(2)
        .run()
        .unwrap();

    assert!(!result.found);
    assert_eq!(result.candidate, None);
    assert_eq!(result.tested_total, 2 + 4 + 8);
}

#[test]
fn zero_max_length_dispatches_nothing() {
    let recorder = Recorder::default();
    let result = search("a")
        .alphabet(ab())
        .max_length(0)
        .reporter(recorder.clone())
        .run()
        .unwrap();

    assert!(!result.found);
    assert_eq!(result.tested_total, 0);
    assert_eq!(result.total_combinations, 0);

    let recorded = recorder.take();
    assert!(recorded.events.is_empty(), "no chunk should have been dispatched");
    assert_eq!(recorded.finished.len(), 1);
}

#[test]
fn early_match_bounds_overshoot_of_other_worker() {
    // 10^6 six-digit candidates split into 50_000-wide chunks over two
    // workers; the target sits at index 100 of the very first chunk.
    let recorder = Recorder::default();
    let result = search("000100")
        .preset(Preset::Digits)
        .max_length(6)
        .threads(2)
        .min_chunk_size(1)
        .oversubscription(10)
        .check_interval(64)
        .reporter(recorder.clone())
        .run()
        .unwrap();

    assert!(result.found);
    assert_eq!(result.candidate.as_deref(), Some("000100"));

    let shorter: u128 = 10 + 100 + 1_000 + 10_000 + 100_000;
    let recorded = recorder.take();
    let at_six: Vec<&Progress> = recorded.events.iter().filter(|e| e.length == 6).collect();
    let tested_at_six: u128 = at_six.iter().map(|e| e.tested_delta).sum();

    assert_eq!(result.tested_total, shorter + tested_at_six);
    assert!(tested_at_six >= 101, "the matching chunk counts through the match");
    // At most queue-capacity (2 × workers) chunks are ever in flight.
    assert!(tested_at_six <= 4 * 50_000);
    assert!(at_six.iter().all(|e| e.tested_delta <= 50_000));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn full_run_counts_every_candidate() {
    for threads in [1, 3, 8] {
        let result = search("never")
            .preset(Preset::Digits)
            .max_length(5)
            .threads(threads)
            .min_chunk_size(97)
            .run()
            .unwrap();
        assert_eq!(
            Some(result.tested_total),
            total_combinations(10, 5),
            "threads = {threads}"
        );
    }
}

#[test]
fn shorter_lengths_are_exhausted_first() {
    // "b" at length 1 must win before any length-2 candidate is tried.
    let recorder = Recorder::default();
    let result = search("b")
        .alphabet(ab())
        .max_length(4)
        .reporter(recorder.clone())
        .run()
        .unwrap();

    assert_eq!(result.candidate.as_deref(), Some("b"));
    assert_eq!(result.tested_total, 2);
    assert!(recorder.take().events.iter().all(|e| e.length == 1));
}

#[test]
fn lengths_never_interleave() {
    let recorder = Recorder::default();
    search("-")
        .preset(Preset::Digits)
        .max_length(4)
        .threads(4)
        .min_chunk_size(10)
        .reporter(recorder.clone())
        .run()
        .unwrap();

    let lengths: Vec<usize> = recorder.take().events.iter().map(|e| e.length).collect();
    assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "{lengths:?}");
    assert_eq!(lengths.first(), Some(&1));
    assert_eq!(lengths.last(), Some(&4));
}

#[test]
fn every_indexed_candidate_is_findable() {
    let alphabet = Alphabet::new("xyz").unwrap();
    for i in [0u128, 1, 13, 26] {
        let target = encode(i, &alphabet, 3);
        let result = search(target.as_str())
            .alphabet(alphabet.clone())
            .max_length(3)
            .threads(2)
            .min_chunk_size(4)
            .run()
            .unwrap();
        assert_eq!(result.candidate.as_deref(), Some(target.as_str()));
        assert_eq!(result.tested_total, 3 + 9 + i + 1);
    }
}

#[test]
fn custom_alphabet_order_changes_position() {
    let forward = search("ba").alphabet(ab()).max_length(2).run().unwrap();
    let reverse = search("ba")
        .alphabet(Alphabet::new("ba").unwrap())
        .max_length(2)
        .run()
        .unwrap();

    // "a","b","aa","ab","ba"  vs  "b","a","bb","ba"
    assert_eq!(forward.tested_total, 5);
    assert_eq!(reverse.tested_total, 4);
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[test]
fn progress_accumulates_to_total() {
    let recorder = Recorder::default();
    let result = search("nope")
        .preset(Preset::Digits)
        .max_length(3)
        .threads(3)
        .min_chunk_size(25)
        .reporter(recorder.clone())
        .run()
        .unwrap();

    let recorded = recorder.take();
    let mut running = 0;
    for event in &recorded.events {
        running += event.tested_delta;
        assert_eq!(event.tested_total, running);
        assert_eq!(event.total_combinations, 1_110);
        assert!(event.tested_total <= event.total_combinations);
    }
    assert_eq!(running, result.tested_total);

    let last = recorded.events.last().unwrap();
    assert_eq!(last.fraction(), 1.0);
    if last.rate > 0.0 {
        assert_eq!(last.eta, Eta::Finite(Duration::ZERO));
    }

    assert_eq!(recorded.finished, vec![result]);
}

#[test]
fn summary_reports_average_rate() {
    let result = search("zzzz")
        .preset(Preset::Letters)
        .max_length(3)
        .run()
        .unwrap();

    assert!(!result.found);
    if result.elapsed > Duration::ZERO {
        let expected = result.tested_total as f64 / result.elapsed.as_secs_f64();
        assert!((result.average_rate - expected).abs() < 1e-6 * expected.max(1.0));
    }
}

// ---------------------------------------------------------------------------
// Errors and cancellation
// ---------------------------------------------------------------------------

#[test]
fn zero_threads_is_rejected() {
    let err = search("a").alphabet(ab()).threads(0).run().unwrap_err();
    assert_eq!(err, KeyspaceError::InvalidThreadCount(0));
    assert!(err.is_configuration());
}

#[test]
fn overflowing_space_is_rejected() {
    let err = search("a").preset(Preset::All).max_length(64).run().unwrap_err();
    assert_eq!(
        err,
        KeyspaceError::Overflow {
            alphabet_size: 94,
            max_length:    64,
        }
    );
    assert!(!err.is_configuration());
}

#[test]
fn empty_alphabet_is_rejected() {
    assert_eq!(Alphabet::new(""), Err(KeyspaceError::EmptyAlphabet));
}

#[test]
fn cancelled_state_stops_the_run() {
    let state = SearchState::new();
    state.cancel();

    let result = search("never")
        .preset(Preset::Digits)
        .max_length(6)
        .threads(2)
        .run_with_state(&state)
        .unwrap();

    assert!(!result.found);
    assert!(result.cancelled);
    assert_eq!(result.tested_total, 0);
}

#[test]
fn cancel_from_another_thread() {
    let state = SearchState::new();

    let result = thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(20));
            state.cancel();
        });
        // 62^7 candidates: far more than can be scanned before the cancel.
        search("never")
            .preset(Preset::LettersDigits)
            .max_length(7)
            .threads(2)
            .run_with_state(&state)
            .unwrap()
    });

    assert!(result.cancelled);
    assert!(!result.found);
    assert!(result.tested_total < result.total_combinations);
}

#[test]
fn state_with_earlier_match_is_rejected() {
    let state = SearchState::new();

    let first = search("b").alphabet(ab()).threads(1).run_with_state(&state).unwrap();
    assert_eq!(first.candidate.as_deref(), Some("b"));

    let recorder = Recorder::default();
    let err = search("ba")
        .alphabet(ab())
        .threads(2)
        .reporter(recorder.clone())
        .run_with_state(&state)
        .unwrap_err();

    assert_eq!(err, KeyspaceError::StateInUse);
    assert!(err.is_configuration());
    // The earlier match is left as it was and nothing was reported.
    assert_eq!(state.candidate(), Some("b"));
    let recorded = recorder.take();
    assert!(recorded.events.is_empty());
    assert!(recorded.finished.is_empty());
}

#[test]
fn unmatched_state_can_be_reused() {
    let state = SearchState::new();
    let first = search("b").alphabet(ab()).max_length(0).run_with_state(&state).unwrap();
    assert!(!first.found);

    let second = search("ba").alphabet(ab()).threads(2).run_with_state(&state).unwrap();
    assert_eq!(second.candidate.as_deref(), Some("ba"));
    // a, b, aa, ab, ba
    assert_eq!(second.tested_total, 5);
}

#[cfg(all(target_os = "linux", target_pointer_width = "64"))]
#[test]
fn unstartable_worker_is_internal_error() {
    let state = SearchState::new();
    let err = search("ab")
        .alphabet(ab())
        .threads(2)
        .worker_stack_size(1 << 60)
        .run_with_state(&state)
        .unwrap_err();

    assert!(matches!(&err, KeyspaceError::Internal(m) if m.contains("spawn")), "{err:?}");
    assert!(state.is_cancelled());
}
