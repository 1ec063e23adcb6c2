// src/scrape/engine.rs
//
// Concurrent fetch-and-retry over a batch of work items.
//
// One round = a fixed pool of scoped worker threads pulling items off a shared
// atomic cursor and sending `(index, outcome)` back over a channel. Only the
// collecting thread touches the accumulators. The round ends when every worker
// has drained the cursor (scope join), so rounds never overlap.
//
// Items answering `Retryable` go into the next round after an exponential
// backoff (plus jitter); after `max_attempts` rounds whatever is left is
// reported as exhausted. `Fatal` items are reported at once and never retried.

use std::{
    sync::{atomic::{AtomicUsize, Ordering}, mpsc},
    thread,
    time::Duration,
};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::options::RetryPolicy;
use crate::progress::{Progress, reborrow};
use crate::specs::{Outcome, RetryReason};

/// What came back from one batch.
#[derive(Debug)]
pub struct BatchReport<W, T> {
    /// Successful results, in input order.
    pub records: Vec<T>,
    /// Still retryable when the attempt budget ran out, with the last reason seen.
    pub exhausted: Vec<(W, RetryReason)>,
    /// Permanently failed items.
    pub failed: Vec<(W, String)>,
    /// Rounds actually run.
    pub rounds: u32,
}

impl<W, T> BatchReport<W, T> {
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_empty() && self.failed.is_empty()
    }
}

/// Run `fetch` over `items` until each one succeeds, fails for good, or runs out of attempts.
///
/// `workers == 0` spawns one thread per pending item. Progress is reported for the
/// first round only (every item is attempted once there); retry rounds log instead.
pub fn fetch_all<W, T, F>(
    label: &str,
    items: Vec<W>,
    workers: usize,
    policy: &RetryPolicy,
    fetch: F,
    mut progress: Option<&mut dyn Progress>,
) -> BatchReport<W, T>
where
    W: Sync,
    T: Send,
    F: Fn(&W) -> Outcome<T> + Sync,
{
    let attempts = policy.attempts();
    let total = items.len();

    let mut records: Vec<(usize, T)> = Vec::with_capacity(total);
    let mut failed = Vec::new();
    let mut pending: Vec<(usize, W)> = items.into_iter().enumerate().collect();
    let mut reasons: Vec<RetryReason> = Vec::new();
    let mut rounds = 0;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(label, total);
    }

    while !pending.is_empty() && rounds < attempts {
        rounds += 1;
        if rounds > 1 {
            let delay = jittered(policy.backoff(rounds - 1));
            info!(label, round = rounds, pending = pending.len(), delay_ms = delay.as_millis() as u64, "retrying after backoff");
            thread::sleep(delay);
        }

        let (idx, batch): (Vec<usize>, Vec<W>) = pending.into_iter().unzip();
        let sink = if rounds == 1 { reborrow(&mut progress) } else { None };
        let outcomes = run_round(&batch, workers, &fetch, sink);

        pending = Vec::new();
        reasons = Vec::new();
        let (mut ok, mut retry, mut fatal) = (0usize, 0usize, 0usize);

        for ((i, item), outcome) in idx.into_iter().zip(batch).zip(outcomes) {
            match outcome {
                Outcome::Success(rec) => {
                    ok += 1;
                    records.push((i, rec));
                }
                Outcome::Retryable(reason) => {
                    retry += 1;
                    debug!(label, item = i, %reason, "retryable");
                    pending.push((i, item));
                    reasons.push(reason);
                }
                Outcome::Fatal(msg) => {
                    fatal += 1;
                    warn!(label, item = i, error = %msg, "giving up on item");
                    failed.push((item, msg));
                }
            }
        }
        info!(label, round = rounds, ok, retry, fatal, "round finished");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let exhausted: Vec<(W, RetryReason)> = pending
        .into_iter()
        .zip(reasons)
        .map(|((i, item), reason)| {
            warn!(label, item = i, %reason, attempts, "retries exhausted");
            (item, reason)
        })
        .collect();

    records.sort_by_key(|(i, _)| *i);
    BatchReport {
        records: records.into_iter().map(|(_, rec)| rec).collect(),
        exhausted,
        failed,
        rounds,
    }
}

/* ---------------- helpers ---------------- */

/// One pass over `items`; outcome `k` belongs to `items[k]`.
fn run_round<W, T, F>(
    items: &[W],
    workers: usize,
    fetch: &F,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<Outcome<T>>
where
    W: Sync,
    T: Send,
    F: Fn(&W) -> Outcome<T> + Sync,
{
    let threads = match workers {
        0 => items.len(),
        n => n.min(items.len()),
    };
    let cursor = AtomicUsize::new(0);
    let mut slots: Vec<Option<Outcome<T>>> = items.iter().map(|_| None).collect();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, Outcome<T>)>();
        for _ in 0..threads {
            let tx = tx.clone();
            let cursor = &cursor;
            scope.spawn(move || loop {
                let i = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(i) else { break };
                if tx.send((i, fetch(item))).is_err() {
                    break;
                }
            });
        }
        drop(tx); // collector is the only receiver; the loop ends when workers do

        for (done, (i, outcome)) in rx.iter().enumerate() {
            slots[i] = Some(outcome);
            if let Some(p) = progress.as_deref_mut() {
                p.advance(done + 1, items.len());
            }
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Outcome::Fatal(s!("worker exited without a result"))))
        .collect()
}

/// `delay` plus a random extra of up to half of it.
fn jittered(delay: Duration) -> Duration {
    let half = delay.as_millis() as u64 / 2;
    if half == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=half))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Each item answers Busy `busy_for[item]` times, then succeeds with `item * 10`.
    struct Flaky {
        busy_for: HashMap<u32, u32>,
        calls: Mutex<HashMap<u32, u32>>,
    }

    impl Flaky {
        fn new(busy_for: &[(u32, u32)]) -> Self {
            Self { busy_for: busy_for.iter().copied().collect(), calls: Mutex::new(HashMap::new()) }
        }

        fn fetch(&self, item: &u32) -> Outcome<u32> {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(*item).or_default();
            *n += 1;
            if *n <= self.busy_for.get(item).copied().unwrap_or(0) {
                Outcome::Retryable(RetryReason::Busy)
            } else {
                Outcome::Success(item * 10)
            }
        }

        fn calls(&self, item: u32) -> u32 {
            self.calls.lock().unwrap().get(&item).copied().unwrap_or(0)
        }
    }

    #[derive(Default)]
    struct Recorder {
        begun: Option<(String, usize)>,
        last: Option<(usize, usize)>,
        advances: usize,
        finished: bool,
    }

    impl Progress for Recorder {
        fn begin(&mut self, label: &str, total: usize) {
            self.begun = Some((s!(label), total));
        }
        fn advance(&mut self, completed: usize, total: usize) {
            self.advances += 1;
            self.last = Some((completed, total));
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn busy_items_converge_within_budget() {
        let flaky = Flaky::new(&[(1, 2), (3, 1)]);
        let report = fetch_all("t", vec![1, 2, 3, 4], 2, &RetryPolicy::immediate(5), |i| flaky.fetch(i), None);

        assert_eq!(report.records, vec![10, 20, 30, 40]);
        assert!(report.is_complete());
        assert_eq!(report.rounds, 3);
        assert_eq!(flaky.calls(1), 3);
        assert_eq!(flaky.calls(2), 1);
    }

    #[test]
    fn items_still_busy_after_budget_are_exhausted() {
        let flaky = Flaky::new(&[(7, 100)]);
        let report = fetch_all("t", vec![7, 8], 4, &RetryPolicy::immediate(3), |i| flaky.fetch(i), None);

        assert_eq!(report.records, vec![80]);
        assert_eq!(report.exhausted, vec![(7, RetryReason::Busy)]);
        assert_eq!(report.rounds, 3);
        assert_eq!(flaky.calls(7), 3);
    }

    #[test]
    fn fatal_items_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let report: BatchReport<u32, u32> = fetch_all(
            "t",
            vec![1, 2],
            1,
            &RetryPolicy::immediate(5),
            |i| {
                if *i == 2 {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Outcome::Fatal(s!("HTTP 404"))
                } else {
                    Outcome::Success(*i)
                }
            },
            None,
        );
        assert_eq!(report.records, vec![1]);
        assert_eq!(report.failed, vec![(2, s!("HTTP 404"))]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.rounds, 1);
    }

    #[test]
    fn zero_workers_means_one_thread_per_item() {
        let items: Vec<u32> = (0..50).collect();
        let flaky = Flaky::new(&[(5, 1), (49, 2)]);
        let report = fetch_all("t", items, 0, &RetryPolicy::immediate(4), |i| flaky.fetch(i), None);
        assert_eq!(report.records, (0..50).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn empty_batch_runs_no_rounds() {
        let mut rec = Recorder::default();
        let report: BatchReport<u32, u32> =
            fetch_all("empty", Vec::new(), 4, &RetryPolicy::immediate(3), |_| unreachable!(), Some(&mut rec));
        assert!(report.records.is_empty());
        assert_eq!(report.rounds, 0);
        assert_eq!(rec.begun, Some((s!("empty"), 0)));
        assert!(rec.finished);
    }

    #[test]
    fn progress_covers_first_round_only() {
        let flaky = Flaky::new(&[(2, 1)]);
        let mut rec = Recorder::default();
        fetch_all("fights", vec![1, 2, 3], 2, &RetryPolicy::immediate(3), |i| flaky.fetch(i), Some(&mut rec));

        assert_eq!(rec.begun, Some((s!("fights"), 3)));
        assert_eq!(rec.advances, 3);
        assert_eq!(rec.last, Some((3, 3)));
        assert!(rec.finished);
    }

    #[test]
    fn jitter_stays_within_half_the_delay() {
        let base = Duration::from_millis(400);
        for _ in 0..50 {
            let d = jittered(base);
            assert!(d >= base && d <= Duration::from_millis(600));
        }
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }
}
