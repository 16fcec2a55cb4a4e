mod config;
mod crc;
mod enumerate;
mod error;
mod printer;
mod results;
mod stats;

use core::ops::ControlFlow;
use core::sync::atomic::{AtomicBool, Ordering};
use crossbeam_channel::{RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::Scope;
use std::time::{Duration, Instant};

pub use crate::config::{
    parse_concurrency, parse_target, parse_variant, resolve_concurrency, RunConfig,
    DEFAULT_ALPHABET, DEFAULT_RESULTS_PATH,
};
pub use crate::crc::{Checksum, Variant};
pub use crate::enumerate::{combinations, search_space};
pub use crate::error::{Error, Result};
pub use crate::printer::StatPrinter;
pub use crate::results::{parse_line, save_results, MatchRecord};
pub use crate::stats::Stats;
use crate::stats::AtomicStats;

/// Candidates a worker hashes between updates of the shared counter.
const CANDIDATE_BATCH: u64 = 1 << 12;

pub trait StopSignal {
    fn stop(&self);
}

/// Receives matches on the collecting thread.
pub trait Reporter {
    /// `Break` stops the run.
    fn report_match(&mut self, record: &MatchRecord) -> ControlFlow<(), ()>;

    fn tick(&mut self, _stats: &Stats, _elapsed: Duration) {}

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(250)
    }
}

/// Handle that stops a running [`Collider`] from another thread or a signal handler.
#[derive(Clone)]
pub struct Stopper {
    running: Arc<AtomicBool>,
}

impl StopSignal for Stopper {
    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

pub struct Collider<C: Checksum = Variant> {
    checksum: C,
    config: RunConfig,
    running: Arc<AtomicBool>,
    stats: AtomicStats,
}

impl Collider<Variant> {
    pub fn new(config: RunConfig) -> Self {
        Self::with_checksum(config.variant, config)
    }
}

impl<C: Checksum> Collider<C> {
    pub fn with_checksum(checksum: C, config: RunConfig) -> Self {
        Self {
            checksum,
            config,
            running: Arc::new(AtomicBool::new(true)),
            stats: Default::default(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn stopper(&self) -> Stopper {
        Stopper {
            running: Arc::clone(&self.running),
        }
    }

    pub fn report_stats(&self) -> Stats {
        self.stats.report()
    }

    fn admits(&self, length: usize) -> bool {
        self.config.max_length.map_or(true, |max| length <= max)
    }

    /// Searches lengths 0, 1, 2, ... with `concurrency` workers until stopped,
    /// the reporter breaks, or every length up to `max_length` is exhausted.
    /// Returns the matches in the order they arrived.
    ///
    /// A stop is never undone: stopping before `run` makes it return at once.
    pub fn run<R: Reporter>(&self, reporter: &mut R) -> Vec<MatchRecord> {
        let (result_tx, result_rx) = crossbeam_channel::bounded::<MatchRecord>(0);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<usize>(0);
        let concurrency = self.config.concurrency.max(1);
        let start = Instant::now();
        let mut records = Vec::new();

        tracing::info!(
            hash = %format!("0x{:08x}", self.config.target),
            alphabet_len = self.config.alphabet.len(),
            concurrency,
            "search started"
        );

        std::thread::scope(|s| {
            let mut next_length = 0;
            let mut active = 0;
            while active < concurrency
                && self.running.load(Ordering::Relaxed)
                && self.admits(next_length)
            {
                self.spawn_worker(s, next_length, start, result_tx.clone(), done_tx.clone());
                next_length += 1;
                active += 1;
            }

            // Replace every finished worker with one at the next length.
            s.spawn(move || {
                while active > 0 {
                    let length = match done_rx.recv() {
                        Ok(length) => length,
                        Err(_) => break,
                    };
                    active -= 1;
                    tracing::debug!(length, "length exhausted");

                    if self.running.load(Ordering::Relaxed) && self.admits(next_length) {
                        self.spawn_worker(s, next_length, start, result_tx.clone(), done_tx.clone());
                        next_length += 1;
                        active += 1;
                    }
                }
                tracing::debug!(next_length, "coordinator finished");
            });

            // Every sender is owned by a worker or the coordinator, so this
            // drains until all of them are gone.
            let interval = reporter.tick_interval();
            let mut last_tick = Instant::now();
            loop {
                match result_rx.recv_timeout(interval) {
                    Ok(record) => {
                        self.stats.matches.fetch_add(1, Ordering::Relaxed);
                        let flow = reporter.report_match(&record);
                        records.push(record);
                        if flow.is_break() {
                            self.running.store(false, Ordering::Relaxed);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                if last_tick.elapsed() >= interval {
                    reporter.tick(&self.stats.report(), start.elapsed());
                    last_tick = Instant::now();
                }
            }
        });

        tracing::info!(matches = records.len(), elapsed = ?start.elapsed(), "search stopped");
        records
    }

    fn spawn_worker<'scope>(
        &'scope self,
        s: &'scope Scope<'scope, '_>,
        length: usize,
        start: Instant,
        results: Sender<MatchRecord>,
        done: Sender<usize>,
    ) {
        self.stats.worker_started();
        tracing::debug!(length, "worker started");
        s.spawn(move || {
            self.worker(length, start, &results);
            drop(results);
            self.stats.worker_finished();
            let _ = done.send(length);
        });
    }

    fn worker(&self, length: usize, start: Instant, results: &Sender<MatchRecord>) {
        let target = self.config.target;
        let mut hashed = 0;

        let flow = combinations(&self.config.alphabet, length, |candidate| {
            if !self.running.load(Ordering::Relaxed) {
                return ControlFlow::Break(());
            }

            hashed += 1;
            if hashed == CANDIDATE_BATCH {
                self.stats.candidates.fetch_add(hashed, Ordering::Relaxed);
                hashed = 0;
            }

            if self.checksum.checksum(candidate) == target {
                let record = MatchRecord {
                    checksum: target,
                    candidate: candidate.to_vec(),
                    elapsed: start.elapsed(),
                };
                // The collector only hangs up once every sender is gone.
                if results.send(record).is_err() {
                    return ControlFlow::Break(());
                }
            }

            ControlFlow::Continue(())
        });

        self.stats.candidates.fetch_add(hashed, Ordering::Relaxed);
        if flow.is_break() {
            tracing::debug!(length, "worker stopped early");
        }
    }
}
