use core::ops::ControlFlow;
use std::time::Duration;

use crate::{MatchRecord, Reporter, Stats};

/// Prints matches to stdout as they arrive and a progress table to stderr
/// every `interval`.
pub struct StatPrinter {
    interval: Option<Duration>,
    alphabet_len: usize,
    on_found: ControlFlow<(), ()>,
    printed_header: bool,
    prev_t: Duration,
    prev_c: u64,
}

impl StatPrinter {
    /// An `interval` of zero seconds turns the progress table off.
    pub fn new(interval: u64, alphabet_len: usize, on_found: ControlFlow<(), ()>) -> Self {
        Self {
            interval: (interval > 0).then(|| Duration::from_secs(interval)),
            alphabet_len,
            on_found,
            printed_header: false,
            prev_t: Duration::ZERO,
            prev_c: 0,
        }
    }
}

impl Reporter for StatPrinter {
    fn report_match(&mut self, record: &MatchRecord) -> ControlFlow<(), ()> {
        println!("{}", record);
        self.on_found
    }

    fn tick_interval(&self) -> Duration {
        self.interval.unwrap_or(Duration::from_secs(1))
    }

    fn tick(&mut self, stats: &Stats, elapsed: Duration) {
        if self.interval.is_none() {
            return;
        }

        if !self.printed_header {
            eprintln!("{t:>9} {c:>16} {cps:>9} {len:>4} {et:>10} {m:>5} {a:>4}",
                t="elapsed", c="candidates", cps="mc/s", len="len",
                et="ETA len", m="found", a="thr",
            );
            self.printed_header = true;
        }

        let cps = (stats.candidates - self.prev_c) as f64
            / (elapsed - self.prev_t).as_secs_f64().max(f64::EPSILON);
        self.prev_t = elapsed;
        self.prev_c = stats.candidates;

        let length = stats.longest_length().unwrap_or(0);
        let expected_time = stats.estimate_time_to_length(self.alphabet_len, length, elapsed.as_secs_f64());

        eprintln!("{t:>9.1} {c:>16} {cps:>9.2} {len:>4} {et:>10.1} {m:>5} {a:>4}",
            t=elapsed.as_secs_f64(), c=stats.candidates, cps=cps/1e6,
            len=length, et=expected_time, m=stats.matches, a=stats.active,
        );
    }
}
