use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub(crate) struct AtomicStats {
    pub(crate) candidates: AtomicU64,
    pub(crate) matches: AtomicU64,
    pub(crate) lengths_started: AtomicU64,
    pub(crate) lengths_finished: AtomicU64,
    pub(crate) active: AtomicU64,
    pub(crate) peak_active: AtomicU64,
}

impl AtomicStats {
    pub(crate) fn worker_started(&self) {
        self.lengths_started.fetch_add(1, Ordering::Relaxed);
        let active = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_active.fetch_max(active, Ordering::Relaxed);
    }

    pub(crate) fn worker_finished(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        self.lengths_finished.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn report(&self) -> Stats {
        Stats {
            candidates: self.candidates.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            lengths_started: self.lengths_started.load(Ordering::Relaxed),
            lengths_finished: self.lengths_finished.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            peak_active: self.peak_active.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub candidates: u64,
    pub matches: u64,
    pub lengths_started: u64,
    pub lengths_finished: u64,
    pub active: u64,
    pub peak_active: u64,
}

impl Stats {
    /// Longest length assigned so far.
    pub fn longest_length(&self) -> Option<u64> {
        self.lengths_started.checked_sub(1)
    }

    /// Seconds until every length up to `length` has been hashed, at the
    /// average rate seen so far.
    pub fn estimate_time_to_length(&self, alphabet_len: usize, length: u64, elapsed_secs: f64) -> f64 {
        // sum of k^l for l in 0..=length
        let k = alphabet_len as f64;
        let total = if alphabet_len == 1 {
            (length + 1) as f64
        } else {
            (k.powf(length as f64 + 1.0) - 1.0) / (k - 1.0)
        };
        let hashed = self.candidates as f64;
        let hps = hashed / elapsed_secs;
        (total - hashed).max(0.0) / hps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_tracks_active_workers() {
        let stats = AtomicStats::default();
        stats.worker_started();
        stats.worker_started();
        stats.worker_finished();
        stats.worker_started();
        let report = stats.report();
        assert_eq!(report.lengths_started, 3);
        assert_eq!(report.lengths_finished, 1);
        assert_eq!(report.active, 2);
        assert_eq!(report.peak_active, 2);
        assert_eq!(report.longest_length(), Some(2));
        assert_eq!(Stats::default().longest_length(), None);
    }

    #[test]
    fn estimate() {
        // 1 + 2 + 4 + 8 = 15 candidates through length 3, 5 done at 1/s
        let stats = Stats {
            candidates: 5,
            ..Default::default()
        };
        let eta = stats.estimate_time_to_length(2, 3, 5.0);
        assert!((eta - 10.0).abs() < 1e-9, "eta = {}", eta);

        let stats = Stats {
            candidates: 2,
            ..Default::default()
        };
        let eta = stats.estimate_time_to_length(1, 3, 1.0);
        assert!((eta - 1.0).abs() < 1e-9, "eta = {}", eta);

        let stats = Stats {
            candidates: 100,
            ..Default::default()
        };
        assert_eq!(stats.estimate_time_to_length(2, 3, 1.0), 0.0);
    }
}
