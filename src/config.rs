use crate::crc::Variant;

/// Printable ASCII without whitespace.
pub const DEFAULT_ALPHABET: &[u8] = b"!\"#$%&'()*+,-./\
    0123456789\
    :;<=>?@\
    ABCDEFGHIJKLMNOPQRSTUVWXYZ\
    [\\]^_`\
    abcdefghijklmnopqrstuvwxyz\
    {|}~";

pub const DEFAULT_RESULTS_PATH: &str = "results.txt";

const MAX_THREADS_PER_CPU: usize = 10;

/// Everything a run needs, fixed before the first worker starts.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub target: u32,
    pub variant: Variant,
    pub alphabet: Vec<u8>,
    pub concurrency: usize,
    /// Longest length to assign; `None` searches until stopped.
    pub max_length: Option<usize>,
}

impl RunConfig {
    pub fn new(target: u32, variant: Variant) -> Self {
        Self {
            target,
            variant,
            alphabet: DEFAULT_ALPHABET.to_vec(),
            concurrency: num_cpus::get().max(1),
            max_length: None,
        }
    }

    /// An empty alphabet means the default one.
    pub fn with_alphabet(mut self, alphabet: impl Into<Vec<u8>>) -> Self {
        let alphabet = alphabet.into();
        self.alphabet = if alphabet.is_empty() {
            DEFAULT_ALPHABET.to_vec()
        } else {
            alphabet
        };
        self
    }

    pub fn with_concurrency(mut self, requested: i64) -> Self {
        self.concurrency = resolve_concurrency(requested, num_cpus::get());
        self
    }

    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }
}

/// Non-positive requests get one thread per cpu, big ones are capped at ten per cpu.
pub fn resolve_concurrency(requested: i64, parallelism: usize) -> usize {
    let parallelism = parallelism.max(1);
    let ceiling = parallelism * MAX_THREADS_PER_CPU;
    match usize::try_from(requested) {
        Ok(0) | Err(_) => parallelism,
        Ok(n) => n.min(ceiling),
    }
}

/// Parses `0x1234abcd`; anything malformed reads as zero.
pub fn parse_target(text: &str) -> u32 {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).unwrap_or(0)
}

pub fn parse_variant(text: &str) -> Variant {
    text.trim()
        .parse::<i64>()
        .map(Variant::from_selector)
        .unwrap_or_default()
}

/// Malformed input reads as zero, which resolves to the cpu count.
pub fn parse_concurrency(text: &str, parallelism: usize) -> usize {
    let requested = text.trim().parse::<i64>().unwrap_or(0);
    resolve_concurrency(requested, parallelism)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet() {
        assert_eq!(DEFAULT_ALPHABET.len(), 94);
        assert!(DEFAULT_ALPHABET.iter().all(|b| b.is_ascii_graphic()));
        let mut sorted = DEFAULT_ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, (b'!'..=b'~').collect::<Vec<_>>());
    }

    #[test]
    fn concurrency_bounds() {
        assert_eq!(resolve_concurrency(-5, 8), 8);
        assert_eq!(resolve_concurrency(0, 8), 8);
        assert_eq!(resolve_concurrency(3, 8), 3);
        assert_eq!(resolve_concurrency(80, 8), 80);
        assert_eq!(resolve_concurrency(81, 8), 80);
        assert_eq!(resolve_concurrency(5, 0), 5);
        assert_eq!(resolve_concurrency(-1, 0), 1);
    }

    #[test]
    fn malformed_input_falls_back() {
        assert_eq!(parse_target("0x86a072c0\n"), 0x86a072c0);
        assert_eq!(parse_target("0XDEADBEEF"), 0xdeadbeef);
        assert_eq!(parse_target("0xnothex"), 0);
        assert_eq!(parse_target("0x123456789"), 0);
        assert_eq!(parse_variant("2\n"), Variant::Castagnoli);
        assert_eq!(parse_variant("7"), Variant::Ieee);
        assert_eq!(parse_variant("koopman"), Variant::Ieee);
        assert_eq!(parse_concurrency("-5", 4), 4);
        assert_eq!(parse_concurrency("lots", 4), 4);
        assert_eq!(parse_concurrency(" 12 ", 4), 12);
    }

    #[test]
    fn builder() {
        let config = RunConfig::new(0x1234, Variant::Koopman)
            .with_alphabet(Vec::new())
            .with_concurrency(-5)
            .with_max_length(Some(3));
        assert_eq!(config.alphabet, DEFAULT_ALPHABET);
        assert_eq!(config.concurrency, num_cpus::get().max(1));
        assert_eq!(config.max_length, Some(3));

        let config = config.with_alphabet("ab");
        assert_eq!(config.alphabet, b"ab");
    }
}
