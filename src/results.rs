use core::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// A candidate whose checksum equals the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    pub checksum: u32,
    pub candidate: Vec<u8>,
    /// Time since the run started.
    pub elapsed: Duration,
}

impl MatchRecord {
    /// Writes `0x%08x<TAB>candidate<TAB>elapsed\n` with the candidate bytes as-is.
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "0x{:08x}\t", self.checksum)?;
        out.write_all(&self.candidate)?;
        writeln!(out, "\t{:?}", self.elapsed)
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08x}\t{}\t{:?}",
            self.checksum,
            String::from_utf8_lossy(&self.candidate),
            self.elapsed
        )
    }
}

pub fn save_results(path: &Path, records: &[MatchRecord]) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_owned(),
        source,
    })?;
    let write_err = |source| Error::Write {
        path: path.to_owned(),
        source,
    };

    let mut out = BufWriter::new(file);
    for record in records {
        record.write_line(&mut out).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    tracing::info!(records = records.len(), path = %path.display(), "results saved");
    Ok(())
}

/// Reads one results line back. The candidate is everything between the first
/// and the last tab, so candidates containing tabs survive.
pub fn parse_line(line: &[u8]) -> Result<MatchRecord> {
    let malformed = || Error::Parse(String::from_utf8_lossy(line).into_owned());
    let line = line.strip_suffix(b"\n").unwrap_or(line);

    let first = line.iter().position(|&b| b == b'\t').ok_or_else(malformed)?;
    let last = line.iter().rposition(|&b| b == b'\t').ok_or_else(malformed)?;
    if first == last {
        return Err(malformed());
    }

    let checksum = core::str::from_utf8(&line[..first])
        .ok()
        .and_then(|text| text.strip_prefix("0x"))
        .filter(|digits| digits.len() == 8)
        .and_then(|digits| u32::from_str_radix(digits, 16).ok())
        .ok_or_else(malformed)?;
    let elapsed = core::str::from_utf8(&line[last + 1..])
        .ok()
        .and_then(parse_duration)
        .ok_or_else(malformed)?;

    Ok(MatchRecord {
        checksum,
        candidate: line[first + 1..last].to_vec(),
        elapsed,
    })
}

/// Inverse of `Duration`'s `Debug` output (`1.5s`, `12.034ms`, `7µs`, `0ns`).
fn parse_duration(text: &str) -> Option<Duration> {
    let (number, unit_nanos) = if let Some(n) = text.strip_suffix("ns") {
        (n, 1)
    } else if let Some(n) = text.strip_suffix("µs") {
        (n, 1_000)
    } else if let Some(n) = text.strip_suffix("ms") {
        (n, 1_000_000)
    } else if let Some(n) = text.strip_suffix('s') {
        (n, 1_000_000_000)
    } else {
        return None;
    };

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let mut nanos = whole.parse::<u64>().ok()?.checked_mul(unit_nanos)?;
    if !fraction.is_empty() {
        if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = fraction.parse::<u64>().ok()?;
        nanos = nanos.checked_add(digits * unit_nanos / 10_u64.pow(fraction.len() as u32))?;
    }
    Some(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(checksum: u32, candidate: &[u8], nanos: u64) -> MatchRecord {
        MatchRecord {
            checksum,
            candidate: candidate.to_vec(),
            elapsed: Duration::from_nanos(nanos),
        }
    }

    #[test]
    fn line_format() {
        let mut out = Vec::new();
        record(0xab, b"x!y", 1_500_000).write_line(&mut out).unwrap();
        assert_eq!(out, b"0x000000ab\tx!y\t1.5ms\n");
        assert_eq!(record(0xab, b"x!y", 1_500_000).to_string(), "0x000000ab\tx!y\t1.5ms");
    }

    #[test]
    fn durations_parse_back() {
        for nanos in [0, 7, 1_000, 1_234, 999_999, 1_234_567, 1_000_000_000, 12_345_678_901, 3_600_000_000_000] {
            let duration = Duration::from_nanos(nanos);
            assert_eq!(parse_duration(&format!("{:?}", duration)), Some(duration));
        }
        assert_eq!(parse_duration("1.5"), None);
        assert_eq!(parse_duration("ms"), None);
        assert_eq!(parse_duration("1.-5s"), None);
    }

    #[test]
    fn save_and_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let records = vec![
            record(0x71beeff9, b"b", 52_417),
            record(0xdeadbeef, b"a\tb", 2_000_000_123),
            record(0x00000001, b"~}|", 61_000_000_000),
        ];
        save_results(&path, &records).unwrap();

        let contents = fs::read(&path).unwrap();
        let lines: Vec<&[u8]> = contents.split_inclusive(|&b| b == b'\n').collect();
        assert_eq!(lines.len(), records.len());
        for (line, expected) in lines.into_iter().zip(&records) {
            assert_eq!(&parse_line(line).unwrap(), expected);
        }
    }

    #[test]
    fn save_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        save_results(&path, &[]).unwrap();
        assert!(fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.txt");
        match save_results(&path, &[record(1, b"a", 1)]) {
            Err(Error::Create { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a create error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_lines() {
        assert!(parse_line(b"").is_err());
        assert!(parse_line(b"0x00000001\tabc").is_err());
        assert!(parse_line(b"0x1\tabc\t1s").is_err());
        assert!(parse_line(b"deadbeef\tabc\t1s").is_err());
        assert!(parse_line(b"0x00000001\tabc\tsoon").is_err());
    }
}
