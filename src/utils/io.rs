//! Tolerant line streaming over possibly non-UTF-8 log files.
//!
//! Engine logs occasionally contain raw bytes (truncated writes, binary key
//! material echoed into messages). Invalid sequences are substituted rather
//! than aborting the read.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Iterator over lossily decoded lines of a byte stream.
///
/// Trailing `\n` / `\r\n` terminators are stripped.
pub struct LossyLines<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Open a file for lossy line-by-line streaming
pub fn lossy_lines(path: &Path) -> io::Result<LossyLines<BufReader<File>>> {
    Ok(LossyLines::new(BufReader::new(File::open(path)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(bytes: &[u8]) -> Vec<String> {
        LossyLines::new(Cursor::new(bytes.to_vec()))
            .map(|line| line.unwrap())
            .collect()
    }

    #[test]
    fn test_strips_line_terminators() {
        assert_eq!(collect(b"a\nb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_substitutes_invalid_utf8() {
        let lines = collect(b"ok\n\xff\xfe bad\nrest");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ok");
        assert!(lines[1].contains('\u{fffd}'));
        assert_eq!(lines[2], "rest");
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"").is_empty());
    }
}
