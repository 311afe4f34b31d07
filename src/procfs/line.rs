use std::io::{self, BufRead, BufReader, Read};

/// Longest record handed out by a [`LineReader`] unless configured otherwise.
pub const DEFAULT_MAX_LEN: usize = 1024;

/// Pulls newline-terminated records out of a byte stream.
///
/// Records longer than the configured maximum are cut at that length; the
/// rest of the physical line becomes the next record.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_len: usize,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_len(inner, DEFAULT_MAX_LEN)
    }

    pub fn with_max_len(inner: R, max_len: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_len: max_len.max(1),
        }
    }

    /// Replaces `buf` with the next record, without its trailing newline.
    ///
    /// Returns the number of bytes consumed from the stream. A blank line
    /// still consumes its newline, so `0` only ever means end of stream.
    pub fn read_record(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let mut bytes = Vec::new();
        let mut consumed = 0;

        loop {
            let (used, done) = {
                let available = match self.inner.fill_buf() {
                    Ok(available) => available,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    break;
                }

                let room = self.max_len - bytes.len();
                let scan = &available[..available.len().min(room + 1)];
                if let Some(newline) = scan.iter().position(|&b| b == b'\n') {
                    bytes.extend_from_slice(&scan[..newline]);
                    (newline + 1, true)
                } else if room == 0 {
                    (0, true)
                } else {
                    let take = scan.len().min(room);
                    bytes.extend_from_slice(&scan[..take]);
                    (take, false)
                }
            };

            self.inner.consume(used);
            consumed += used;
            if done {
                break;
            }
        }

        buf.push_str(&String::from_utf8_lossy(&bytes));
        Ok(consumed)
    }

    pub fn records(self) -> Records<R> {
        Records {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over the records of a [`LineReader`]. Stops after the first error.
pub struct Records<R> {
    reader: LineReader<R>,
    failed: bool,
}

impl<R: Read> Iterator for Records<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut record = String::new();
        match self.reader.read_record(&mut record) {
            Ok(0) => None,
            Ok(_) => Some(Ok(record)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_all(input: &str, max_len: usize) -> Vec<String> {
        LineReader::with_max_len(Cursor::new(input.as_bytes()), max_len)
            .records()
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn strips_trailing_newline() {
        assert_eq!(read_all("one\ntwo\n", 64), vec!["one", "two"]);
    }

    #[test]
    fn final_record_without_newline() {
        assert_eq!(read_all("one\ntwo", 64), vec!["one", "two"]);
    }

    #[test]
    fn blank_line_is_not_end_of_stream() {
        let mut reader = LineReader::new(Cursor::new("\nafter\n"));
        let mut buf = String::from("stale");
        assert_eq!(reader.read_record(&mut buf).unwrap(), 1);
        assert_eq!(buf, "");
        assert_eq!(reader.read_record(&mut buf).unwrap(), 6);
        assert_eq!(buf, "after");
        assert_eq!(reader.read_record(&mut buf).unwrap(), 0);
    }

    #[test]
    fn line_exactly_at_max_len_keeps_its_newline_together() {
        assert_eq!(read_all("abcd\nef\n", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn long_line_is_cut_into_records() {
        assert_eq!(read_all("abcdefghij\n", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_stream_returns_zero() {
        let mut reader = LineReader::new(Cursor::new(""));
        let mut buf = String::new();
        assert_eq!(reader.read_record(&mut buf).unwrap(), 0);
    }

    #[test]
    fn survives_tiny_internal_buffers() {
        // a reader that yields one byte per read call
        struct Trickle<'a>(&'a [u8]);
        impl Read for Trickle<'_> {
            fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
                match self.0.split_first() {
                    Some((&b, rest)) if !out.is_empty() => {
                        out[0] = b;
                        self.0 = rest;
                        Ok(1)
                    }
                    _ => Ok(0),
                }
            }
        }
        let records: Vec<String> = LineReader::new(Trickle(b"MemTotal: 1\nMemFree: 2"))
            .records()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(records, vec!["MemTotal: 1", "MemFree: 2"]);
    }
}
