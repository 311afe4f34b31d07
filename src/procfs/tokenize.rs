/// Delimiters for whitespace-separated files such as `uptime` and `loadavg`.
pub const WHITESPACE: &str = " \t";
/// Delimiter for `Key:\tvalue` files such as `meminfo` and `<pid>/status`.
pub const KEY_VALUE: &str = ":";
/// Delimiters for `cpuinfo`, where keys themselves contain spaces.
pub const CPUINFO: &str = " :\t";

/// Splits `line` on any character found in `delims`.
///
/// Every delimiter terminates a field, so consecutive delimiters produce empty
/// fields and a trailing delimiter produces an empty final field. A line with
/// no delimiter is a single field. An empty line produces no fields.
pub fn tokenize<'a, 'd>(line: &'a str, delims: &'d str) -> Tokens<'a, 'd> {
    Tokens {
        rest: (!line.is_empty()).then_some(line),
        delims,
    }
}

/// Collects [`tokenize`] into a vector of borrowed fields.
pub fn split_fields<'a>(line: &'a str, delims: &str) -> Vec<&'a str> {
    tokenize(line, delims).collect()
}

/// Borrowing iterator over the fields of one line.
#[derive(Clone, Debug)]
pub struct Tokens<'a, 'd> {
    rest: Option<&'a str>,
    delims: &'d str,
}

impl<'a> Tokens<'a, '_> {
    /// The unsplit text after the last field handed out, if any remains.
    pub fn remainder(&self) -> Option<&'a str> {
        self.rest
    }

    /// Skips empty fields, for files padded with runs of spaces.
    pub fn non_empty(self) -> impl Iterator<Item = &'a str> {
        self.filter(|field| !field.is_empty())
    }
}

impl<'a> Iterator for Tokens<'a, '_> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.char_indices().find(|(_, c)| self.delims.contains(*c)) {
            Some((at, delim)) => {
                self.rest = Some(&rest[at + delim.len_utf8()..]);
                Some(&rest[..at])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}
