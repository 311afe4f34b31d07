use serde::Serialize;

use super::tokenize::{CPUINFO, tokenize};
use super::{Procfs, ProcfsError, records};

pub const CPUINFO_PATH: &str = "cpuinfo";

/// The cpu model and the number of logical processing units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuInfo {
    pub model_name: String,
    pub logical_unit_count: u32,
}

impl CpuInfo {
    pub fn read<P: Procfs + ?Sized>(procfs: &P) -> Result<Self, ProcfsError> {
        let mut scanner = CpuInfoScanner::default();
        for line in records(procfs, CPUINFO_PATH)? {
            scanner.feed(&line?);
        }
        Ok(scanner.finish())
    }

    pub fn parse(contents: &str) -> Self {
        let mut scanner = CpuInfoScanner::default();
        contents.lines().for_each(|line| scanner.feed(line));
        scanner.finish()
    }
}

/// Accumulates [`CpuInfo`] over the repeated per-core blocks.
#[derive(Debug, Default)]
struct CpuInfoScanner {
    model_name: Option<String>,
    logical_unit_count: u32,
}

impl CpuInfoScanner {
    fn feed(&mut self, line: &str) {
        let fields: Vec<&str> = tokenize(line, CPUINFO).collect();
        match fields.as_slice() {
            ["model", "name", rest @ ..] if self.model_name.is_none() => {
                let name = rest
                    .iter()
                    .filter(|field| !field.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                self.model_name = Some(name);
            }
            ["processor", ..] => self.logical_unit_count += 1,
            _ => {}
        }
    }

    fn finish(self) -> CpuInfo {
        CpuInfo {
            model_name: self.model_name.unwrap_or_default(),
            logical_unit_count: self.logical_unit_count,
        }
    }
}
