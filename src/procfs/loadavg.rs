use serde::Serialize;

use super::tokenize::{WHITESPACE, tokenize};
use super::{Procfs, ProcfsError, first_record};

pub const LOADAVG: &str = "loadavg";

/// 1, 5 and 15 minute load averages from `loadavg`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    /// runnable scheduling entities, from the `running/total` field.
    pub running: Option<u32>,
    /// existing scheduling entities, from the `running/total` field.
    pub total: Option<u32>,
}

impl LoadAverage {
    pub fn read<P: Procfs + ?Sized>(procfs: &P) -> Result<Self, ProcfsError> {
        let line = first_record(procfs, LOADAVG)?;
        Self::parse(&line).ok_or_else(|| ProcfsError::Malformed {
            path: LOADAVG.to_string(),
            detail: format!("expected three load averages, got {line:?}"),
        })
    }

    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = tokenize(line.trim(), WHITESPACE).non_empty();
        let one = fields.next()?.parse().ok()?;
        let five = fields.next()?.parse().ok()?;
        let fifteen = fields.next()?.parse().ok()?;

        let entities = fields.next().and_then(|field| field.split_once('/'));
        let running = entities.and_then(|(running, _)| running.parse().ok());
        let total = entities.and_then(|(_, total)| total.parse().ok());

        Some(Self {
            one,
            five,
            fifteen,
            running,
            total,
        })
    }
}
