//! NaN/Inf scanning of named numeric values reported by the engine.
//!
//! Every offending entry is reported; the scan never stops early and never
//! aggregates entries together.

use std::io::{self, Write};

use ndarray::{Array1, ArrayD};
use serde::Serialize;
use tracing::debug;

/// A model input or output as listed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: ArrayD<f64>,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: ArrayD<f64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// One-dimensional value.
    pub fn from_vec(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, Array1::from(values).into_dyn())
    }

    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self::from_vec(name, vec![value])
    }
}

/// An entry containing at least one non-finite element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub name: String,
    pub nan_count: usize,
    pub inf_count: usize,
}

/// Count NaN and infinite elements of a single entry.
pub fn inspect(entry: &NamedValue) -> Option<Finding> {
    let (nan_count, inf_count) = entry.value.iter().fold((0, 0), |(nan, inf), v| {
        (nan + usize::from(v.is_nan()), inf + usize::from(v.is_infinite()))
    });
    if nan_count == 0 && inf_count == 0 {
        return None;
    }
    Some(Finding {
        name: entry.name.clone(),
        nan_count,
        inf_count,
    })
}

/// Scan `entries`, writing one line per offending entry to `out`.
///
/// `label` names the collection (`input`, `output`) in each line.
pub fn scan<'a, I>(label: &str, entries: I, out: &mut dyn Write) -> io::Result<Vec<Finding>>
where
    I: IntoIterator<Item = &'a NamedValue>,
{
    let mut findings = Vec::new();
    let mut scanned = 0usize;
    for entry in entries {
        scanned += 1;
        if let Some(finding) = inspect(entry) {
            writeln!(
                out,
                "NaN/Inf detected in {label}: {} - {}",
                entry.name, entry.value
            )?;
            findings.push(finding);
        }
    }
    debug!(label, scanned, flagged = findings.len(), "non-finite scan finished");
    Ok(findings)
}
