//! Structural diff of two value trees, for debugging round trips
//!
//! Paths are written from the root context `base`: map members append
//! `.key`, list elements append `[index]`.

use std::fmt;

use sbvj_format::{Map, Value};
use tracing::warn;

const ROOT_CONTEXT: &str = "base";

/// What differs at one path
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// Keys present only in the left map
    ExtraKeysInA(Vec<String>),
    /// Keys present only in the right map
    ExtraKeysInB(Vec<String>),
    /// Lists of different lengths; elements are not compared
    ListLength {
        /// Left length
        a: usize,
        /// Right length
        b: usize,
    },
    /// Scalars (or values of different variants) that are not equal
    Value {
        /// Left value
        a: Value,
        /// Right value
        b: Value,
    },
}

/// A single difference and where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Path of the differing value
    pub context: String,
    /// The difference
    pub kind: MismatchKind,
}

impl Mismatch {
    /// Weight of this mismatch in [`DiffReport::count`]
    pub fn weight(&self) -> usize {
        match &self.kind {
            MismatchKind::ExtraKeysInA(keys) | MismatchKind::ExtraKeysInB(keys) => keys.len(),
            MismatchKind::ListLength { a, b } => (*a).max(*b),
            MismatchKind::Value { .. } => 1,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.context)?;
        match &self.kind {
            MismatchKind::ExtraKeysInA(keys) => write!(f, "  extra keys in a: {keys:?}"),
            MismatchKind::ExtraKeysInB(keys) => write!(f, "  extra keys in b: {keys:?}"),
            MismatchKind::ListLength { a, b } => write!(f, "  list len mismatch: {a}, {b}"),
            MismatchKind::Value { a, b } => {
                writeln!(f, "  value mismatch")?;
                writeln!(f, "  {a:?} ({})", a.type_name())?;
                write!(f, "  {b:?} ({})", b.type_name())
            }
        }
    }
}

/// All differences between two trees
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    /// Differences in traversal order
    pub mismatches: Vec<Mismatch>,
}

impl DiffReport {
    /// Weighted number of differences: one per extra key, the longer length
    /// for a list length mismatch, one per unequal value
    pub fn count(&self) -> usize {
        self.mismatches.iter().map(Mismatch::weight).sum()
    }

    /// Check whether the trees were identical
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn push(&mut self, context: &str, kind: MismatchKind) {
        let mismatch = Mismatch {
            context: context.to_string(),
            kind,
        };
        warn!("{mismatch}");
        self.mismatches.push(mismatch);
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mismatch in &self.mismatches {
            writeln!(f, "{mismatch}")?;
        }
        write!(f, "{} difference(s)", self.count())
    }
}

/// Compare two trees; floats are compared by bit pattern
pub fn diff(a: &Value, b: &Value) -> DiffReport {
    let mut report = DiffReport::default();
    diff_at(a, b, ROOT_CONTEXT, &mut report);
    report
}

fn diff_at(a: &Value, b: &Value, context: &str, report: &mut DiffReport) {
    match (a, b) {
        (Value::Map(a), Value::Map(b)) => diff_maps(a, b, context, report),
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                report.push(
                    context,
                    MismatchKind::ListLength {
                        a: a.len(),
                        b: b.len(),
                    },
                );
                return;
            }
            for (i, (va, vb)) in a.iter().zip(b).enumerate() {
                diff_at(va, vb, &format!("{context}[{i}]"), report);
            }
        }
        (Value::Float(x), Value::Float(y)) if x.to_bits() == y.to_bits() => {}
        (Value::Float(_), Value::Float(_)) => report.push(
            context,
            MismatchKind::Value {
                a: a.clone(),
                b: b.clone(),
            },
        ),
        _ if a != b => report.push(
            context,
            MismatchKind::Value {
                a: a.clone(),
                b: b.clone(),
            },
        ),
        _ => {}
    }
}

fn diff_maps(a: &Map, b: &Map, context: &str, report: &mut DiffReport) {
    let mut a_extra: Vec<String> = a.keys().filter(|k| !b.contains_key(*k)).cloned().collect();
    let mut b_extra: Vec<String> = b.keys().filter(|k| !a.contains_key(*k)).cloned().collect();
    a_extra.sort_unstable();
    b_extra.sort_unstable();

    if !a_extra.is_empty() {
        report.push(context, MismatchKind::ExtraKeysInA(a_extra));
    }
    if !b_extra.is_empty() {
        report.push(context, MismatchKind::ExtraKeysInB(b_extra));
    }

    for (key, va) in a {
        if let Some(vb) = b.get(key) {
            diff_at(va, vb, &format!("{context}.{key}"), report);
        }
    }
}
