//! Diagnostic records and the deduplicating sink the passes report into.
//!
//! Diagnostics are data, never control flow: a rule violation appends a
//! record and the walk continues. Nothing here prints; rendering is the
//! caller's concern.

use rustc_hash::FxHashSet;
use std::fmt;

/// A single static-analysis finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable description of the violation.
    pub message: String,
    /// 1-based source line of the first occurrence.
    pub line: u32,
    /// Name of the enclosing function, if the finding occurred inside one.
    pub function: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(name) => write!(f, "function '{}': {}", name, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Which fields key duplicate suppression.
///
/// The historical default collapses the same message inside the same function
/// even when it fires on several lines; only the first occurrence's line
/// survives. Keying by line as well keeps every occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// `(message, function)`: one report per message per function.
    #[default]
    MessageAndFunction,
    /// `(message, function, line)`: repeats on other lines still report.
    MessageFunctionAndLine,
}

/// An ordered diagnostic sink with duplicate suppression.
///
/// Records are kept in discovery order (pre-order AST traversal); consumers
/// wanting line-sorted output sort at the presentation layer.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: FxHashSet<(String, Option<String>, Option<u32>)>,
    key: DedupKey,
}

impl Diagnostics {
    /// A sink with the default `(message, function)` dedup key.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that additionally keys dedup by line.
    pub fn with_line_key() -> Self {
        Self {
            key: DedupKey::MessageFunctionAndLine,
            ..Self::default()
        }
    }

    /// The dedup key this sink was configured with.
    pub fn dedup_key(&self) -> DedupKey {
        self.key
    }

    /// Record a finding unless an equal one (under the dedup key) exists.
    pub fn report(&mut self, message: impl Into<String>, line: u32, function: Option<&str>) {
        self.push(Diagnostic {
            message: message.into(),
            line,
            function: function.map(str::to_owned),
        });
    }

    /// Insert a prebuilt record, subject to the same dedup policy.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let line = match self.key {
            DedupKey::MessageAndFunction => None,
            DedupKey::MessageFunctionAndLine => Some(diagnostic.line),
        };
        let key = (diagnostic.message.clone(), diagnostic.function.clone(), line);
        if self.seen.insert(key) {
            self.entries.push(diagnostic);
        }
    }

    /// Append another sink's records, still suppressing duplicates.
    ///
    /// The merged sink keeps its own dedup key; this is how the driver folds
    /// the two checking passes into one report without double-counting rules
    /// both passes enforce.
    pub fn merge(&mut self, other: Diagnostics) {
        for diagnostic in other.entries {
            self.push(diagnostic);
        }
    }

    /// Whether any findings were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of findings recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over findings in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// The recorded findings as a slice.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Consume the sink, yielding the findings in discovery order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.entries {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
