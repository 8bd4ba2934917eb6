//! Fixed-schema CSV serialization.
//!
//! The column set is an immutable value: [`SCHEMA`] is an ordered array of
//! name/extractor pairs shared by reference, and the header line is derived
//! from it. [`CsvWriter`] owns the sink and the lazy-emission discipline:
//! the header goes out with the first data row after a bind, the quoted
//! settings field is appended to that first row only, and nothing is
//! flushed during normal operation.

use std::fmt;
use std::io::{self, Write};

use smallvec::SmallVec;

use crate::accum::Sample;

/// One serialized CSV value.
///
/// Integers print as plain decimals, floats with six decimal places,
/// strings verbatim.
#[derive(Clone, Copy, Debug)]
pub enum Cell<'a> {
    /// A string cell, written as-is (no quoting).
    Str(&'a str),
    /// An integer cell.
    Int(u64),
    /// A floating-point cell, formatted to six decimal places.
    Float(f64),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
        }
    }
}

/// Everything one data row is built from.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    /// Agent name for the `agent` column.
    pub agent: &'a str,
    /// Pause-adjusted wall clock in seconds for the `wall clock` column.
    pub wall_clock: f64,
    /// The per-interval statistics for this sample.
    pub sample: &'a Sample,
}

/// One column of the output: its header name and how to extract its cell.
pub struct Column {
    /// Header name, written verbatim in the header row.
    pub name: &'static str,
    /// Extracts this column's cell from a row.
    pub value: for<'a> fn(&Row<'a>) -> Cell<'a>,
}

/// The fixed column schema, in output order.
///
/// The trailing `settings` column is not listed here: it has no extractor
/// (the writer appends it to the first row per bind) but it does appear in
/// the header row.
pub const SCHEMA: [Column; 18] = [
    Column {
        name: "agent",
        value: |r| Cell::Str(r.agent),
    },
    Column {
        name: "wall clock",
        value: |r| Cell::Float(r.wall_clock),
    },
    Column {
        name: "dc num",
        value: |r| Cell::Int(r.sample.decision_cycles),
    },
    Column {
        name: "kernel time",
        value: |r| Cell::Float(r.sample.delta_kernel_secs),
    },
    Column {
        name: "avg time/dc",
        value: |r| Cell::Float(r.sample.kernel_secs_per_dc),
    },
    Column {
        name: "cpu time",
        value: |r| Cell::Float(r.sample.delta_cpu_secs),
    },
    Column {
        name: "pf total",
        value: |r| Cell::Int(r.sample.delta_production_firings),
    },
    Column {
        name: "avg time/pf",
        value: |r| Cell::Float(r.sample.kernel_secs_per_firing),
    },
    Column {
        name: "wm current",
        value: |r| Cell::Int(r.sample.wm_current),
    },
    Column {
        name: "wm mean",
        value: |r| Cell::Float(r.sample.wm_mean_per_dc),
    },
    Column {
        name: "wm max",
        value: |r| Cell::Int(r.sample.wm_max),
    },
    Column {
        name: "wm additions",
        value: |r| Cell::Int(r.sample.delta_wm_additions),
    },
    Column {
        name: "wm removals",
        value: |r| Cell::Int(r.sample.delta_wm_removals),
    },
    Column {
        name: "memory-subsystem time",
        value: |r| Cell::Float(r.sample.delta_memory_time_secs),
    },
    Column {
        name: "memory-subsystem time per dc",
        value: |r| Cell::Float(r.sample.memory_time_secs_per_dc),
    },
    Column {
        name: "memory retrieves",
        value: |r| Cell::Int(r.sample.delta_memory_retrieves),
    },
    Column {
        name: "memory queries",
        value: |r| Cell::Int(r.sample.delta_memory_queries),
    },
    Column {
        name: "memory stores",
        value: |r| Cell::Int(r.sample.delta_memory_stores),
    },
];

/// Streams sample rows to an owned `Write` sink.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use `BufWriter<File>`. With no sink bound the writer is disabled:
/// every write is a no-op.
///
/// Binding a sink clears the header and settings flags, so each bound
/// stream starts with its own header row and carries the one-time settings
/// field on its first data row. Rows are buffered; the only flushes are
/// the explicit [`flush`](Self::flush) and the best-effort flush on
/// [`unbind`](Self::unbind).
pub struct CsvWriter<W: Write> {
    sink: Option<W>,
    header_written: bool,
    settings_written: bool,
}

impl<W: Write> Default for CsvWriter<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a disabled writer with no sink bound.
    pub fn new() -> Self {
        Self {
            sink: None,
            header_written: false,
            settings_written: false,
        }
    }

    /// Bind a new sink, returning the previous one (flushed) if any.
    ///
    /// The new stream gets a fresh header row and a fresh one-time
    /// settings field on its first data row.
    pub fn bind(&mut self, sink: W) -> Option<W> {
        let old = self.unbind();
        self.sink = Some(sink);
        old
    }

    /// Disable output, flushing and returning the bound sink.
    ///
    /// A flush failure is logged and the sink is returned regardless.
    pub fn unbind(&mut self) -> Option<W> {
        self.header_written = false;
        self.settings_written = false;
        let mut old = self.sink.take();
        if let Some(sink) = old.as_mut() {
            if let Err(e) = sink.flush() {
                log::warn!("flush on unbind failed: {e}");
            }
        }
        old
    }

    /// Whether a sink is currently bound.
    pub fn is_bound(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether the next data row is the first after a bind and will carry
    /// the one-time settings field.
    ///
    /// Callers use this to build the settings string only when it will
    /// actually be written.
    pub fn settings_pending(&self) -> bool {
        !self.settings_written
    }

    /// Serialize one data row, emitting the header first if pending.
    ///
    /// `settings` is consulted only when this is the first row after a
    /// bind; it is written as one double-quoted trailing field and must
    /// not contain interior double quotes. Later rows omit the field
    /// entirely. A no-op while no sink is bound.
    pub fn write_row(&mut self, row: &Row<'_>, settings: Option<&str>) -> io::Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };

        if !self.header_written {
            for col in &SCHEMA {
                write!(sink, "{},", col.name)?;
            }
            sink.write_all(b"settings\n")?;
            self.header_written = true;
        }

        let cells: SmallVec<[Cell<'_>; SCHEMA.len()]> =
            SCHEMA.iter().map(|col| (col.value)(row)).collect();
        let mut sep = "";
        for cell in &cells {
            write!(sink, "{sep}{cell}")?;
            sep = ",";
        }
        if !self.settings_written {
            write!(sink, ",\"{}\"", settings.unwrap_or_default())?;
            self.settings_written = true;
        }
        sink.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the bound sink. A no-op while disabled.
    pub fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}
