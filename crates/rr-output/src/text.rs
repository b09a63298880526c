//! Plain-text event log: one human-readable line per event.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::writer::EventWriter;
use crate::{EventRow, OutputResult};

/// Writes `[T<tick>] <message>` lines, e.g. `[T12] Train A entered segment 1`.
///
/// Lines are buffered; the [`EventLogger`][crate::EventLogger] flushes them
/// whenever its queue runs empty.
pub struct TextEventLog<W: Write> {
    out:      BufWriter<W>,
    finished: bool,
}

impl TextEventLog<File> {
    /// Open `path` for appending, creating it if needed.  Earlier runs stay
    /// in the file.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> TextEventLog<W> {
    pub fn new(inner: W) -> Self {
        Self { out: BufWriter::new(inner), finished: false }
    }
}

impl<W: Write + Send> EventWriter for TextEventLog<W> {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        writeln!(self.out, "[T{}] {}", row.tick, row.message)?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
