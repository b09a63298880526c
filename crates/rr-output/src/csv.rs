//! CSV output backend.
//!
//! - [`CsvEventLog`]: `tick,train,event,segment,position,message`
//! - [`CsvSnapshotLog`]: `seq,train,position,direction,held,phase,tick,laps`
//!
//! Empty `segment`/`held` cells mean "none".

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::{EventWriter, SnapshotWriter};
use crate::{EventRow, OutputResult, SnapshotRow};

pub const EVENT_HEADER: [&str; 6] = ["tick", "train", "event", "segment", "position", "message"];

pub const SNAPSHOT_HEADER: [&str; 8] =
    ["seq", "train", "position", "direction", "held", "phase", "tick", "laps"];

fn opt(v: Option<u32>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Writes one CSV record per train event.
pub struct CsvEventLog<W: Write> {
    out:      Writer<W>,
    finished: bool,
}

impl CsvEventLog<File> {
    /// Create (truncating) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvEventLog<W> {
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(EVENT_HEADER)?;
        Ok(Self { out, finished: false })
    }
}

impl<W: Write + Send> EventWriter for CsvEventLog<W> {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.out.write_record(&[
            row.tick.to_string(),
            row.train.clone(),
            row.event.to_string(),
            opt(row.segment),
            row.position.to_string(),
            row.message.clone(),
        ])?;
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

/// Writes one CSV record per train per display snapshot.
pub struct CsvSnapshotLog<W: Write> {
    out:      Writer<W>,
    finished: bool,
}

impl CsvSnapshotLog<File> {
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvSnapshotLog<W> {
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(SNAPSHOT_HEADER)?;
        Ok(Self { out, finished: false })
    }
}

impl<W: Write> SnapshotWriter for CsvSnapshotLog<W> {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.out.write_record(&[
                row.seq.to_string(),
                row.train.clone(),
                row.position.to_string(),
                row.direction.to_owned(),
                opt(row.held),
                row.phase.clone(),
                row.tick.to_string(),
                row.laps.to_string(),
            ])?;
        }
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
