//! Integration tests for rr-output.

use std::sync::Arc;

use rr_core::{Direction, SegmentId, Tick, TrainId};
use rr_train::{EventKind, Snapshot, TrainEvent, TrainPhase, TrainView};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn event(tick: u64, kind: EventKind) -> TrainEvent {
    TrainEvent { train: TrainId(0), name: Arc::from("A"), tick: Tick(tick), position: 13, kind }
}

fn view(id: u32, name: &str, position: u32, direction: Direction, held: Option<u32>) -> TrainView {
    TrainView {
        id:        TrainId(id),
        name:      Arc::from(name),
        direction,
        position,
        held:      held.map(SegmentId),
        phase:     if held.is_some() { TrainPhase::Occupying } else { TrainPhase::Traveling },
        tick:      Tick(4),
        odometer:  4,
        laps:      0,
    }
}

/// 3 segments × 6 units (2 station + 4 block), A at 1 forward, B at 9 in
/// segment 1's block.
fn small_snapshot(seq: u64) -> Snapshot {
    Snapshot {
        seq,
        trains:    vec![
            view(0, "A", 1, Direction::Forward, None),
            view(1, "B", 9, Direction::Backward, Some(1)),
        ],
        occupancy: vec![false, true, false],
        holders:   vec![None, Some(TrainId(1)), None],
    }
}

fn small_layout() -> rr_track::TrackLayout {
    rr_track::TrackLayout::uniform(3, 6, 2).unwrap()
}

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_owned).collect())
        .collect();
    (headers, rows)
}

// ── Writers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod writers {
    use super::*;
    use crate::{
        CsvEventLog, CsvSnapshotLog, EventRow, EventWriter, SnapshotRow, SnapshotWriter,
        TextEventLog,
    };

    #[test]
    fn csv_event_log_rows() {
        let dir = tmp();
        let path = dir.path().join("events.csv");
        let mut w = CsvEventLog::create(&path).unwrap();
        w.write_event(&EventRow::from(&event(3, EventKind::Entered(SegmentId(1))))).unwrap();
        w.write_event(&EventRow::from(&event(90, EventKind::LapCompleted(1)))).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_csv(&path);
        assert_eq!(headers, ["tick", "train", "event", "segment", "position", "message"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["3", "A", "entered", "1", "13", "Train A entered segment 1"]);
        assert_eq!(rows[1][3], "");
        assert_eq!(rows[1][5], "Train A completed lap 1");
    }

    #[test]
    fn text_event_log_lines() {
        let dir = tmp();
        let path = dir.path().join("events.log");
        let mut w = TextEventLog::create(&path).unwrap();
        w.write_event(&EventRow::from(&event(12, EventKind::Waiting(SegmentId(2))))).unwrap();
        w.write_event(&EventRow::from(&event(14, EventKind::Stopped))).unwrap();
        w.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, ["[T12] Train A waiting for segment 2", "[T14] Train A stopped at 13"]);
    }

    #[test]
    fn text_event_log_appends_to_an_existing_file() {
        let dir = tmp();
        let path = dir.path().join("events.log");
        for tick in [1, 2] {
            let mut w = TextEventLog::create(&path).unwrap();
            w.write_event(&EventRow::from(&event(tick, EventKind::Stopped))).unwrap();
            w.finish().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, ["[T1] Train A stopped at 13", "[T2] Train A stopped at 13"]);
    }

    #[test]
    fn csv_snapshot_log_rows() {
        let dir = tmp();
        let path = dir.path().join("snapshots.csv");
        let mut w = CsvSnapshotLog::create(&path).unwrap();
        let snap = small_snapshot(7);
        let rows: Vec<_> = snap.trains.iter().map(|v| SnapshotRow::new(snap.seq, v)).collect();
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_csv(&path);
        assert_eq!(headers, ["seq", "train", "position", "direction", "held", "phase", "tick", "laps"]);
        assert_eq!(rows[0], ["7", "A", "1", "forward", "", "traveling", "4", "0"]);
        assert_eq!(rows[1], ["7", "B", "9", "backward", "1", "occupying", "4", "0"]);
    }
}

// ── Snapshot observer ─────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use rr_sim::SimObserver;

    use super::*;
    use crate::{CsvSnapshotLog, SnapshotObserver};

    #[test]
    fn unchanged_snapshots_are_written_once() {
        let dir = tmp();
        let path = dir.path().join("snapshots.csv");
        let mut obs = SnapshotObserver::new(CsvSnapshotLog::create(&path).unwrap());
        obs.on_snapshot(&small_snapshot(1));
        obs.on_snapshot(&small_snapshot(1));
        obs.on_snapshot(&small_snapshot(2));
        obs.on_sim_end(&small_snapshot(2));
        assert!(obs.take_error().is_none());

        let (_, rows) = read_csv(&path);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn each_refresh_reaches_disk_before_the_end() {
        let dir = tmp();
        let path = dir.path().join("snapshots.csv");
        let mut obs = SnapshotObserver::new(CsvSnapshotLog::create(&path).unwrap());
        obs.on_snapshot(&small_snapshot(1));

        let (_, rows) = read_csv(&path);
        assert_eq!(rows.len(), 2);
        assert!(obs.take_error().is_none());
    }
}

// ── Logger ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod logger {
    use std::io;
    use std::time::{Duration, Instant};

    use crossbeam_channel::{Receiver, bounded};
    use rr_train::EventSink;

    use super::*;
    use crate::{
        CsvEventLog, EventLogger, EventRow, EventWriter, OutputError, OutputResult, TextEventLog,
    };

    #[test]
    fn logger_writes_everything_sent() {
        let dir = tmp();
        let path = dir.path().join("events.csv");
        let logger = EventLogger::spawn(CsvEventLog::create(&path).unwrap(), 64).unwrap();
        let sink = logger.sink();
        for t in 0..20 {
            sink.record(&event(t, EventKind::Entered(SegmentId(0))));
        }
        let stats = logger.finish().unwrap();
        assert_eq!(stats.written, 20);
        assert_eq!(stats.dropped, 0);

        let (_, rows) = read_csv(&path);
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[19][0], "19");
    }

    #[test]
    fn events_reach_disk_while_the_logger_runs() {
        let dir = tmp();
        let path = dir.path().join("events.log");
        let logger = EventLogger::spawn(TextEventLog::create(&path).unwrap(), 64).unwrap();
        let sink = logger.sink();
        for t in 0..50 {
            sink.record(&event(t, EventKind::Entered(SegmentId(0))));
        }

        // No finish yet: the writer thread flushes once the queue is empty.
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut lines = 0;
        while Instant::now() < deadline {
            lines = std::fs::read_to_string(&path).unwrap().lines().count();
            if lines == 50 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(lines, 50);

        let stats = logger.finish().unwrap();
        assert_eq!(stats.written, 50);
    }

    /// Blocks in `write_event` until its gate is closed.
    struct GatedWriter {
        gate: Receiver<()>,
    }

    impl EventWriter for GatedWriter {
        fn write_event(&mut self, _row: &EventRow) -> OutputResult<()> {
            let _ = self.gate.recv();
            Ok(())
        }
        fn flush(&mut self) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (open, gate) = bounded::<()>(0);
        let logger = EventLogger::spawn(GatedWriter { gate }, 1).unwrap();
        let sink = logger.sink();
        for t in 0..10 {
            sink.record(&event(t, EventKind::Stopped));
        }
        // At most one event in the channel and one inside the writer.
        assert!(sink.dropped() >= 8, "dropped {}", sink.dropped());

        drop(open);
        let stats = logger.finish().unwrap();
        assert_eq!(stats.written + stats.dropped, 10);
    }

    struct FailingWriter;

    impl EventWriter for FailingWriter {
        fn write_event(&mut self, _row: &EventRow) -> OutputResult<()> {
            Err(io::Error::other("disk full").into())
        }
        fn flush(&mut self) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported_at_finish() {
        let logger = EventLogger::spawn(FailingWriter, 8).unwrap();
        let sink = logger.sink();
        sink.record(&event(1, EventKind::Stopped));
        sink.record(&event(2, EventKind::Stopped));
        assert!(matches!(logger.finish(), Err(OutputError::Io(_))));
    }

    #[test]
    fn logs_a_real_run() {
        let dir = tmp();
        let path = dir.path().join("events.csv");
        let logger = EventLogger::spawn(CsvEventLog::create(&path).unwrap(), 4096).unwrap();
        let cfg = rr_core::RailConfig { step_millis: 0, ..rr_core::RailConfig::default() };
        rr_sim::SimBuilder::new(cfg)
            .events(logger.sink())
            .build()
            .unwrap()
            .run_ticks(100)
            .unwrap();
        let stats = logger.finish().unwrap();
        assert_eq!(stats.dropped, 0);

        let (_, rows) = read_csv(&path);
        let count = |e: &str| rows.iter().filter(|r| r[2] == e).count();
        assert_eq!(count("stopped"), 2);
        assert!(count("lap") >= 2);
        // B's initial block was claimed at build time, without an event.
        assert_eq!(count("entered") + 1, count("released"));
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod display {
    use std::io::{self, Write};

    use rr_sim::SimObserver;

    use super::*;
    use crate::{ConsoleDisplay, DisplayStyle, render};

    #[test]
    fn plain_frame() {
        let frame = render(&small_layout(), &small_snapshot(1), DisplayStyle::plain());
        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines[0], "segment 0  free");
        assert_eq!(lines[1], "segment 1  occupied by B");
        assert_eq!(lines[2], "segment 2  free");
        assert!(lines[3].starts_with("A   pos    1  forward"));
        assert!(lines[4].starts_with("B   pos    9  backward  occupying"));
        assert_eq!(lines[5], " =A----==-B--==---- ");
    }

    #[test]
    fn color_frame_uses_ansi() {
        let frame = render(&small_layout(), &small_snapshot(1), DisplayStyle::default());
        assert!(frame.starts_with("\x1B[2J\x1B[H"));
        assert!(frame.contains("\x1B[41msegment 1  occupied by B\x1B[0m"));
        assert!(frame.contains("\x1B[42msegment 0  free\x1B[0m"));
        assert!(frame.contains("\x1B[1;37mB\x1B[0m"));
        assert!(frame.contains("\x1B[44mA\x1B[0m"));
    }

    #[test]
    fn draws_only_after_start() {
        let mut d = ConsoleDisplay::new(Vec::new(), DisplayStyle::plain());
        d.on_snapshot(&small_snapshot(1));
        d.on_start(&small_layout());
        d.on_snapshot(&small_snapshot(2));
        d.on_sim_end(&small_snapshot(3));
        let out = String::from_utf8(d.into_inner()).unwrap();
        assert_eq!(out.matches("segment 0  free").count(), 2);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_kept_not_raised() {
        let mut d = ConsoleDisplay::new(BrokenPipe, DisplayStyle::plain());
        d.on_start(&small_layout());
        d.on_snapshot(&small_snapshot(1));
        d.on_snapshot(&small_snapshot(2));
        assert!(d.take_error().is_some());
        assert!(d.take_error().is_none());
    }
}
