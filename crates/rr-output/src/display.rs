//! `ConsoleDisplay` — redraws the ring on a terminal from each snapshot.
//!
//! ```text
//! segment 0  free
//! segment 1  occupied by A
//! …
//!  =A----------==----------==…---------B
//! ```
//!
//! Above is the plain style.  With colors, stations get a blue background
//! instead of `=`, trains are bold white inside a block and blue inside a
//! station, and segment lines are red when occupied and green when free.

use std::io::{self, Write};

use rr_sim::SimObserver;
use rr_track::TrackLayout;
use rr_train::Snapshot;
use tracing::warn;

use crate::OutputError;

const RESET:      &str = "\x1B[0m";
const RED_BG:     &str = "\x1B[41m";
const GREEN_BG:   &str = "\x1B[42m";
const BLUE_BG:    &str = "\x1B[44m";
const BOLD_WHITE: &str = "\x1B[1;37m";
const CLEAR:      &str = "\x1B[2J\x1B[H";

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStyle {
    /// Emit ANSI colors.  Without colors stations are drawn as `=`.
    pub color: bool,
    /// Clear the screen before every frame.
    pub clear: bool,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self { color: true, clear: true }
    }
}

impl DisplayStyle {
    /// No escapes at all; one frame after another.
    pub fn plain() -> Self {
        Self { color: false, clear: false }
    }
}

/// A [`SimObserver`] drawing every snapshot to `out`.
///
/// Write failures are logged once and kept; the simulation is never stopped
/// because the terminal went away.
pub struct ConsoleDisplay<W: Write> {
    out:        W,
    style:      DisplayStyle,
    layout:     Option<TrackLayout>,
    last_error: Option<OutputError>,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout(style: DisplayStyle) -> Self {
        Self::new(io::stdout(), style)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, style: DisplayStyle) -> Self {
        Self { out, style, layout: None, last_error: None }
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, snapshot: &Snapshot) {
        let Some(layout) = &self.layout else {
            return;
        };
        let frame = render(layout, snapshot, self.style);
        let result = self.out.write_all(frame.as_bytes()).and_then(|()| self.out.flush());
        if let Err(e) = result
            && self.last_error.is_none()
        {
            warn!(error = %e, "display write failed");
            self.last_error = Some(e.into());
        }
    }
}

impl<W: Write> SimObserver for ConsoleDisplay<W> {
    fn on_start(&mut self, layout: &TrackLayout) {
        self.layout = Some(layout.clone());
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.draw(snapshot);
    }

    fn on_sim_end(&mut self, snapshot: &Snapshot) {
        self.draw(snapshot);
    }
}

/// One full frame for `snapshot`.
pub fn render(layout: &TrackLayout, snapshot: &Snapshot, style: DisplayStyle) -> String {
    let mut s = String::new();
    if style.clear {
        s.push_str(CLEAR);
    }

    for segment in layout.segment_ids() {
        let line = match snapshot.holder(segment) {
            Some(holder) => {
                let name = snapshot
                    .train(holder)
                    .map(|v| v.name.to_string())
                    .unwrap_or_else(|| holder.to_string());
                format!("segment {}  occupied by {name}", segment.0)
            }
            None if snapshot.is_occupied(segment) => format!("segment {}  occupied", segment.0),
            None => format!("segment {}  free", segment.0),
        };
        if style.color {
            let bg = if snapshot.is_occupied(segment) { RED_BG } else { GREEN_BG };
            s.push_str(bg);
            s.push_str(&line);
            s.push_str(RESET);
        } else {
            s.push_str(&line);
        }
        s.push('\n');
    }

    for v in &snapshot.trains {
        s.push_str(&format!(
            "{:<3} pos {:>4}  {:<8}  {:<9}  laps {}\n",
            v.name, v.position, v.direction.to_string(), v.phase.to_string(), v.laps
        ));
    }

    paint(&mut s, style, GREEN_BG, ' ');
    for position in 0..layout.total_length() {
        let station = layout.is_station(position);
        let train = snapshot.trains.iter().find(|v| v.position == position);
        match (train, station) {
            (Some(v), true)  => paint(&mut s, style, BLUE_BG, initial(&v.name)),
            (Some(v), false) => paint(&mut s, style, BOLD_WHITE, initial(&v.name)),
            (None, true)     => {
                let c = if style.color { ' ' } else { '=' };
                paint(&mut s, style, BLUE_BG, c)
            }
            (None, false)    => s.push('-'),
        }
    }
    paint(&mut s, style, GREEN_BG, ' ');
    s.push('\n');
    s
}

fn initial(name: &str) -> char {
    name.chars().next().unwrap_or('?')
}

fn paint(s: &mut String, style: DisplayStyle, code: &str, c: char) {
    if style.color {
        s.push_str(code);
        s.push(c);
        s.push_str(RESET);
    } else {
        s.push(c);
    }
}
