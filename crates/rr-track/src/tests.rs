//! Unit tests for rr-track.

use rr_core::{Direction, SegmentId, TrainId};

use crate::TrackLayout;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The classic ring: 7 segments × 12 units (2 station + 10 block) = 84.
fn classic() -> TrackLayout {
    TrackLayout::uniform(7, 12, 2).unwrap()
}

const A: TrainId = TrainId(0);
const B: TrainId = TrainId(1);

// ── TrackLayout ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod layout {
    use super::*;

    #[test]
    fn total_length_is_sum_of_lengths() {
        let l = classic();
        assert_eq!(l.total_length(), 84);
        assert_eq!(l.segment_count(), 7);

        let l = TrackLayout::from_lengths(vec![5, 9, 12], 2).unwrap();
        assert_eq!(l.total_length(), 26);
        assert_eq!(l.segment_start(SegmentId(2)), 14);
    }

    #[test]
    fn uniform_mapping_is_division() {
        let l = classic();
        for p in 0..84 {
            assert_eq!(l.segment_of(p), SegmentId(p / 12), "position {p}");
            assert_eq!(l.offset_in_segment(p), p % 12);
        }
    }

    #[test]
    fn non_uniform_mapping() {
        let l = TrackLayout::from_lengths(vec![5, 9, 12], 2).unwrap();
        assert_eq!(l.segment_of(0), SegmentId(0));
        assert_eq!(l.segment_of(4), SegmentId(0));
        assert_eq!(l.segment_of(5), SegmentId(1));
        assert_eq!(l.segment_of(13), SegmentId(1));
        assert_eq!(l.segment_of(14), SegmentId(2));
        assert_eq!(l.segment_of(25), SegmentId(2));
        assert_eq!(l.offset_in_segment(15), 1);
    }

    #[test]
    fn stations_and_blocks() {
        let l = classic();
        assert!(l.is_station(0));
        assert!(l.is_station(1));
        assert!(!l.is_station(2));
        assert_eq!(l.block_of(1), None);
        assert_eq!(l.block_of(2), Some(SegmentId(0)));
        assert_eq!(l.block_of(23), Some(SegmentId(1)));
        assert_eq!(l.block_of(24), None);
    }

    #[test]
    fn check_position_rejects_outside_ring() {
        let l = classic();
        assert_eq!(l.check_position(83).unwrap(), SegmentId(6));
        assert!(l.check_position(84).is_err());
    }

    #[test]
    fn invalid_layouts_rejected() {
        assert!(TrackLayout::from_lengths(vec![], 2).is_err());
        assert!(TrackLayout::uniform(3, 12, 1).is_err());
        assert!(TrackLayout::uniform(3, 2, 2).is_err());
    }

    #[test]
    fn distance_both_directions() {
        let l = classic();
        assert_eq!(l.distance(1, 83, Direction::Forward), 82);
        assert_eq!(l.distance(1, 83, Direction::Backward), 2);
        assert_eq!(l.distance(5, 5, Direction::Forward), 0);
    }

    #[test]
    fn ring_longer_than_half_u32() {
        let total = 3_000_000_000u32;
        let l = TrackLayout::uniform(1, total, 2).unwrap();
        assert_eq!(l.total_length(), total);
        assert_eq!(l.distance(total - 1, 0, Direction::Forward), 1);
        assert_eq!(l.distance(0, total - 1, Direction::Backward), 1);
        assert_eq!(l.distance(0, total - 1, Direction::Forward), total - 1);
        assert_eq!(l.distance(10, 5, Direction::Forward), total - 5);
        assert_eq!(l.block_of(total - 1), Some(SegmentId(0)));
        assert_eq!(l.entry_block(0, Direction::Backward), Some(SegmentId(0)));
    }
}

// ── Boundaries on the 84-unit ring ────────────────────────────────────────────

#[cfg(test)]
mod boundaries {
    use super::*;

    #[test]
    fn forward_crossing_into_segment_one() {
        let l = classic();
        // 11 → 12 leaves segment 0's block for segment 1's station.
        assert_eq!(l.exit_block(11, 12), Some(SegmentId(0)));
        // Segment 1 is entered from its forward platform slot (13 → 14).
        assert_eq!(l.entry_block(12, Direction::Forward), None);
        assert_eq!(l.entry_block(13, Direction::Forward), Some(SegmentId(1)));
        // …and released when crossing 23 → 24.
        assert_eq!(l.exit_block(22, 23), None);
        assert_eq!(l.exit_block(23, 24), Some(SegmentId(1)));
    }

    #[test]
    fn backward_crossing_into_segment_one() {
        let l = classic();
        assert_eq!(l.entry_block(24, Direction::Backward), Some(SegmentId(1)));
        assert_eq!(l.entry_block(25, Direction::Backward), None);
        assert_eq!(l.exit_block(14, 13), Some(SegmentId(1)));
        assert_eq!(l.exit_block(13, 12), None);
    }

    #[test]
    fn backward_entry_wraps_to_last_segment() {
        let l = classic();
        assert_eq!(l.entry_block(0, Direction::Backward), Some(SegmentId(6)));
        assert_eq!(l.exit_block(0, 83), None);
        assert_eq!(l.block_of(83), Some(SegmentId(6)));
    }

    #[test]
    fn platform_slots_differ_per_direction() {
        let l = classic();
        assert_eq!(l.platform_slot(SegmentId(3), Direction::Forward), 37);
        assert_eq!(l.platform_slot(SegmentId(3), Direction::Backward), 36);
    }

    #[test]
    fn every_block_entry_is_preceded_by_an_entry_boundary() {
        let l = classic();
        for dir in [Direction::Forward, Direction::Backward] {
            for p in 0..l.total_length() {
                let q = dir.step(p, l.total_length());
                let entering = l.block_of(p) != l.block_of(q) && l.block_of(q).is_some();
                if entering {
                    assert_eq!(l.entry_block(p, dir), l.block_of(q), "{dir} {p}->{q}");
                }
            }
        }
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use rr_core::StopToken;

    use super::*;
    use crate::{Segment, TrackError};

    #[test]
    fn enter_then_leave_round_trips() {
        let s = Segment::new(SegmentId(0), 12);
        let stop = StopToken::new();
        s.enter(A, &stop).unwrap();
        assert!(s.is_occupied());
        assert_eq!(s.holder(), Some(A));
        s.leave(A).unwrap();
        let st = s.state();
        assert!(!st.occupied);
        assert_eq!((st.entries, st.exits), (1, 1));
    }

    #[test]
    fn try_enter_refuses_when_occupied() {
        let s = Segment::new(SegmentId(0), 12);
        assert!(s.try_enter(A).unwrap());
        assert!(!s.try_enter(B).unwrap());
        assert_eq!(s.holder(), Some(A));
    }

    #[test]
    fn re_entering_own_segment_is_an_error() {
        let s = Segment::new(SegmentId(2), 12);
        assert!(s.try_enter(A).unwrap());
        assert!(matches!(s.try_enter(A), Err(TrackError::AlreadyHeld { .. })));
    }

    #[test]
    fn leave_by_non_holder_is_rejected() {
        let s = Segment::new(SegmentId(0), 12);
        assert!(matches!(s.leave(A), Err(TrackError::NotHolder { holder: None, .. })));
        s.try_enter(A).unwrap();
        assert!(matches!(s.leave(B), Err(TrackError::NotHolder { holder: Some(A), .. })));
        assert!(s.is_occupied());
    }

    #[test]
    fn blocked_enter_proceeds_after_leave() {
        let s = Arc::new(Segment::new(SegmentId(1), 12));
        let stop = StopToken::new();
        s.try_enter(A).unwrap();

        let entered = Arc::new(AtomicBool::new(false));
        let waiter = {
            let s = Arc::clone(&s);
            let stop = stop.clone();
            let entered = Arc::clone(&entered);
            thread::spawn(move || {
                s.enter(B, &stop).unwrap();
                entered.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(30));
        assert!(!entered.load(Ordering::SeqCst), "entered while occupied");
        s.leave(A).unwrap();
        waiter.join().expect("waiter panicked");
        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(s.holder(), Some(B));
    }

    #[test]
    fn interrupt_cancels_blocked_enter() {
        let s = Arc::new(Segment::new(SegmentId(1), 12));
        let stop = StopToken::new();
        s.try_enter(A).unwrap();

        let waiter = {
            let s = Arc::clone(&s);
            let stop = stop.clone();
            thread::spawn(move || s.enter(B, &stop))
        };
        thread::sleep(Duration::from_millis(30));
        stop.cancel();
        s.interrupt();

        let result = waiter.join().expect("waiter panicked");
        assert!(matches!(result, Err(TrackError::Cancelled(SegmentId(1)))));
        assert_eq!(s.holder(), Some(A));
    }

    #[test]
    fn cancelled_token_refuses_free_segment() {
        let s = Segment::new(SegmentId(0), 12);
        let stop = StopToken::new();
        stop.cancel();
        assert!(matches!(s.enter(A, &stop), Err(TrackError::Cancelled(_))));
        assert!(!s.is_occupied());
    }

    #[test]
    fn enter_within_times_out() {
        let s = Segment::new(SegmentId(0), 12);
        let stop = StopToken::new();
        s.try_enter(A).unwrap();
        let result = s.enter_within(B, &stop, Duration::from_millis(20));
        assert!(matches!(result, Err(TrackError::TimedOut { .. })));
        s.leave(A).unwrap();
        s.enter_within(B, &stop, Duration::from_millis(20)).unwrap();
        assert_eq!(s.holder(), Some(B));
    }

    #[test]
    fn exclusive_under_contention() {
        let s = Arc::new(Segment::new(SegmentId(0), 12));
        let stop = StopToken::new();
        let contenders = 6;
        let rounds = 50;
        let barrier = Arc::new(Barrier::new(contenders));
        let inside = Arc::new(AtomicUsize::new(0));
        let violation = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = (0..contenders)
            .map(|i| {
                let s = Arc::clone(&s);
                let stop = stop.clone();
                let barrier = Arc::clone(&barrier);
                let inside = Arc::clone(&inside);
                let violation = Arc::clone(&violation);
                thread::spawn(move || {
                    let me = TrainId(i as u32);
                    barrier.wait();
                    for _ in 0..rounds {
                        s.enter(me, &stop).unwrap();
                        if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                            violation.store(true, Ordering::SeqCst);
                        }
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                        s.leave(me).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().expect("contender panicked");
        }
        assert!(!violation.load(Ordering::SeqCst), "two holders at once");
        let st = s.state();
        assert_eq!(st.entries, (contenders * rounds) as u64);
        assert_eq!(st.entries, st.exits);
        assert!(!st.occupied);
    }
}

// ── Track ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod track {
    use rr_core::{RailConfig, StopToken};

    use super::*;
    use crate::Track;

    #[test]
    fn from_default_config() {
        let t = Track::from_config(&RailConfig::default()).unwrap();
        assert_eq!(t.segments().len(), 7);
        assert_eq!(t.segment(SegmentId(3)).length(), 12);
        assert_eq!(t.occupancy(), vec![false; 7]);
        assert!(t.is_quiescent());
    }

    #[test]
    fn bad_config_is_rejected() {
        let cfg = RailConfig { station_length: 0, ..RailConfig::default() };
        assert!(Track::from_config(&cfg).is_err());
    }

    #[test]
    fn occupancy_and_quiescence() {
        let t = Track::new(classic());
        let stop = StopToken::new();
        t.segment(SegmentId(2)).enter(A, &stop).unwrap();
        assert!(t.occupancy()[2]);
        assert!(!t.is_quiescent());
        t.segment(SegmentId(2)).leave(A).unwrap();
        assert!(t.is_quiescent());
        assert_eq!(t.states()[2].entries, 1);
    }
}
