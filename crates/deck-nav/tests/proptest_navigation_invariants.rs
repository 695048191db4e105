//! Property-based invariant tests for deck navigation.
//!
//! These tests verify invariants that must hold for **any** sequence of
//! commands, key presses, and observer reports:
//!
//! 1. The active index stays in `[0, count - 1]` (and at 0 for an empty deck).
//! 2. `go_next` then `go_prev` restores any interior index.
//! 3. Boundaries: `go_next` at the end issues nothing; `go_prev` at 0 re-snaps.
//! 4. An entered report for `k` makes `k` active.
//! 5. Entered flags never reset and each position is reported entered once.
//! 6. Registration is idempotent: duplicates change neither count nor order.

use std::collections::HashSet;

use deck_nav::{
    IntersectionEntry, IntersectionSink, NavigationController, ScrollRequest, SectionId,
    SectionRegistry, ViewportHost, ViewportObserver,
};
use proptest::prelude::*;

// ── Host ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingHost {
    requests: Vec<ScrollRequest>,
}

impl ViewportHost for CountingHost {
    fn scroll_into_view(&mut self, request: ScrollRequest) {
        self.requests.push(request);
    }
    fn observe(&mut self, _: &[SectionId], _: f32, _: IntersectionSink) {}
    fn disconnect(&mut self) {}
    fn set_key_capture(&mut self, _: bool) {}
}

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Next,
    Prev,
    ScrollTo(usize),
    /// Observer batch: (section id, entering) pairs.
    Report(Vec<(u64, bool)>),
}

fn op_strategy(count: u64) -> impl Strategy<Value = Op> {
    let ids = 0..count.max(1) + 2;
    prop_oneof![
        3 => Just(Op::Next),
        3 => Just(Op::Prev),
        2 => (0usize..40).prop_map(Op::ScrollTo),
        2 => prop::collection::vec((ids, any::<bool>()), 0..5).prop_map(Op::Report),
    ]
}

fn scenario() -> impl Strategy<Value = (u64, Vec<Op>)> {
    (0u64..24).prop_flat_map(|count| (Just(count), prop::collection::vec(op_strategy(count), 0..80)))
}

fn batch(entries: &[(u64, bool)]) -> Vec<IntersectionEntry> {
    entries
        .iter()
        .map(|&(id, entering)| IntersectionEntry {
            section: SectionId::new(id),
            is_intersecting: entering,
            ratio: if entering { 1.0 } else { 0.0 },
        })
        .collect()
}

fn controller(count: u64) -> NavigationController {
    NavigationController::new(SectionRegistry::from_handles(0..count))
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Clamping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn active_index_stays_in_range((count, ops) in scenario()) {
        let mut nav = controller(count);
        let mut host = CountingHost::default();
        for op in &ops {
            match op {
                Op::Next => nav.go_next(&mut host),
                Op::Prev => nav.go_prev(&mut host),
                Op::ScrollTo(i) => nav.scroll_to(*i, &mut host),
                Op::Report(entries) => {
                    ViewportObserver::apply_batch(&batch(entries), &mut nav);
                }
            }
            if count == 0 {
                prop_assert_eq!(nav.active_index(), 0);
            } else {
                prop_assert!(nav.active_index() < count as usize, "{} >= {}", nav.active_index(), count);
            }
        }
        if count == 0 {
            prop_assert!(host.requests.is_empty());
        }
        for request in &host.requests {
            prop_assert!(request.index < count as usize);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Round trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn next_then_prev_restores_interior_index(count in 3u64..40, seed in any::<usize>()) {
        let interior = 1 + seed % (count as usize - 2);
        let mut nav = controller(count);
        let mut host = CountingHost::default();
        nav.scroll_to(interior, &mut host);
        nav.go_next(&mut host);
        prop_assert_eq!(nav.active_index(), interior + 1);
        nav.go_prev(&mut host);
        prop_assert_eq!(nav.active_index(), interior);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Boundaries
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn boundaries_are_idempotent(count in 1u64..40, presses in 1usize..10) {
        let last = count as usize - 1;
        let mut nav = controller(count);
        let mut host = CountingHost::default();

        nav.scroll_to(last, &mut host);
        let issued = host.requests.len();
        for _ in 0..presses {
            nav.go_next(&mut host);
        }
        prop_assert_eq!(nav.active_index(), last);
        prop_assert_eq!(host.requests.len(), issued);

        nav.scroll_to(0, &mut host);
        let issued = host.requests.len();
        for _ in 0..presses {
            nav.go_prev(&mut host);
        }
        prop_assert_eq!(nav.active_index(), 0);
        prop_assert_eq!(host.requests.len(), issued + presses);
        prop_assert!(host.requests[issued..].iter().all(|r| r.index == 0));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Observer authority
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn entered_report_sets_active(count in 1u64..40, pending in 0usize..40, seen in any::<u64>()) {
        let seen = seen % count;
        let mut nav = controller(count);
        let mut host = CountingHost::default();
        nav.scroll_to(pending, &mut host);
        ViewportObserver::apply_batch(&batch(&[(seen, true)]), &mut nav);
        prop_assert_eq!(nav.active_index(), seen as usize);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Enter-once
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn entered_flags_flip_once((count, ops) in scenario()) {
        let mut nav = controller(count);
        let mut reported = HashSet::new();
        let mut entered_before = vec![false; count as usize];
        for op in &ops {
            if let Op::Report(entries) = op {
                let report = ViewportObserver::apply_batch(&batch(entries), &mut nav);
                for index in report.newly_entered {
                    prop_assert!(reported.insert(index), "position {} reported twice", index);
                }
            }
            for (i, section) in nav.registry().iter().enumerate() {
                prop_assert!(section.is_entered() || !entered_before[i], "flag {} reset", i);
                entered_before[i] = section.is_entered();
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Registration idempotence
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn duplicate_registration_keeps_count_and_order(
        handles in prop::collection::vec(0u64..30, 0..60),
        again in prop::collection::vec(0u64..30, 0..20),
    ) {
        let mut registry = SectionRegistry::from_handles(handles.iter().copied());
        let mut seen = HashSet::new();
        let expected: Vec<SectionId> = handles
            .iter()
            .filter(|h| seen.insert(**h))
            .map(|&h| SectionId::new(h))
            .collect();
        prop_assert_eq!(registry.ids(), expected.clone());

        for h in again.iter().filter(|h| handles.contains(h)) {
            let position = registry.register(SectionId::new(*h)).index();
            prop_assert_eq!(registry.position_of(SectionId::new(*h)), Some(position));
        }
        prop_assert_eq!(registry.ids(), expected);
    }
}
