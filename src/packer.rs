//! Non-overlapping vertical placement of sidebar boxes.

use std::collections::HashMap;

use crate::position::LineOffsets;

/// Identity of a sidebar box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoxKey {
    /// The thread anchored to a line.
    Thread(u32),
    /// The active new-comment composer.
    Composer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementBox {
    pub key: BoxKey,
    /// Source line the box sorts by (the composer uses its target line).
    pub line: u32,
    pub base_offset: i64,
    /// `None` until the box has been drawn once.
    pub measured_height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedBox {
    pub key: BoxKey,
    pub line: u32,
    pub base_offset: i64,
    pub measured_height: Option<u32>,
    pub final_top: i64,
}

/// Placed boxes in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    boxes: Vec<PlacedBox>,
}

impl Placements {
    #[must_use]
    pub fn top_of(&self, key: BoxKey) -> Option<i64> {
        self.boxes.iter().find(|b| b.key == key).map(|b| b.final_top)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedBox> {
        self.boxes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Placements {
    type Item = &'a PlacedBox;
    type IntoIter = std::slice::Iter<'a, PlacedBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

/// Single top-to-bottom sweep.
///
/// Boxes are stably sorted by line; on a shared line the thread sorts before
/// the composer. Each box is placed at `max(base_offset, last_bottom)`.
/// Unknown heights count as 0 until the box is drawn.
#[must_use]
pub fn pack(boxes: &[PlacementBox], gap: u32) -> Placements {
    let mut sorted: Vec<&PlacementBox> = boxes.iter().collect();
    sorted.sort_by_key(|b| (b.line, matches!(b.key, BoxKey::Composer)));

    let mut last_bottom = 0i64;
    let boxes = sorted
        .into_iter()
        .map(|b| {
            let final_top = b.base_offset.max(last_bottom);
            last_bottom = final_top + i64::from(b.measured_height.unwrap_or(0)) + i64::from(gap);
            PlacedBox {
                key: b.key,
                line: b.line,
                base_offset: b.base_offset,
                measured_height: b.measured_height,
                final_top,
            }
        })
        .collect();
    Placements { boxes }
}

/// Assemble the boxes for one layout pass.
#[must_use]
pub fn build_boxes(
    thread_lines: impl IntoIterator<Item = u32>,
    composer_line: Option<u32>,
    offsets: &LineOffsets,
    heights: &HashMap<BoxKey, u32>,
) -> Vec<PlacementBox> {
    let mut boxes: Vec<PlacementBox> = thread_lines
        .into_iter()
        .map(|line| {
            let key = BoxKey::Thread(line);
            PlacementBox {
                key,
                line,
                base_offset: offsets.offset_or_zero(line),
                measured_height: heights.get(&key).copied(),
            }
        })
        .collect();
    if let Some(line) = composer_line {
        boxes.push(PlacementBox {
            key: BoxKey::Composer,
            line,
            base_offset: offsets.offset_or_zero(line),
            measured_height: heights.get(&BoxKey::Composer).copied(),
        });
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread(line: u32, base: i64, height: Option<u32>) -> PlacementBox {
        PlacementBox {
            key: BoxKey::Thread(line),
            line,
            base_offset: base,
            measured_height: height,
        }
    }

    #[test]
    fn boxes_without_conflict_keep_their_base() {
        let placed = pack(&[thread(1, 0, Some(3)), thread(10, 20, Some(3))], 1);
        assert_eq!(placed.top_of(BoxKey::Thread(1)), Some(0));
        assert_eq!(placed.top_of(BoxKey::Thread(10)), Some(20));
    }

    #[test]
    fn overlapping_boxes_are_pushed_down() {
        let placed = pack(
            &[thread(3, 2, Some(5)), thread(1, 0, Some(4)), thread(2, 1, Some(2))],
            1,
        );
        let tops: Vec<_> = placed.iter().map(|b| (b.line, b.final_top)).collect();
        assert_eq!(tops, vec![(1, 0), (2, 5), (3, 8)]);
    }

    #[test]
    fn non_overlap_and_order_hold() {
        let boxes: Vec<_> = (1..=20)
            .map(|i| thread(i, i64::from(i) * 2, Some(i % 4 + 1)))
            .collect();
        let gap = 1;
        let placed: Vec<_> = pack(&boxes, gap).iter().copied().collect();
        for pair in placed.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.line < b.line);
            assert!(b.final_top >= a.final_top);
            let a_bottom = a.final_top + i64::from(a.measured_height.unwrap_or(0)) + i64::from(gap);
            if b.base_offset < a_bottom {
                assert!(b.final_top >= a_bottom);
            } else {
                assert_eq!(b.final_top, b.base_offset);
            }
        }
    }

    #[test]
    fn composer_sorts_after_thread_on_same_line() {
        let composer = PlacementBox {
            key: BoxKey::Composer,
            line: 4,
            base_offset: 6,
            measured_height: Some(5),
        };
        let placed = pack(&[composer, thread(4, 6, Some(3))], 1);
        assert_eq!(placed.top_of(BoxKey::Thread(4)), Some(6));
        assert_eq!(placed.top_of(BoxKey::Composer), Some(10));
    }

    #[test]
    fn unknown_height_counts_as_zero_until_measured() {
        let first = pack(&[thread(1, 0, None), thread(2, 0, Some(2))], 1);
        assert_eq!(first.top_of(BoxKey::Thread(2)), Some(1));
        let second = pack(&[thread(1, 0, Some(4)), thread(2, 0, Some(2))], 1);
        assert_eq!(second.top_of(BoxKey::Thread(2)), Some(5));
        assert_ne!(first, second);
    }

    #[test]
    fn build_boxes_uses_offsets_and_heights() {
        let offsets: LineOffsets = [(4, 10), (7, 25)].into_iter().collect();
        let heights = HashMap::from([(BoxKey::Thread(4), 3)]);
        let boxes = build_boxes([4, 9], Some(7), &offsets, &heights);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0].measured_height, Some(3));
        assert_eq!(boxes[1].base_offset, 0);
        assert_eq!(boxes[2].key, BoxKey::Composer);
        assert_eq!(boxes[2].base_offset, 25);
        assert_eq!(boxes[2].measured_height, None);
        assert!(pack(&boxes, 1).top_of(BoxKey::Composer).is_some());
    }
}
