//! Resolve source lines to vertical offsets after a frame is drawn.

use std::collections::{BTreeMap, HashMap};

/// Where anchors ended up in the last drawn frame.
///
/// Rows are in screen coordinates; the resolver turns them into offsets
/// relative to the top of the document content.
pub trait AnchorLookup {
    /// Screen row of the anchor for `line`, if it is mounted.
    fn anchor_top(&self, line: u32) -> Option<i64>;
    /// Screen row of the document container's top edge.
    fn container_top(&self) -> i64;
    /// Rows the container is scrolled by.
    fn scroll_top(&self) -> i64;
}

/// Offsets of each mounted line relative to the document content top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOffsets(BTreeMap<u32, i64>);

impl LineOffsets {
    #[must_use]
    pub fn get(&self, line: u32) -> Option<i64> {
        self.0.get(&line).copied()
    }

    /// Offset of `line`, or 0 when its anchor is missing.
    #[must_use]
    pub fn offset_or_zero(&self, line: u32) -> i64 {
        self.get(line).unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.0.iter().map(|(line, offset)| (*line, *offset))
    }
}

impl FromIterator<(u32, i64)> for LineOffsets {
    fn from_iter<I: IntoIterator<Item = (u32, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read back the offset of every line in `1..=line_count` that has an anchor.
#[must_use]
pub fn resolve_line_offsets(frame: &impl AnchorLookup, line_count: u32) -> LineOffsets {
    let container = frame.container_top();
    let scroll = frame.scroll_top();
    (1..=line_count)
        .filter_map(|line| {
            frame
                .anchor_top(line)
                .map(|top| (line, top - container + scroll))
        })
        .collect()
}

/// Snapshot recorded by the view while drawing the document.
///
/// Anchors scrolled off screen are still recorded (with rows outside the
/// viewport), so offsets stay stable while scrolling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountedFrame {
    pub container_top: i64,
    pub scroll_top: i64,
    pub anchors: BTreeMap<u32, i64>,
    /// Drawn height of each sidebar box, keyed by box identity.
    pub box_heights: HashMap<crate::packer::BoxKey, u32>,
}

impl MountedFrame {
    pub fn clear(&mut self) {
        self.anchors.clear();
        self.box_heights.clear();
    }
}

impl AnchorLookup for MountedFrame {
    fn anchor_top(&self, line: u32) -> Option<i64> {
        self.anchors.get(&line).copied()
    }

    fn container_top(&self) -> i64 {
        self.container_top
    }

    fn scroll_top(&self) -> i64 {
        self.scroll_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_relative_to_container_and_scroll() {
        let frame = MountedFrame {
            container_top: 3,
            scroll_top: 10,
            anchors: BTreeMap::from([(1, -7), (2, 0), (5, 4)]),
            box_heights: HashMap::new(),
        };
        let offsets = resolve_line_offsets(&frame, 5);
        assert_eq!(offsets.get(1), Some(0));
        assert_eq!(offsets.get(2), Some(7));
        assert_eq!(offsets.get(5), Some(11));
        assert_eq!(offsets.len(), 3);
    }

    #[test]
    fn missing_anchor_is_omitted_and_degrades_to_zero() {
        let frame = MountedFrame::default();
        let offsets = resolve_line_offsets(&frame, 10);
        assert!(offsets.is_empty());
        assert_eq!(offsets.get(4), None);
        assert_eq!(offsets.offset_or_zero(4), 0);
    }

    #[test]
    fn anchors_beyond_line_count_are_ignored() {
        let frame = MountedFrame {
            anchors: BTreeMap::from([(1, 0), (9, 8)]),
            ..MountedFrame::default()
        };
        let offsets = resolve_line_offsets(&frame, 3);
        assert_eq!(offsets.iter().collect::<Vec<_>>(), vec![(1, 0)]);
    }
}
