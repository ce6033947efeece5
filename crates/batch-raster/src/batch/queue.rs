use super::{DrawCall, DrawRecord, PrimitiveKind};

/// Pending draw calls, one queue per [`PrimitiveKind`].
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps allocated capacity, so steady-state frames do not reallocate
#[derive(Debug, Default)]
pub struct DrawQueues {
    queues: [Vec<DrawCall>; PrimitiveKind::COUNT],
}

impl DrawQueues {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an already-normalised call to the queue of `kind`.
    ///
    /// Shape helpers (`push_line`, `push_triangle`, ...) normalise and pick the
    /// kind; prefer those.
    #[inline]
    pub fn push(&mut self, kind: PrimitiveKind, call: DrawCall) {
        debug_assert!(
            matches!(
                (kind, &call),
                (PrimitiveKind::LineStroke, DrawCall::Line(_))
                    | (PrimitiveKind::TriangleStroke | PrimitiveKind::TriangleFill, DrawCall::Triangle(_))
                    | (PrimitiveKind::RectangleStroke | PrimitiveKind::RectangleFill, DrawCall::Rectangle(_))
                    | (PrimitiveKind::CircleStroke | PrimitiveKind::CircleFill, DrawCall::Circle(_))
            ),
            "draw call {call:?} does not belong to queue {kind}"
        );
        self.queues[kind.index()].push(call);
    }

    /// Returns the pending calls of `kind` in insertion order.
    #[inline]
    pub fn pending(&self, kind: PrimitiveKind) -> &[DrawCall] {
        &self.queues[kind.index()]
    }

    /// Encodes the pending calls of `kind` into device records.
    pub fn records(&self, kind: PrimitiveKind) -> Vec<DrawRecord> {
        self.pending(kind).iter().map(DrawCall::to_record).collect()
    }

    #[inline]
    pub fn len(&self, kind: PrimitiveKind) -> usize {
        self.queues[kind.index()].len()
    }

    /// Total number of pending calls across all kinds.
    pub fn total(&self) -> usize {
        self.queues.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(Vec::is_empty)
    }

    /// Drops the pending calls of one kind. Keeps capacity.
    #[inline]
    pub fn clear(&mut self, kind: PrimitiveKind) {
        self.queues[kind.index()].clear();
    }

    /// Drops every pending call. Keeps capacity.
    pub fn clear_all(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Mode;

    #[test]
    fn pushes_land_in_their_kind() {
        let mut q = DrawQueues::new();
        q.push_line(0, 0, 5, 5, 1);
        q.push_rectangle(Mode::Fill, 0, 0, 2, 2, 2);
        q.push_rectangle(Mode::Fill, 1, 1, 3, 3, 3);
        q.push_circle(Mode::Stroke, 4, 4, 2, 4);

        assert_eq!(q.len(PrimitiveKind::LineStroke), 1);
        assert_eq!(q.len(PrimitiveKind::RectangleFill), 2);
        assert_eq!(q.len(PrimitiveKind::RectangleStroke), 0);
        assert_eq!(q.len(PrimitiveKind::CircleStroke), 1);
        assert_eq!(q.total(), 4);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut q = DrawQueues::new();
        q.push_circle(Mode::Fill, 0, 0, 1, 10);
        q.push_circle(Mode::Fill, 0, 0, 1, 20);
        let colors: Vec<_> = q
            .pending(PrimitiveKind::CircleFill)
            .iter()
            .map(DrawCall::color)
            .collect();
        assert_eq!(colors, vec![10, 20]);
    }

    #[test]
    fn clear_only_touches_one_kind() {
        let mut q = DrawQueues::new();
        q.push_line(0, 0, 1, 1, 1);
        q.push_circle(Mode::Fill, 0, 0, 1, 1);
        q.clear(PrimitiveKind::LineStroke);
        assert_eq!(q.len(PrimitiveKind::LineStroke), 0);
        assert_eq!(q.len(PrimitiveKind::CircleFill), 1);
        q.clear_all();
        assert!(q.is_empty());
    }

    #[test]
    fn records_match_pending_calls() {
        let mut q = DrawQueues::new();
        q.push_rectangle(Mode::Stroke, 9, 1, 2, 8, 0xFF);
        let records = q.records(PrimitiveKind::RectangleStroke);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].coords, [2, 8, 9, 1, 0, 0]);
    }
}
