use std::collections::VecDeque;

use super::snapshot::HistoryPoint;

/// Most slots reserved up front; larger windows grow on demand.
const PREALLOCATED_POINTS: usize = 1024;

/// Fixed-capacity sliding window of history points, oldest first.
///
/// Pushing into a full window drops the oldest point, so the length never
/// exceeds `capacity` and the newest point is always last.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl HistoryWindow {
    /// `capacity` is clamped to at least one point.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity.min(PREALLOCATED_POINTS)),
            capacity,
        }
    }

    /// Seed a window from an existing series. Only the newest `capacity`
    /// points are kept.
    pub fn from_points(capacity: usize, points: impl IntoIterator<Item = HistoryPoint>) -> Self {
        let mut window = Self::new(capacity);
        for point in points {
            window.push(point);
        }
        window
    }

    pub fn push(&mut self, point: HistoryPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }
}
