//! Polyline route followed by every enemy.

use nova_defence_core::{
    geometry::{angle_to_target, distance_2d, lerp_vec3},
    Vec3,
};

/// Result of walking an enemy forward along the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathAdvance {
    /// The walker is still on the path.
    OnPath {
        /// Segment the walker ended in.
        index: usize,
        /// Fraction of that segment already walked.
        progress: f32,
    },
    /// The walker overflowed the final segment.
    ReachedEnd,
}

/// Ordered waypoints with segment lengths precomputed once per route.
///
/// Lengths are measured on the ground plane. Degenerate routes are tolerated:
/// an empty path resolves every query to the origin and a single point to
/// that point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathModel {
    points: Vec<Vec3>,
    segment_lengths: Vec<f32>,
    segment_starts: Vec<f32>,
    total_length: f32,
}

impl PathModel {
    /// Builds a path through the provided waypoints.
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        let mut path = Self::default();
        path.set_path(points);
        path
    }

    /// Replaces the route and recomputes the cumulative lengths.
    pub fn set_path(&mut self, points: Vec<Vec3>) {
        self.segment_lengths = points
            .windows(2)
            .map(|pair| distance_2d(pair[0], pair[1]))
            .collect();
        self.segment_starts = Vec::with_capacity(self.segment_lengths.len());
        let mut cumulative = 0.0;
        for length in &self.segment_lengths {
            self.segment_starts.push(cumulative);
            cumulative += length;
        }
        self.total_length = cumulative;
        self.points = points;
    }

    /// Waypoints of the route.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of segments between consecutive waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Ground-plane length of a segment.
    #[must_use]
    pub fn segment_length(&self, index: usize) -> Option<f32> {
        self.segment_lengths.get(index).copied()
    }

    /// Ground-plane length of the whole route.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// First waypoint, or the origin for an empty path.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.points.first().copied().unwrap_or(Vec3::ZERO)
    }

    /// Last waypoint, or the origin for an empty path.
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Maps global progress in `[0, 1]` to a world point.
    #[must_use]
    pub fn position_at_progress(&self, progress: f32) -> Vec3 {
        if self.points.len() < 2 || progress <= 0.0 || self.total_length <= 0.0 {
            return self.start();
        }
        if progress >= 1.0 {
            return self.end();
        }

        let target = progress * self.total_length;
        for (index, (&start, &length)) in self
            .segment_starts
            .iter()
            .zip(&self.segment_lengths)
            .enumerate()
        {
            if length > 0.0 && target <= start + length {
                return self.position_on_segment(index, (target - start) / length);
            }
        }
        self.end()
    }

    /// Converts a `(segment, fraction)` encoding into global progress.
    #[must_use]
    pub fn progress_for_index(&self, index: usize, fraction: f32) -> f32 {
        if self.total_length <= 0.0 {
            return 0.0;
        }
        let Some(&length) = self.segment_lengths.get(index) else {
            return 1.0;
        };
        let walked = self.segment_starts[index] + length * fraction.clamp(0.0, 1.0);
        walked / self.total_length
    }

    /// World point at `fraction` of a segment, clamped to the route.
    #[must_use]
    pub fn position_on_segment(&self, index: usize, fraction: f32) -> Vec3 {
        match self.points.len() {
            0 => Vec3::ZERO,
            1 => self.points[0],
            count => {
                let index = index.min(count - 2);
                lerp_vec3(
                    self.points[index],
                    self.points[index + 1],
                    fraction.clamp(0.0, 1.0),
                )
            }
        }
    }

    /// Facing angle along a segment's local tangent.
    #[must_use]
    pub fn segment_heading(&self, index: usize) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let index = index.min(self.points.len() - 2);
        angle_to_target(self.points[index], self.points[index + 1])
    }

    /// Walks `distance` forward from `(index, progress)`, carrying across
    /// segment boundaries.
    #[must_use]
    pub fn advance(&self, index: usize, progress: f32, distance: f32) -> PathAdvance {
        let mut index = index;
        let mut progress = progress;
        let mut remaining = distance.max(0.0);

        loop {
            let Some(length) = self.segment_length(index) else {
                return PathAdvance::ReachedEnd;
            };
            let available = (1.0 - progress).max(0.0) * length;
            if length > 0.0 && remaining < available {
                return PathAdvance::OnPath {
                    index,
                    progress: progress + remaining / length,
                };
            }
            remaining -= available;
            index += 1;
            progress = 0.0;
        }
    }

    /// Walks `distance` backward from `(index, progress)`, stopping at the
    /// start of the route.
    #[must_use]
    pub fn retreat(&self, index: usize, progress: f32, distance: f32) -> (usize, f32) {
        if self.segment_count() == 0 {
            return (0, 0.0);
        }
        let mut index = index.min(self.segment_count() - 1);
        let mut progress = progress.clamp(0.0, 1.0);
        let mut remaining = distance.max(0.0);

        loop {
            let length = self.segment_lengths[index];
            let available = progress * length;
            if length > 0.0 && remaining <= available {
                return (index, progress - remaining / length);
            }
            remaining -= available;
            if index == 0 {
                return (0, 0.0);
            }
            index -= 1;
            progress = 1.0;
        }
    }
}
