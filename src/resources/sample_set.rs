//! Sample Set Generation
//!
//! Produces the constant data consumed by the directional evaluation stage:
//!
//! - a [`SampleOffsetSet`] of 16 four-component vectors, each component a
//!   normalized sample distance along one screen axis, and
//! - four [`RotationVector`]s, one per deinterleaved slice.
//!
//! Both are generated **once** per pipeline instance and never regenerated per
//! frame. Every component of every offset vector is obtained by jittering one
//! of four anchor distances and clamping to `[0, 1]`:
//!
//! | Component | Anchor | Jitter range       |
//! |-----------|--------|--------------------|
//! | x         | 0.25   | `[0, +0.125]`      |
//! | y         | 0.50   | `[-0.125, +0.125]` |
//! | z         | 0.75   | `[-0.125, +0.125]` |
//! | w         | 1.00   | `[-0.125, 0]`      |
//!
//! The 16 vectors are split into 4 groups of 4, one group per slice. Which two
//! vectors of a group feed which axis is controlled by [`SampleGrouping`].

use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Number of deinterleaved slices (one per position in a 2×2 pixel block).
pub const SLICE_COUNT: usize = 4;

/// Number of sample-offset vectors in a set.
pub const SAMPLE_VECTOR_COUNT: usize = 16;

/// Offset vectors assigned to one axis of one slice.
pub const VECTORS_PER_AXIS: usize = 2;

/// Sample distances taken along one axis of one slice.
pub const SAMPLES_PER_AXIS: usize = VECTORS_PER_AXIS * 4;

/// Anchor distances, one per vector component.
pub const SAMPLE_ANCHORS: [f32; 4] = [0.25, 0.50, 0.75, 1.00];

/// Maximum jitter applied around an anchor.
pub const SAMPLE_JITTER: f32 = 0.125;

// ============================================================================
// Axis
// ============================================================================

/// Screen axis evaluated by one directional pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Plane index of this axis inside a raw obscurance layer.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// Un-rotated unit direction of the axis in slice pixel space.
    #[inline]
    #[must_use]
    pub const fn direction(self) -> Vec2 {
        match self {
            Self::X => Vec2::X,
            Self::Y => Vec2::Y,
        }
    }
}

// ============================================================================
// Unit-range encoding
// ============================================================================

/// Remaps every component from `[-1, 1]` to `[0, 1]` via `(v + 1) / 2`.
#[inline]
#[must_use]
pub fn normalize_vector(v: Vec4) -> Vec4 {
    (v + Vec4::ONE) * 0.5
}

/// Inverse of [`normalize_vector`]: `2v - 1`.
#[inline]
#[must_use]
pub fn unnormalize_vector(v: Vec4) -> Vec4 {
    v * 2.0 - Vec4::ONE
}

// ============================================================================
// RotationVector
// ============================================================================

/// A 2×2 rotation `(cosθ, -sinθ, sinθ, cosθ)` stored in unit-range encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationVector(Vec4);

impl RotationVector {
    /// Rotation assigned to `slice`: θ = `slice` × 90°.
    ///
    /// Quarter turns are tabulated so the encoded components are exact.
    #[must_use]
    pub fn canonical(slice: usize) -> Self {
        let (cos, sin) = match slice % SLICE_COUNT {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        Self::from_matrix(Vec4::new(cos, -sin, sin, cos))
    }

    /// Encodes a raw `(m00, m01, m10, m11)` matrix.
    #[must_use]
    pub fn from_matrix(matrix: Vec4) -> Self {
        Self(normalize_vector(matrix))
    }

    /// The unit-range encoded vector, as uploaded to the GPU.
    #[inline]
    #[must_use]
    pub const fn encoded(self) -> Vec4 {
        self.0
    }

    /// The decoded `(m00, m01, m10, m11)` matrix.
    #[inline]
    #[must_use]
    pub fn matrix(self) -> Vec4 {
        unnormalize_vector(self.0)
    }

    /// Rotates `v` by the decoded matrix.
    #[inline]
    #[must_use]
    pub fn rotate(self, v: Vec2) -> Vec2 {
        let m = self.matrix();
        Vec2::new(m.x * v.x + m.y * v.y, m.z * v.x + m.w * v.y)
    }

    /// Returns the quarter turn (0..4) this vector encodes, if any.
    #[must_use]
    pub fn quarter_turn(self) -> Option<usize> {
        (0..SLICE_COUNT).find(|&q| {
            (Self::canonical(q).matrix() - self.matrix())
                .abs()
                .max_element()
                < 1e-4
        })
    }
}

// ============================================================================
// SampleOffsetSet & grouping
// ============================================================================

/// The 16 jittered sample-offset vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOffsetSet(pub(crate) [Vec4; SAMPLE_VECTOR_COUNT]);

impl SampleOffsetSet {
    #[inline]
    #[must_use]
    pub fn vectors(&self) -> &[Vec4; SAMPLE_VECTOR_COUNT] {
        &self.0
    }

    /// The 4 vectors assigned to `slice`.
    #[must_use]
    pub fn group(&self, slice: usize) -> &[Vec4] {
        let base = slice * 4;
        &self.0[base..base + 4]
    }
}

/// Which two vectors of a slice group serve which axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleGrouping {
    /// X takes vectors `4s, 4s+1`; Y takes `4s+2, 4s+3`.
    #[default]
    Contiguous,
    /// X takes vectors `4s, 4s+2`; Y takes `4s+1, 4s+3`.
    Interleaved,
}

impl SampleGrouping {
    /// Indices into the offset set for (`slice`, `axis`).
    #[must_use]
    pub const fn axis_indices(self, slice: usize, axis: Axis) -> [usize; VECTORS_PER_AXIS] {
        let base = slice * 4;
        match (self, axis) {
            (Self::Contiguous, Axis::X) => [base, base + 1],
            (Self::Contiguous, Axis::Y) => [base + 2, base + 3],
            (Self::Interleaved, Axis::X) => [base, base + 2],
            (Self::Interleaved, Axis::Y) => [base + 1, base + 3],
        }
    }
}

// ============================================================================
// SampleSet
// ============================================================================

/// Offsets and rotations for one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSet {
    pub offsets: SampleOffsetSet,
    pub rotations: [RotationVector; SLICE_COUNT],
    pub grouping: SampleGrouping,
}

impl SampleSet {
    /// The two offset vectors feeding `axis` of `slice`.
    #[must_use]
    pub fn axis_offsets(&self, slice: usize, axis: Axis) -> [Vec4; VECTORS_PER_AXIS] {
        self.grouping
            .axis_indices(slice, axis)
            .map(|i| self.offsets.0[i])
    }

    /// The 8 normalized sample distances for `axis` of `slice`.
    #[must_use]
    pub fn axis_distances(&self, slice: usize, axis: Axis) -> [f32; SAMPLES_PER_AXIS] {
        let [a, b] = self.axis_offsets(slice, axis);
        [a.x, a.y, a.z, a.w, b.x, b.y, b.z, b.w]
    }

    /// Offsets reordered as `[slice][axis][vector]`, the layout read by the
    /// evaluation kernel (`index = slice * 4 + axis * 2 + j`).
    #[must_use]
    pub fn dispatch_ordered(&self) -> [Vec4; SAMPLE_VECTOR_COUNT] {
        let mut out = [Vec4::ZERO; SAMPLE_VECTOR_COUNT];
        for slice in 0..SLICE_COUNT {
            for axis in Axis::ALL {
                for (j, v) in self.axis_offsets(slice, axis).into_iter().enumerate() {
                    out[slice * 4 + axis.index() * VECTORS_PER_AXIS + j] = v;
                }
            }
        }
        out
    }

    /// Encoded rotation vectors, in slice order.
    #[must_use]
    pub fn encoded_rotations(&self) -> [Vec4; SLICE_COUNT] {
        self.rotations.map(RotationVector::encoded)
    }
}

/// Generates [`SampleSet`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSetGenerator {
    pub grouping: SampleGrouping,
}

impl SampleSetGenerator {
    #[must_use]
    pub fn new(grouping: SampleGrouping) -> Self {
        Self { grouping }
    }

    /// Generates the offsets and rotations from `seed`.
    ///
    /// The structure (anchors, rotations) is fixed; only the jitter depends on
    /// the seed. Equal seeds reproduce the same set.
    #[must_use]
    pub fn generate(&self, seed: u64) -> SampleSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut vectors = [Vec4::ZERO; SAMPLE_VECTOR_COUNT];

        for v in &mut vectors {
            *v = Vec4::new(
                (SAMPLE_ANCHORS[0] + rng.random_range(0.0..=SAMPLE_JITTER)).clamp(0.0, 1.0),
                (SAMPLE_ANCHORS[1] + rng.random_range(-SAMPLE_JITTER..=SAMPLE_JITTER))
                    .clamp(0.0, 1.0),
                (SAMPLE_ANCHORS[2] + rng.random_range(-SAMPLE_JITTER..=SAMPLE_JITTER))
                    .clamp(0.0, 1.0),
                (SAMPLE_ANCHORS[3] + rng.random_range(-SAMPLE_JITTER..=0.0)).clamp(0.0, 1.0),
            );
        }

        SampleSet {
            offsets: SampleOffsetSet(vectors),
            rotations: std::array::from_fn(RotationVector::canonical),
            grouping: self.grouping,
        }
    }
}
