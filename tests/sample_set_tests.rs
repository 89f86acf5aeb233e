//! Sample Set Tests
//!
//! Tests for:
//! - Jittered offset ranges per component, for many seeds
//! - Seed determinism
//! - Canonical rotation encoding and decoding
//! - Axis grouping (contiguous / interleaved) and the dispatch ordering

use glam::{Vec2, Vec4};

use myth_dao::resources::sample_set::*;

const EPSILON: f32 = 1e-6;

fn approx_vec2(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Offsets
// ============================================================================

#[test]
fn offsets_stay_in_unit_range_for_any_seed() {
    let generator = SampleSetGenerator::default();
    for seed in 0..64 {
        let set = generator.generate(seed);
        for v in set.offsets.vectors() {
            assert!(
                v.cmpge(Vec4::ZERO).all() && v.cmple(Vec4::ONE).all(),
                "seed {seed}: offset {v:?} outside [0, 1]"
            );
        }
    }
}

#[test]
fn offsets_follow_anchor_jitter_bounds() {
    let set = SampleSetGenerator::default().generate(7);
    for v in set.offsets.vectors() {
        assert!((0.25..=0.375).contains(&v.x), "x = {}", v.x);
        assert!((0.375..=0.625).contains(&v.y), "y = {}", v.y);
        assert!((0.625..=0.875).contains(&v.z), "z = {}", v.z);
        assert!((0.875..=1.0).contains(&v.w), "w = {}", v.w);
    }
}

#[test]
fn same_seed_reproduces_the_set() {
    let generator = SampleSetGenerator::new(SampleGrouping::Contiguous);
    assert_eq!(generator.generate(42), generator.generate(42));
}

#[test]
fn different_seeds_jitter_differently() {
    let generator = SampleSetGenerator::default();
    assert_ne!(
        generator.generate(1).offsets,
        generator.generate(2).offsets
    );
}

#[test]
fn each_axis_takes_eight_distances() {
    let set = SampleSetGenerator::default().generate(3);
    for slice in 0..SLICE_COUNT {
        for axis in Axis::ALL {
            let [a, b] = set.axis_offsets(slice, axis);
            let distances = set.axis_distances(slice, axis);
            assert_eq!(distances.len(), SAMPLES_PER_AXIS);
            assert_eq!(distances[..4], a.to_array());
            assert_eq!(distances[4..], b.to_array());
        }
    }
}

// ============================================================================
// Rotations
// ============================================================================

#[test]
fn canonical_rotations_round_trip_through_encoding() {
    for slice in 0..SLICE_COUNT {
        let matrix = RotationVector::canonical(slice).matrix();
        assert_eq!(unnormalize_vector(normalize_vector(matrix)), matrix);
    }
}

#[test]
fn encoded_rotations_are_unit_range() {
    let set = SampleSetGenerator::default().generate(0);
    for encoded in set.encoded_rotations() {
        assert!(encoded.cmpge(Vec4::ZERO).all() && encoded.cmple(Vec4::ONE).all());
    }
}

#[test]
fn rotations_are_quarter_turns_in_slice_order() {
    let set = SampleSetGenerator::default().generate(0);
    for (slice, rotation) in set.rotations.iter().enumerate() {
        assert_eq!(rotation.quarter_turn(), Some(slice));
    }
}

#[test]
fn quarter_turns_rotate_the_x_axis() {
    let expected = [Vec2::X, Vec2::Y, -Vec2::X, -Vec2::Y];
    for (slice, want) in expected.into_iter().enumerate() {
        let got = RotationVector::canonical(slice).rotate(Vec2::X);
        assert!(approx_vec2(got, want), "slice {slice}: {got:?} != {want:?}");
    }
}

#[test]
fn non_canonical_rotation_has_no_quarter_turn() {
    let angle = 22.5f32.to_radians();
    let (sin, cos) = angle.sin_cos();
    let rotation = RotationVector::from_matrix(Vec4::new(cos, -sin, sin, cos));
    assert_eq!(rotation.quarter_turn(), None);
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn contiguous_grouping_splits_each_group_in_halves() {
    let g = SampleGrouping::Contiguous;
    assert_eq!(g.axis_indices(2, Axis::X), [8, 9]);
    assert_eq!(g.axis_indices(2, Axis::Y), [10, 11]);
}

#[test]
fn interleaved_grouping_alternates_vectors() {
    let g = SampleGrouping::Interleaved;
    assert_eq!(g.axis_indices(1, Axis::X), [4, 6]);
    assert_eq!(g.axis_indices(1, Axis::Y), [5, 7]);
}

#[test]
fn every_vector_is_used_exactly_once() {
    for grouping in [SampleGrouping::Contiguous, SampleGrouping::Interleaved] {
        let mut used = [0u32; SAMPLE_VECTOR_COUNT];
        for slice in 0..SLICE_COUNT {
            for axis in Axis::ALL {
                for i in grouping.axis_indices(slice, axis) {
                    used[i] += 1;
                }
            }
        }
        assert!(used.iter().all(|&n| n == 1), "{grouping:?}: {used:?}");
    }
}

#[test]
fn dispatch_order_is_slice_axis_vector() {
    let set = SampleSetGenerator::new(SampleGrouping::Interleaved).generate(11);
    let ordered = set.dispatch_ordered();
    for slice in 0..SLICE_COUNT {
        for axis in Axis::ALL {
            for (j, v) in set.axis_offsets(slice, axis).into_iter().enumerate() {
                assert_eq!(ordered[slice * 4 + axis.index() * 2 + j], v);
            }
        }
    }
}
