//! Deinterleave & Assemble Tests
//!
//! Tests for:
//! - Slice layout of the deinterleaved volume
//! - Lossless deinterleave → assemble round trip
//! - Resolution validation (empty, odd, mismatched buffers)
//! - Normal decoding (unorm encoding, world-space normals)

use glam::{Mat4, Vec3};

use myth_dao::compute::{RawObscuranceVolume, assemble, deinterleave, slice_to_full};
use myth_dao::errors::DaoError;
use myth_dao::resources::gbuffer::{GBufferLayout, NormalEncoding, NormalSpace};
use myth_dao::resources::texture::{DepthTexture, NormalTexture, TextureArray};
use myth_dao::CameraParams;

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn camera(width: u32, height: u32) -> CameraParams {
    CameraParams::perspective(60f32.to_radians(), width, height, 0.1, 100.0)
}

/// Depth with a distinct value at every pixel.
fn ramp_depth(width: u32, height: u32) -> DepthTexture {
    DepthTexture::from_fn(width, height, |x, y| 1.0 + x as f32 * 0.25 + y as f32 * 7.0)
}

fn facing_normals(width: u32, height: u32) -> NormalTexture {
    NormalTexture::new(width, height, Vec3::Z)
}

// ============================================================================
// Slice layout
// ============================================================================

#[test]
fn volume_is_half_resolution() {
    let volume = deinterleave(
        &ramp_depth(12, 8),
        &facing_normals(12, 8),
        &camera(12, 8),
        &GBufferLayout::default(),
    )
    .unwrap();
    assert_eq!((volume.width(), volume.height()), (6, 4));
}

#[test]
fn each_layer_samples_its_block_position() {
    let depth = ramp_depth(8, 6);
    let volume = deinterleave(
        &depth,
        &facing_normals(8, 6),
        &camera(8, 6),
        &GBufferLayout::default(),
    )
    .unwrap();

    for slice in 0..4 {
        let layer = volume.layer(slice);
        for y in 0..3 {
            for x in 0..4 {
                let (fx, fy) = slice_to_full(slice, x, y);
                let texel = layer.get(x, y);
                assert_eq!(texel.w, depth.get(fx, fy), "slice {slice} at ({x}, {y})");
                assert_eq!(texel.truncate(), Vec3::Z);
            }
        }
    }
}

#[test]
fn reassembling_depth_layers_reproduces_the_buffer() {
    let depth = ramp_depth(20, 14);
    let volume = deinterleave(
        &depth,
        &facing_normals(20, 14),
        &camera(20, 14),
        &GBufferLayout::default(),
    )
    .unwrap();

    let mut layers = TextureArray::new(volume.width(), volume.height(), 4, 0.0);
    for slice in 0..4 {
        *layers.layer_mut(slice) = volume.depth_layer(slice);
    }
    let reassembled = assemble(RawObscuranceVolume::from_layers(&layers));

    assert_eq!(reassembled, depth);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn odd_resolution_is_rejected() {
    let result = deinterleave(
        &ramp_depth(9, 8),
        &facing_normals(9, 8),
        &camera(9, 8),
        &GBufferLayout::default(),
    );
    assert_eq!(
        result.unwrap_err(),
        DaoError::OddResolution {
            width: 9,
            height: 8
        }
    );
}

#[test]
fn empty_resolution_is_rejected() {
    let result = deinterleave(
        &ramp_depth(0, 8),
        &facing_normals(0, 8),
        &camera(0, 8),
        &GBufferLayout::default(),
    );
    assert!(matches!(
        result,
        Err(DaoError::EmptyResolution { width: 0, .. })
    ));
}

#[test]
fn mismatched_normal_buffer_is_rejected() {
    let result = deinterleave(
        &ramp_depth(8, 8),
        &facing_normals(8, 6),
        &camera(8, 8),
        &GBufferLayout::default(),
    );
    assert!(matches!(
        result,
        Err(DaoError::ResolutionMismatch {
            what: "normal buffer",
            ..
        })
    ));
}

#[test]
fn mismatched_camera_target_is_rejected() {
    let result = deinterleave(
        &ramp_depth(8, 8),
        &facing_normals(8, 8),
        &camera(16, 16),
        &GBufferLayout::default(),
    );
    let err = result.unwrap_err();
    assert_eq!(
        err,
        DaoError::ResolutionMismatch {
            what: "camera target",
            expected: (8, 8),
            actual: (16, 16),
        }
    );
    assert!(err.to_string().contains("camera target"));
}

// ============================================================================
// Normal decoding
// ============================================================================

#[test]
fn unorm_normals_are_decoded() {
    let layout = GBufferLayout {
        normal_space: NormalSpace::View,
        normal_encoding: NormalEncoding::Unorm,
    };
    let normals = NormalTexture::new(4, 4, Vec3::new(0.5, 0.5, 1.0));
    let volume = deinterleave(&ramp_depth(4, 4), &normals, &camera(4, 4), &layout).unwrap();

    assert!(approx_vec3(volume.layer(3).get(1, 1).truncate(), Vec3::Z));
}

#[test]
fn world_space_normals_follow_the_view_rotation() {
    let layout = GBufferLayout {
        normal_space: NormalSpace::World,
        normal_encoding: NormalEncoding::Signed,
    };
    let cam = camera(4, 4).with_view(Mat4::from_rotation_y(90f32.to_radians()));
    let normals = NormalTexture::new(4, 4, Vec3::X);
    let volume = deinterleave(&ramp_depth(4, 4), &normals, &cam, &layout).unwrap();

    assert!(approx_vec3(
        volume.layer(0).get(0, 0).truncate(),
        Vec3::new(0.0, 0.0, -1.0)
    ));
}

#[test]
fn zero_normals_stay_zero() {
    let layout = GBufferLayout {
        normal_space: NormalSpace::World,
        normal_encoding: NormalEncoding::Signed,
    };
    let cam = camera(4, 4).with_view(Mat4::from_rotation_x(0.3));
    let normals = NormalTexture::new(4, 4, Vec3::ZERO);
    let volume = deinterleave(&ramp_depth(4, 4), &normals, &cam, &layout).unwrap();

    assert_eq!(volume.layer(2).get(1, 0).truncate(), Vec3::ZERO);
}
