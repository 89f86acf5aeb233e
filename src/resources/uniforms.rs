//! GPU Data Struct Definitions
//!
//! A single macro, [`define_gpu_data_struct!`](crate::define_gpu_data_struct),
//! declares a `#[repr(C)]` [`bytemuck::Pod`] struct **and** generates the
//! matching WGSL struct definition. The WGSL text is injected into the compute
//! templates, so the CPU and GPU layouts are defined in exactly one place.
//!
//! Field names starting with `__` are treated as explicit padding and are
//! omitted from the generated WGSL.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

// ============================================================================
// Rust type -> WGSL type name
// ============================================================================

pub trait WgslType {
    fn wgsl_type_name() -> Cow<'static, str>;

    /// Collects the definitions this type depends on (nested structs).
    fn collect_wgsl_defs(_defs: &mut Vec<String>, _inserted: &mut HashSet<String>) {}
}

impl WgslType for f32 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "f32".into()
    }
}
impl WgslType for u32 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "u32".into()
    }
}
impl WgslType for i32 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "i32".into()
    }
}
impl WgslType for Vec2 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "vec2<f32>".into()
    }
}
impl WgslType for UVec2 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "vec2<u32>".into()
    }
}
impl WgslType for Vec3 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "vec3<f32>".into()
    }
}
impl WgslType for Vec4 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "vec4<f32>".into()
    }
}
impl WgslType for Mat4 {
    fn wgsl_type_name() -> Cow<'static, str> {
        "mat4x4<f32>".into()
    }
}

// ============================================================================
// Fixed-size arrays for uniform buffers
// ============================================================================

/// Array wrapper usable inside uniform structs (maps to `array<T, N>`).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformArray<T: Pod, const N: usize>(pub [T; N]);

// SAFETY: `[T; N]` of a `Pod` type is itself `Pod`; the wrapper is transparent.
unsafe impl<T: Pod, const N: usize> Zeroable for UniformArray<T, N> {}
unsafe impl<T: Pod, const N: usize> Pod for UniformArray<T, N> {}

impl<T: WgslType + Pod, const N: usize> WgslType for UniformArray<T, N> {
    fn wgsl_type_name() -> Cow<'static, str> {
        format!("array<{}, {}>", T::wgsl_type_name(), N).into()
    }

    fn collect_wgsl_defs(defs: &mut Vec<String>, inserted: &mut HashSet<String>) {
        T::collect_wgsl_defs(defs, inserted);
    }
}

impl<T: Default + Pod, const N: usize> Default for UniformArray<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Pod, const N: usize> Deref for UniformArray<T, N> {
    type Target = [T; N];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Pod, const N: usize> DerefMut for UniformArray<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Pod, const N: usize> From<[T; N]> for UniformArray<T, N> {
    fn from(arr: [T; N]) -> Self {
        Self(arr)
    }
}

/// A top-level GPU struct that can emit its own WGSL definition.
pub trait WgslStruct: Pod + Zeroable {
    fn wgsl_struct_def(struct_name: &str) -> String;
}

// ============================================================================
// Macro (single source of truth)
// ============================================================================

/// Declares a GPU data struct together with its WGSL definition.
///
/// ```rust,ignore
/// define_gpu_data_struct!(
///     struct BlurParams {
///         /// Kernel radius in pixels.
///         pub radius: f32 = 1.0,
///         pub(crate) __pad: UniformArray<f32, 3>,
///     }
/// );
/// ```
#[macro_export]
macro_rules! define_gpu_data_struct {
    (
        $(#[$meta:meta])* struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $vis:vis $field_name:ident : $field_type:ty $(= $default_val:expr)?
            ),* $(,)?
        }
    ) => {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
        $(#[$meta])*
        pub struct $name {
            $( $(#[$fmeta])* $vis $field_name : $field_type, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field_name: $crate::define_gpu_data_struct!(@val_or_default $field_type $(, $default_val)?), )*
                }
            }
        }

        impl $crate::resources::uniforms::WgslType for $name {
            fn wgsl_type_name() -> std::borrow::Cow<'static, str> {
                stringify!($name).into()
            }

            fn collect_wgsl_defs(defs: &mut Vec<String>, inserted: &mut std::collections::HashSet<String>) {
                $(
                    <$field_type as $crate::resources::uniforms::WgslType>::collect_wgsl_defs(defs, inserted);
                )*
                let my_name = stringify!($name);
                if !inserted.contains(my_name) {
                    defs.push($crate::define_gpu_data_struct!(@gen_body my_name, { $( $field_name : $field_type ),* }));
                    inserted.insert(my_name.to_string());
                }
            }
        }

        impl $crate::resources::uniforms::WgslStruct for $name {
            fn wgsl_struct_def(struct_name: &str) -> String {
                let mut defs = Vec::new();
                let mut inserted = std::collections::HashSet::new();
                $(
                    <$field_type as $crate::resources::uniforms::WgslType>::collect_wgsl_defs(&mut defs, &mut inserted);
                )*
                defs.push($crate::define_gpu_data_struct!(@gen_body struct_name, { $( $field_name : $field_type ),* }));
                defs.join("\n")
            }
        }
    };

    (@val_or_default $type:ty, $val:expr) => { $val };
    (@val_or_default $type:ty) => { <$type as Default>::default() };

    (@gen_body $name_str:expr, { $( $field_name:ident : $field_type:ty ),* }) => {{
        let mut code = format!("struct {} {{\n", $name_str);
        $(
            if !stringify!($field_name).starts_with("__") {
                code.push_str(&format!(
                    "    {}: {},\n",
                    stringify!($field_name),
                    <$field_type as $crate::resources::uniforms::WgslType>::wgsl_type_name()
                ));
            }
        )*
        code.push_str("};\n");
        code
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_gpu_data_struct!(
        struct TestParams {
            /// Documented fields keep their attributes.
            pub offsets: UniformArray<Vec4, 2>,
            pub radius: f32 = 0.5,
            pub count: u32 = 8,
            pub(crate) __pad: UniformArray<u32, 2>,
        }
    );

    #[test]
    fn test_defaults_use_declared_values() {
        let p = TestParams::default();
        assert!((p.radius - 0.5).abs() < f32::EPSILON);
        assert_eq!(p.count, 8);
        assert_eq!(p.offsets[1], Vec4::ZERO);
    }

    #[test]
    fn test_wgsl_generation_skips_padding() {
        let wgsl = TestParams::wgsl_struct_def("Params");
        assert!(wgsl.starts_with("struct Params {"));
        assert!(wgsl.contains("offsets: array<vec4<f32>, 2>,"));
        assert!(wgsl.contains("count: u32,"));
        assert!(!wgsl.contains("__pad"));
        assert_eq!(std::mem::size_of::<TestParams>() % 16, 0);
    }
}
