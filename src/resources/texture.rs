//! CPU-side texture storage used by the reference executor.
//!
//! [`Texture2D`] is a dense, row-major grid of texels; [`TextureArray`] is a
//! stack of equally sized layers. Reads outside the grid go through
//! [`Texture2D::load_clamped`], which mirrors clamp-to-edge `textureLoad`.

use glam::{Vec3, Vec4};

/// Full-resolution linear view depth.
pub type DepthTexture = Texture2D<f32>;

/// Full-resolution normal buffer (xyz of the G-buffer normal target).
pub type NormalTexture = Texture2D<Vec3>;

/// Single-channel obscurance, values in `[0, 1]`.
pub type ObscuranceTexture = Texture2D<f32>;

/// A row-major 2D grid of texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy> Texture2D<T> {
    /// Creates a texture with every texel set to `value`.
    #[must_use]
    pub fn new(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Creates a texture by evaluating `f(x, y)` for every texel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps row-major `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    #[must_use]
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "texel count does not match {width}x{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + x as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Loads with coordinates clamped to the texture edge.
    #[inline]
    #[must_use]
    pub fn load_clamped(&self, x: i32, y: i32) -> T {
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        self.get(cx, cy)
    }

    /// Row-major texel slice.
    #[inline]
    #[must_use]
    pub fn texels(&self) -> &[T] {
        &self.data
    }

    /// Raw mutable access for the dispatch helpers.
    #[inline]
    pub(crate) fn texels_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Texture2D<f32> {
    /// Smallest and largest texel value.
    #[must_use]
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Arithmetic mean of all texels.
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}

/// A stack of equally sized 2D layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureArray<T> {
    width: u32,
    height: u32,
    layers: Vec<Texture2D<T>>,
}

impl<T: Copy> TextureArray<T> {
    /// Creates `layer_count` layers filled with `value`.
    #[must_use]
    pub fn new(width: u32, height: u32, layer_count: usize, value: T) -> Self {
        Self {
            width,
            height,
            layers: (0..layer_count)
                .map(|_| Texture2D::new(width, height, value))
                .collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    #[must_use]
    pub fn layer(&self, index: usize) -> &Texture2D<T> {
        &self.layers[index]
    }

    #[inline]
    pub fn layer_mut(&mut self, index: usize) -> &mut Texture2D<T> {
        &mut self.layers[index]
    }
}

/// Texel of the deinterleaved depth/normal volume: `xyz` normal, `w` depth.
pub type DepthNormalTexel = Vec4;
