use std::fmt;

use ndshape::{RuntimeShape, Shape};

use crate::{TerrainError, TerrainResult};

/// Where the initial column heights come from.
#[derive(Clone, Debug)]
pub enum HeightSource {
    /// Every column gets this height.
    Flat(i32),
    /// Normalized samples (e.g. a grayscale heightmap or a noise texture), one per column.
    Samples(HeightSamples),
}

impl HeightSource {
    /// Produces one integer height per column of a `dims` grid, X varying fastest.
    pub(crate) fn quantize(
        &self,
        dims: [u32; 2],
        height_multiplier: f32,
    ) -> TerrainResult<Vec<i32>> {
        let size = dims[0] as usize * dims[1] as usize;
        match self {
            HeightSource::Flat(height) => Ok(vec![*height; size]),
            HeightSource::Samples(samples) => {
                if samples.dims() != dims {
                    return Err(TerrainError::SampleShapeMismatch {
                        expected: dims,
                        actual: samples.dims(),
                        len: samples.samples().len(),
                    });
                }
                Ok(samples
                    .samples()
                    .iter()
                    .map(|&s| quantize_sample(s, height_multiplier))
                    .collect())
            }
        }
    }
}

/// Scales a sample and truncates it toward zero, so the same samples always produce the same heights.
#[inline]
pub fn quantize_sample(sample: f32, height_multiplier: f32) -> i32 {
    // `as` truncates toward zero and saturates; NaN becomes 0.
    (sample * height_multiplier) as i32
}

/// A dense `width x length` buffer of height samples, X varying fastest.
#[derive(Clone)]
pub struct HeightSamples {
    shape: RuntimeShape<u32, 2>,
    samples: Vec<f32>,
}

impl fmt::Debug for HeightSamples {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightSamples")
            .field("dims", &self.dims())
            .field("samples", &self.samples)
            .finish()
    }
}

impl HeightSamples {
    pub fn new(width: u32, length: u32, samples: Vec<f32>) -> TerrainResult<Self> {
        let expected = width as usize * length as usize;
        if width == 0 || length == 0 || samples.len() != expected {
            return Err(TerrainError::SampleShapeMismatch {
                expected: [width, length],
                actual: [width, length],
                len: samples.len(),
            });
        }
        Ok(Self {
            shape: RuntimeShape::<u32, 2>::new([width, length]),
            samples,
        })
    }

    /// Samples `f(x, z)` at every column.
    pub fn from_fn(
        width: u32,
        length: u32,
        mut f: impl FnMut(u32, u32) -> f32,
    ) -> TerrainResult<Self> {
        let mut samples = Vec::with_capacity(width as usize * length as usize);
        for z in 0..length {
            for x in 0..width {
                samples.push(f(x, z));
            }
        }
        Self::new(width, length, samples)
    }

    /// Converts 8-bit grayscale pixels (X varying fastest) into samples in `[0, 1]`.
    pub fn from_luma8(width: u32, length: u32, pixels: &[u8]) -> TerrainResult<Self> {
        Self::new(
            width,
            length,
            pixels.iter().map(|&p| f32::from(p) / 255.0).collect(),
        )
    }

    #[inline]
    pub fn dims(&self) -> [u32; 2] {
        self.shape.as_array()
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn get(&self, x: u32, z: u32) -> Option<f32> {
        let [width, length] = self.dims();
        (x < width && z < length).then(|| self.samples[self.shape.linearize([x, z]) as usize])
    }
}
