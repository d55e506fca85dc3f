use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array4, ArrayView4};

use super::config::{ImageConfig, TensorLayout};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid image format: {0}")]
    InvalidImage(#[from] image::ImageError),
    #[error("Failed to build input tensor: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Normalized model input, stored as `[1, height, width, 3]`.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Array4<f32>,
}

#[cfg_attr(not(feature = "torch"), allow(dead_code))]
impl ImageTensor {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Flattened values in the requested memory layout.
    pub fn to_layout(&self, layout: TensorLayout) -> Vec<f32> {
        match layout {
            TensorLayout::Nhwc => self.data.iter().copied().collect(),
            TensorLayout::Nchw => self.data.view().permuted_axes([0, 3, 1, 2]).iter().copied().collect(),
        }
    }

    pub fn dims(&self, layout: TensorLayout) -> [i64; 4] {
        let s = self.data.shape();
        match layout {
            TensorLayout::Nhwc => [s[0] as i64, s[1] as i64, s[2] as i64, s[3] as i64],
            TensorLayout::Nchw => [s[0] as i64, s[3] as i64, s[1] as i64, s[2] as i64],
        }
    }
}

pub fn decode(image_bytes: &[u8]) -> Result<RgbImage, NormalizeError> {
    Ok(image::load_from_memory(image_bytes)?.to_rgb8())
}

/// Resizes to the model input size and maps every channel from [0, 255]
/// onto `value / scale + offset` ([-1, 1] with the default settings).
pub fn normalize(rgb: &RgbImage, config: &ImageConfig) -> Result<ImageTensor, NormalizeError> {
    let [width, height] = config.size;
    let resized = imageops::resize(rgb, width, height, FilterType::Triangle);
    let norm = config.normalization;

    let values: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| v as f32 / norm.scale + norm.offset)
        .collect();

    let data = Array4::from_shape_vec((1, height as usize, width as usize, 3), values)?;
    Ok(ImageTensor { data })
}
