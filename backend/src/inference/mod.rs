pub mod config;
pub mod model;
pub mod preprocess;
pub mod skin;

pub use config::ClassifierConfig;
pub use model::{Classifier, ClassifierError, load_classifier};

#[cfg(test)]
pub(crate) mod testing {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use shared::{ConditionLabel, Distribution};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::model::{Classifier, ClassifierError};
    use super::preprocess::ImageTensor;

    pub const SKIN_TONE: [u8; 3] = [224, 172, 140];

    pub fn skin_image() -> RgbImage {
        RgbImage::from_pixel(64, 48, Rgb(SKIN_TONE))
    }

    pub fn encode_png(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("png encoding");
        bytes
    }

    pub fn skin_png() -> Vec<u8> {
        encode_png(&skin_image())
    }

    /// Deterministic classifier returning a fixed distribution and counting calls.
    pub struct StubClassifier {
        values: Vec<(ConditionLabel, f64)>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        pub fn returning(values: &[(ConditionLabel, f64)]) -> Self {
            Self {
                values: values.to_vec(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                values: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for StubClassifier {
        fn classify(&self, input: &ImageTensor) -> Result<Distribution, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(input.shape(), &[1, 224, 224, 3]);
            if self.fail {
                return Err(ClassifierError::Inference("shape mismatch".into()));
            }
            Ok(Distribution::from_fn(|label| {
                self.values
                    .iter()
                    .find(|(l, _)| *l == label)
                    .map(|(_, v)| *v)
                    .unwrap_or(0.0)
            }))
        }
    }
}
