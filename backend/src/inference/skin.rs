use image::RgbImage;

// HSV bounds on the 8-bit OpenCV scale (H in 0..=180, S and V in 0..=255).
const SKIN_RANGES: [([u8; 3], [u8; 3]); 2] = [
    ([0, 20, 70], [20, 255, 255]),
    ([170, 20, 70], [180, 255, 255]),
];

/// Converts one RGB pixel to 8-bit HSV with hue halved into 0..=180.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v > 0.0 { delta * 255.0 / v } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [(h / 2.0).round() as u8, s.round() as u8, v as u8]
}

fn is_skin_pixel(hsv: [u8; 3]) -> bool {
    SKIN_RANGES.iter().any(|(lower, upper)| {
        (0..3).all(|i| hsv[i] >= lower[i] && hsv[i] <= upper[i])
    })
}

/// Fraction of pixels whose colour falls inside the skin-tone HSV ranges.
pub fn skin_ratio(image: &RgbImage) -> f32 {
    let total = image.width() as usize * image.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let skin = image
        .pixels()
        .filter(|p| is_skin_pixel(rgb_to_hsv(p[0], p[1], p[2])))
        .count();
    skin as f32 / total as f32
}

pub fn contains_skin(image: &RgbImage, min_ratio: f32) -> bool {
    skin_ratio(image) > min_ratio
}
