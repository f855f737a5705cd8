//! Color types and helpers
//!
//! Pixel storage uses `smart_leds::RGB8`; hue/saturation/value conversion is
//! delegated to the driver library.

pub use smart_leds::hsv::hsv2rgb;
use smart_leds::{RGB8, hsv::Hsv as HSV};

use crate::math8::blend8;

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Interpolate between two HSV colors at `t` (0-255)
///
/// Hue travels the short way around the 0-255 hue circle.
#[allow(clippy::cast_possible_truncation)]
pub fn lerp_hsv(a: Hsv, b: Hsv, t: u8) -> Hsv {
    let delta = b.hue.wrapping_sub(a.hue);
    let hue = if delta > 127 {
        // Backward around the circle
        let backward = 0u8.wrapping_sub(delta);
        a.hue.wrapping_sub(blend8(0, backward, t))
    } else {
        a.hue.wrapping_add(blend8(0, delta, t))
    };

    Hsv {
        hue,
        sat: blend8(a.sat, b.sat, t),
        val: blend8(a.val, b.val, t),
    }
}

/// Fill a logical pixel run with a three-point HSV gradient
///
/// The first half runs `c1 -> c2`, the second half `c2 -> c3`. Writes through
/// the provided sink so callers can route the result through wiring-compensated
/// addressing.
#[allow(clippy::cast_possible_truncation)]
pub fn fill_gradient_three(len: usize, c1: Hsv, c2: Hsv, c3: Hsv, mut sink: impl FnMut(usize, Rgb)) {
    if len == 0 {
        return;
    }
    if len == 1 {
        sink(0, hsv2rgb(c1));
        return;
    }

    let half = len / 2;
    for i in 0..len {
        let color = if i < half {
            let t = ((i * 255) / half.max(1)) as u8;
            lerp_hsv(c1, c2, t)
        } else {
            let span = (len - 1 - half).max(1);
            let t = (((i - half) * 255) / span) as u8;
            lerp_hsv(c2, c3, t)
        };
        sink(i, hsv2rgb(color));
    }
}
