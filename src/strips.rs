//! Strip addressing layer
//!
//! Owns the four pixel buffers and the logical-to-physical mapping that
//! compensates for wiring quirks: the middle third of the core strip is wired
//! back-to-front relative to its logical numbering. Effects address pixels by
//! logical position; only this module knows the physical order.

use crate::StripOutput;
use crate::color::Rgb;
use crate::math8::scale8;

pub const CORE_LEN: usize = 142;
pub const INNER_LEN: usize = 84;
pub const OUTER_LEN: usize = 72;
pub const RING_LEN: usize = 62;

/// Segmented strips are split into three equal sub-strips
pub const SEGMENTS: usize = 3;

/// First logical third of the core; positions at or beyond this mirror
pub const CORE_THIRD: usize = CORE_LEN / 3;

pub const INNER_SEGMENT_LEN: usize = INNER_LEN / SEGMENTS;
pub const OUTER_SEGMENT_LEN: usize = OUTER_LEN / SEGMENTS;

/// Longest strip; the wind-down sequence runs this many steps
pub const MAX_STRIP_LEN: usize = CORE_LEN;

/// Brightness restored after a completed wind-down
pub const DEFAULT_BRIGHTNESS: u8 = 160;

/// One of the four physical strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StripId {
    Core = 0,
    Inner = 1,
    Outer = 2,
    Ring = 3,
}

impl StripId {
    pub const ALL: [Self; 4] = [Self::Core, Self::Inner, Self::Outer, Self::Ring];

    /// Number of pixels on this strip
    pub const fn count(self) -> usize {
        match self {
            Self::Core => CORE_LEN,
            Self::Inner => INNER_LEN,
            Self::Outer => OUTER_LEN,
            Self::Ring => RING_LEN,
        }
    }

    /// Length of one sub-strip segment (whole strip when unsegmented)
    pub const fn segment_len(self) -> usize {
        match self {
            Self::Core => CORE_THIRD,
            Self::Inner => INNER_SEGMENT_LEN,
            Self::Outer => OUTER_SEGMENT_LEN,
            Self::Ring => RING_LEN,
        }
    }
}

/// Convert a logical pixel position to its physical index
///
/// - Core: positions in the last two logical thirds mirror to
///   `CORE_LEN - 1 - logical` (the middle physical segment is wired in
///   reverse).
/// - Inner/outer: `logical % segment_len`; the caller adds
///   `segment * segment_len` to pick the target sub-strip.
/// - Ring: identity.
pub const fn map(strip: StripId, logical: usize) -> usize {
    match strip {
        StripId::Core => {
            if logical >= CORE_THIRD && logical < CORE_LEN {
                CORE_LEN - 1 - logical
            } else {
                logical
            }
        }
        StripId::Inner => logical % INNER_SEGMENT_LEN,
        StripId::Outer => logical % OUTER_SEGMENT_LEN,
        StripId::Ring => logical,
    }
}

/// The four pixel buffers plus the global brightness scalar
///
/// Buffers are fixed-size and never reallocated. Brightness is applied at
/// flush time only, so effects always see full-range pixel values.
pub struct StripBuffers {
    core: [Rgb; CORE_LEN],
    inner: [Rgb; INNER_LEN],
    outer: [Rgb; OUTER_LEN],
    ring: [Rgb; RING_LEN],
    brightness: u8,
}

impl Default for StripBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl StripBuffers {
    pub const fn new() -> Self {
        const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
        Self {
            core: [OFF; CORE_LEN],
            inner: [OFF; INNER_LEN],
            outer: [OFF; OUTER_LEN],
            ring: [OFF; RING_LEN],
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub const fn reset_brightness(&mut self) {
        self.brightness = DEFAULT_BRIGHTNESS;
    }

    /// Read one pixel by physical index
    pub fn get(&self, strip: StripId, index: usize) -> Option<Rgb> {
        self.pixels(strip).get(index).copied()
    }

    /// Pixels of one strip in physical order
    pub fn pixels(&self, strip: StripId) -> &[Rgb] {
        match strip {
            StripId::Core => &self.core,
            StripId::Inner => &self.inner,
            StripId::Outer => &self.outer,
            StripId::Ring => &self.ring,
        }
    }

    fn pixels_mut(&mut self, strip: StripId) -> &mut [Rgb] {
        match strip {
            StripId::Core => &mut self.core,
            StripId::Inner => &mut self.inner,
            StripId::Outer => &mut self.outer,
            StripId::Ring => &mut self.ring,
        }
    }

    /// Write one pixel by physical index (silent no-op when out of range)
    pub fn set_physical(&mut self, strip: StripId, index: usize, color: Rgb) {
        let pixels = self.pixels_mut(strip);
        if let Some(pixel) = pixels.get_mut(index) {
            *pixel = color;
        }
    }

    /// Write one pixel by whole-strip logical position
    pub fn set_logical(&mut self, strip: StripId, logical: usize, color: Rgb) {
        if logical >= strip.count() {
            return;
        }
        let physical = match strip {
            StripId::Core | StripId::Ring => map(strip, logical),
            StripId::Inner | StripId::Outer => {
                let segment = logical / strip.segment_len();
                segment * strip.segment_len() + map(strip, logical)
            }
        };
        self.set_physical(strip, physical, color);
    }

    /// Write one pixel of a sub-strip segment by its logical position
    pub fn set_segment(&mut self, strip: StripId, segment: usize, logical: usize, color: Rgb) {
        if segment >= SEGMENTS || logical >= strip.segment_len() {
            return;
        }
        let physical = segment * strip.segment_len() + map(strip, logical);
        self.set_physical(strip, physical, color);
    }

    /// Zero one strip
    pub fn clear(&mut self, strip: StripId) {
        for pixel in self.pixels_mut(strip) {
            *pixel = Rgb { r: 0, g: 0, b: 0 };
        }
    }

    /// Zero all four buffers
    pub fn clear_all(&mut self) {
        for strip in StripId::ALL {
            self.clear(strip);
        }
    }

    /// Flush all four strips to the physical output in one call
    ///
    /// The brightness scalar is applied here, per channel, without touching
    /// the stored pixel values. There is no partial-strip flush path.
    pub fn show_all(&mut self, out: &mut impl StripOutput) {
        let brightness = self.brightness;
        let mut scratch = [Rgb { r: 0, g: 0, b: 0 }; MAX_STRIP_LEN];
        for strip in StripId::ALL {
            let pixels = self.pixels(strip);
            let frame = &mut scratch[..pixels.len()];
            for (dst, src) in frame.iter_mut().zip(pixels) {
                *dst = Rgb {
                    r: scale8(src.r, brightness),
                    g: scale8(src.g, brightness),
                    b: scale8(src.b, brightness),
                };
            }
            out.write(strip, frame);
        }
    }
}
