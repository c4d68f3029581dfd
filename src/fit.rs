//! Pure placement math for fitting a photo into a placeholder region.
//!
//! "Fit within", not "fill": the photo is scaled uniformly (up or down) until
//! it touches the region on its tighter axis, then centered. No I/O, no
//! images — just dimension arithmetic, testable on its own.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error(
        "invalid geometry: region {region_w}x{region_h}, source {source_w}x{source_h} \
         (all dimensions must be positive)"
    )]
    InvalidGeometry {
        region_w: u32,
        region_h: u32,
        source_w: u32,
        source_h: u32,
    },
}

/// Scaled size and centered offset of a photo inside a placeholder region.
///
/// Offsets are relative to the region's own origin; the caller composes them
/// with the region's position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlacement {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Compute the aspect-preserving fit of a `source_w`×`source_h` image inside
/// a `region_w`×`region_h` region.
///
/// `scale = min(region_w / source_w, region_h / source_h)`; scaled dimensions
/// are rounded to whole pixels, offsets are the integer half of the remaining
/// space. Zero dimensions on either side are a malformed template or an
/// unreadable photo and fail with [`GeometryError::InvalidGeometry`].
pub fn fit(
    region_w: u32,
    region_h: u32,
    source_w: u32,
    source_h: u32,
) -> Result<FitPlacement, GeometryError> {
    if region_w == 0 || region_h == 0 || source_w == 0 || source_h == 0 {
        return Err(GeometryError::InvalidGeometry {
            region_w,
            region_h,
            source_w,
            source_h,
        });
    }

    let scale_w = region_w as f64 / source_w as f64;
    let scale_h = region_h as f64 / source_h as f64;
    let scale = scale_w.min(scale_h);

    // scale == min ratio keeps both products within the region, so the
    // rounded sizes never exceed it and the subtractions cannot underflow.
    let width = (source_w as f64 * scale).round() as u32;
    let height = (source_h as f64 * scale).round() as u32;

    Ok(FitPlacement {
        width,
        height,
        offset_x: (region_w - width) / 2,
        offset_y: (region_h - height) / 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_photo_letterboxed_vertically() {
        // 600x300 into 300x300: scale 0.5 → 300x150, centered at y=75.
        let placement = fit(300, 300, 600, 300).unwrap();
        assert_eq!(placement.width, 300);
        assert_eq!(placement.height, 150);
        assert_eq!(placement.offset_x, 0);
        assert_eq!(placement.offset_y, 75);
    }

    #[test]
    fn tall_photo_pillarboxed_horizontally() {
        // 300x600 into 300x300: scale 0.5 → 150x300, centered at x=75.
        let placement = fit(300, 300, 300, 600).unwrap();
        assert_eq!(placement.width, 150);
        assert_eq!(placement.height, 300);
        assert_eq!(placement.offset_x, 75);
        assert_eq!(placement.offset_y, 0);
    }

    #[test]
    fn small_photo_scales_up() {
        let placement = fit(400, 400, 100, 50).unwrap();
        assert_eq!(placement.width, 400);
        assert_eq!(placement.height, 200);
        assert_eq!(placement.offset_x, 0);
        assert_eq!(placement.offset_y, 100);
    }

    #[test]
    fn matching_aspect_fills_region_exactly() {
        let placement = fit(300, 200, 600, 400).unwrap();
        assert_eq!(placement.width, 300);
        assert_eq!(placement.height, 200);
        assert_eq!(placement.offset_x, 0);
        assert_eq!(placement.offset_y, 0);
    }

    #[test]
    fn rounding_never_exceeds_region() {
        // 7:65 ratio lands on a .5 rounding boundary.
        let placement = fit(100, 7, 1000, 65).unwrap();
        assert!(placement.width <= 100);
        assert!(placement.height <= 7);
    }

    #[test]
    fn odd_remainder_floors_offset() {
        // 301 - 300 leaves one spare pixel; the half offset floors to 0.
        let placement = fit(301, 300, 300, 300).unwrap();
        assert_eq!(placement.width, 300);
        assert_eq!(placement.height, 300);
        assert_eq!(placement.offset_x, 0);
    }

    #[test]
    fn zero_region_width_is_invalid() {
        assert!(matches!(
            fit(0, 300, 600, 300),
            Err(GeometryError::InvalidGeometry { region_w: 0, .. })
        ));
    }

    #[test]
    fn zero_source_dimensions_are_invalid() {
        assert!(matches!(fit(300, 300, 0, 300), Err(_)));
        assert!(matches!(fit(300, 300, 600, 0), Err(_)));
    }
}
