// Magnifier: cut a small square window out of a buffer and blow it up with
// nearest-neighbour sampling, so the preview shows the same hard pixel edges
// the displacement produces.

use crate::error::{Error, Result};
use crate::types::{MagnifierRequest, PixelBuffer};

/// Extract an `output_size x output_size` magnified view of `buffer`.
///
/// The sampled window has side `output_size / zoom`, is centred on `focal`
/// when possible and is pushed back inside the buffer otherwise.
pub fn extract(buffer: &PixelBuffer, request: &MagnifierRequest) -> Result<PixelBuffer> {
    let zoom = request.zoom;
    if zoom.is_nan() || zoom < 1.0 {
        return Err(Error::InvalidZoom(zoom));
    }
    buffer.ensure_not_empty()?;
    if request.output_size == 0 {
        return Err(Error::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }

    let (wx, wy) = window_origin(buffer.width(), buffer.height(), request);
    log::trace!("magnify {}x at ({wx:.1}, {wy:.1})", zoom);

    let n = request.output_size;
    Ok(PixelBuffer::from_fn(n, n, |u, v| {
        let sx = sample(wx, u, zoom, buffer.width());
        let sy = sample(wy, v, zoom, buffer.height());
        buffer.pixel(sx, sy)
    }))
}

/// Top-left corner of the sampled window, in buffer pixels.
///
/// If the window is wider (or taller) than the buffer it is pinned to 0 on that axis.
pub fn window_origin(width: u32, height: u32, request: &MagnifierRequest) -> (f64, f64) {
    let size = request.output_size as f64;
    let side = size / request.zoom;
    let half = size / (2.0 * request.zoom);

    let place = |focal: f64, extent: u32| {
        let upper = (extent as f64 - side).max(0.0);
        (focal - half).max(0.0).min(upper)
    };
    (place(request.focal.0, width), place(request.focal.1, height))
}

#[inline]
fn sample(origin: f64, offset: u32, zoom: f64, extent: u32) -> u32 {
    let v = (origin + offset as f64 / zoom).floor() as u32;
    v.min(extent - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| [x as u8, y as u8, 0, 255])
    }

    fn request(zoom: f64, focal: (f64, f64), output_size: u32) -> MagnifierRequest {
        MagnifierRequest {
            zoom,
            focal,
            output_size,
        }
    }

    #[test]
    fn centred_window_upsamples_blocks() {
        let buf = coords(20, 20);
        let out = extract(&buf, &request(2.0, (10.0, 10.0), 4)).unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
        // Window side 2 starting at (9, 9); each source pixel becomes 2x2.
        assert_eq!(out.pixel(0, 0), buf.pixel(9, 9));
        assert_eq!(out.pixel(1, 1), buf.pixel(9, 9));
        assert_eq!(out.pixel(2, 0), buf.pixel(10, 9));
        assert_eq!(out.pixel(3, 3), buf.pixel(10, 10));
    }

    #[test]
    fn corner_focal_stays_inside() {
        let buf = coords(100, 80);

        let out = extract(&buf, &request(4.0, (0.0, 0.0), 40)).unwrap();
        assert_eq!(out.pixel(0, 0), buf.pixel(0, 0));
        assert_eq!(out.pixel(39, 39), buf.pixel(9, 9));

        let out = extract(&buf, &request(4.0, (100.0, 80.0), 40)).unwrap();
        assert_eq!((out.width(), out.height()), (40, 40));
        assert_eq!(out.pixel(0, 0), buf.pixel(90, 70));
        assert_eq!(out.pixel(39, 39), buf.pixel(99, 79));
    }

    #[test]
    fn window_larger_than_buffer_is_pinned() {
        let buf = coords(10, 10);
        let req = request(1.0, (5.0, 5.0), 32);
        assert_eq!(window_origin(10, 10, &req), (0.0, 0.0));
        let out = extract(&buf, &req).unwrap();
        assert_eq!(out.pixel(31, 31), buf.pixel(9, 9));
    }

    #[test]
    fn zoom_below_one_is_rejected() {
        let buf = coords(4, 4);
        assert!(matches!(
            extract(&buf, &request(0.5, (0.0, 0.0), 8)),
            Err(Error::InvalidZoom(z)) if z == 0.5
        ));
        assert!(matches!(
            extract(&buf, &request(f64::NAN, (0.0, 0.0), 8)),
            Err(Error::InvalidZoom(_))
        ));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let empty = PixelBuffer::filled(0, 0, [0; 4]);
        assert!(matches!(
            extract(&empty, &request(2.0, (0.0, 0.0), 8)),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            extract(&coords(4, 4), &request(2.0, (0.0, 0.0), 0)),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
