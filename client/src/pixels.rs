//! Pure operations on RGBA pixel buffers, shared by the predict path.

/// Inverts the color channels of every pixel in place, leaving alpha alone.
/// The classifier expects white-on-black while the canvas is drawn
/// black-on-white. Applying it twice restores the original buffer.
pub fn invert_rgba(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[0] = 255 - pixel[0];
        pixel[1] = 255 - pixel[1];
        pixel[2] = 255 - pixel[2];
    }
}

/// True if any pixel differs from the white background. Alpha is ignored.
pub fn has_ink(pixels: &[u8]) -> bool {
    pixels
        .chunks_exact(4)
        .any(|pixel| pixel[0] != 255 || pixel[1] != 255 || pixel[2] != 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_buffer(pixels: usize) -> Vec<u8> {
        let mut buffer = vec![255u8; pixels * 4];
        for pixel in buffer.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        buffer
    }

    #[test]
    fn inversion_is_an_involution() {
        let mut buffer: Vec<u8> = (0..=255).cycle().take(16 * 4).map(|v| v as u8).collect();
        let original = buffer.clone();
        invert_rgba(&mut buffer);
        assert_ne!(buffer, original);
        invert_rgba(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn inversion_preserves_alpha() {
        let mut buffer = vec![10, 20, 30, 77, 255, 255, 255, 0];
        invert_rgba(&mut buffer);
        assert_eq!(buffer, vec![245, 235, 225, 77, 0, 0, 0, 0]);
    }

    #[test]
    fn blank_canvas_has_no_ink() {
        assert!(!has_ink(&white_buffer(64)));
        assert!(!has_ink(&[]));
    }

    #[test]
    fn single_dark_pixel_counts_as_ink() {
        let mut buffer = white_buffer(64);
        buffer[4 * 10] = 0;
        assert!(has_ink(&buffer));
    }

    #[test]
    fn off_white_pixel_counts_as_ink() {
        let mut buffer = white_buffer(4);
        buffer[2] = 254;
        assert!(has_ink(&buffer));
    }
}
