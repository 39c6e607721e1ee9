//! Pixel helpers for the softbuffer framebuffer (u32 per pixel, 0x00RRGGBB).

use crate::decoder::DecodedImage;

pub const BG_COLOR: [u8; 3] = [31, 31, 31];

/// Longest side of a freshly opened window.
const MAX_WINDOW_SIDE: u32 = 1200;

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

pub fn fit_scale(img_w: f32, img_h: f32, win_w: f32, win_h: f32) -> f32 {
    (win_w / img_w).min(win_h / img_h)
}

/// Image size shrunk so the longer side is at most `MAX_WINDOW_SIDE`.
pub fn initial_window_size(img_w: u32, img_h: u32) -> (u32, u32) {
    let (w, h) = (img_w.max(1), img_h.max(1));
    let aspect = w as f64 / h as f64;
    if aspect >= 1.0 && w > MAX_WINDOW_SIDE {
        (MAX_WINDOW_SIDE, ((MAX_WINDOW_SIDE as f64 / aspect) as u32).max(1))
    } else if aspect < 1.0 && h > MAX_WINDOW_SIDE {
        (((MAX_WINDOW_SIDE as f64 * aspect) as u32).max(1), MAX_WINDOW_SIDE)
    } else {
        (w, h)
    }
}

/// Clear the frame and draw `img` scaled to fit, centred.
pub fn draw_fitted(frame: &mut [u32], fb_w: u32, fb_h: u32, img: &DecodedImage) {
    frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
    if img.width == 0 || img.height == 0 {
        return;
    }

    let (sw, sh) = (fb_w as f32, fb_h as f32);
    let scale = fit_scale(img.width as f32, img.height as f32, sw, sh);
    let x0 = (sw - img.width as f32 * scale) / 2.0;
    let y0 = (sh - img.height as f32 * scale) / 2.0;

    blit_scaled(frame, fb_w, fb_h, &img.rgba_bytes, img.width, img.height, x0, y0, scale);
}

#[allow(clippy::too_many_arguments)]
pub fn blit_scaled(
    dst: &mut [u32], dst_w: u32, dst_h: u32,
    src: &[u8], src_w: u32, src_h: u32,
    x0: f32, y0: f32, scale: f32,
) {
    let draw_w = src_w as f32 * scale;
    let draw_h = src_h as f32 * scale;

    let dx_start = (x0.max(0.0)) as u32;
    let dy_start = (y0.max(0.0)) as u32;
    let dx_end = ((x0 + draw_w).ceil() as u32).min(dst_w);
    let dy_end = ((y0 + draw_h).ceil() as u32).min(dst_h);

    let inv_scale = 1.0 / scale;

    for dy in dy_start..dy_end {
        let sy = ((dy as f32 - y0) * inv_scale) as u32;
        if sy >= src_h {
            continue;
        }
        for dx in dx_start..dx_end {
            let sx = ((dx as f32 - x0) * inv_scale) as u32;
            if sx >= src_w {
                continue;
            }

            let si = (sy as usize * src_w as usize + sx as usize) * 4;
            let di = dy as usize * dst_w as usize + dx as usize;

            let sa = src[si + 3] as u32;
            if sa == 255 {
                dst[di] = rgb(src[si], src[si + 1], src[si + 2]);
            } else if sa > 0 {
                let inv = 255 - sa;
                let (dr, dg, db) = unpack_rgb(dst[di]);
                let r = ((src[si] as u32 * sa + dr as u32 * inv) / 255) as u8;
                let g = ((src[si + 1] as u32 * sa + dg as u32 * inv) / 255) as u8;
                let b = ((src[si + 2] as u32 * sa + db as u32 * inv) / 255) as u8;
                dst[di] = rgb(r, g, b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
        DecodedImage {
            rgba_bytes: px.repeat((w * h) as usize),
            width: w,
            height: h,
            file_size: 0,
            format_name: "TEST".to_string(),
        }
    }

    #[test]
    fn window_size_caps_longer_side() {
        assert_eq!(initial_window_size(800, 600), (800, 600));
        assert_eq!(initial_window_size(2400, 1200), (1200, 600));
        assert_eq!(initial_window_size(1000, 4000), (300, 1200));
        assert_eq!(initial_window_size(0, 0), (1, 1));
    }

    #[test]
    fn fitted_image_is_centred_with_letterbox() {
        let (w, h) = (8u32, 4u32);
        let mut frame = vec![0u32; (w * h) as usize];
        draw_fitted(&mut frame, w, h, &solid(2, 2, [255, 0, 0, 255]));

        let bg = rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]);
        let red = rgb(255, 0, 0);
        assert_eq!(frame[0], bg);
        assert_eq!(frame[7], bg);
        assert_eq!(frame[2], red);
        assert_eq!(frame[5], red);
        assert_eq!(frame[(3 * w + 3) as usize], red);
    }

    #[test]
    fn transparent_pixels_leave_background() {
        let mut frame = vec![0u32; 4];
        draw_fitted(&mut frame, 2, 2, &solid(1, 1, [255, 255, 255, 0]));
        let bg = rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]);
        assert!(frame.iter().all(|&p| p == bg));
    }
}
