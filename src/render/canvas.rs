use image::{Rgb, RgbImage};

/// RGB画像への描画
pub struct Canvas<'a> {
    image: &'a mut RgbImage,
}

impl<'a> Canvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self { image }
    }

    /// Bresenhamのアルゴリズムで線を描画
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 矩形の枠を描画
    pub fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        self.draw_line(x0, y0, x1, y0, color);
        self.draw_line(x1, y0, x1, y1, color);
        self.draw_line(x1, y1, x0, y1, color);
        self.draw_line(x0, y1, x0, y0, color);
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        let (w, h) = self.image.dimensions();
        if x >= 0 && (x as u32) < w && y >= 0 && (y as u32) < h {
            self.image.put_pixel(x as u32, y as u32, to_rgb(color));
        }
    }
}

/// 0xRRGGBB -> Rgb
pub fn to_rgb(color: u32) -> Rgb<u8> {
    Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFFFF;

    #[test]
    fn test_to_rgb() {
        assert_eq!(to_rgb(0x102030), Rgb([0x10, 0x20, 0x30]));
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut image = RgbImage::new(10, 10);
        Canvas::new(&mut image).draw_line(1, 1, 8, 5, WHITE);
        assert_eq!(*image.get_pixel(1, 1), to_rgb(WHITE));
        assert_eq!(*image.get_pixel(8, 5), to_rgb(WHITE));
        assert_eq!(*image.get_pixel(0, 9), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_circle_clipped_at_border() {
        let mut image = RgbImage::new(6, 6);
        Canvas::new(&mut image).draw_circle(0, 0, 2, WHITE);
        assert_eq!(*image.get_pixel(0, 0), to_rgb(WHITE));
        assert_eq!(*image.get_pixel(2, 0), to_rgb(WHITE));
        assert_eq!(*image.get_pixel(2, 2), Rgb([0, 0, 0]));
    }
}
