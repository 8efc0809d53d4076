/// Bitmap text for chart axis labels.
/// 5x7 glyphs, numbers only plus the few symbols a tick label needs.
use image::{Rgb, RgbImage};

fn get_char_pattern(c: char) -> Option<[u8; 7]> {
    match c {
        '0' => Some([
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ]),
        '1' => Some([
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ]),
        '2' => Some([
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ]),
        '3' => Some([
            0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110,
        ]),
        '4' => Some([
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ]),
        '5' => Some([
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ]),
        '6' => Some([
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ]),
        '7' => Some([
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ]),
        '8' => Some([
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ]),
        '9' => Some([
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ]),
        '.' => Some([
            0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100,
        ]),
        '-' => Some([
            0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000,
        ]),
        'r' => Some([
            0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000,
        ]),
        ' ' => Some([0; 7]),
        _ => None,
    }
}

/// Width in pixels of `text` at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * 6 * scale
}

pub fn draw_char(img: &mut RgbImage, x: u32, y: u32, c: char, color: Rgb<u8>, scale: u32) {
    if let Some(pattern) = get_char_pattern(c) {
        for (row_idx, &row) in pattern.iter().enumerate() {
            for col in 0..5 {
                if row & (1 << (4 - col)) != 0 {
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let px = x + col * scale + dx;
                            let py = y + row_idx as u32 * scale + dy;
                            if px < img.width() && py < img.height() {
                                img.put_pixel(px, py, color);
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>, scale: u32) {
    let char_width = 6 * scale; // 5 pixels + 1 space
    let mut current_x = x;

    for c in text.chars() {
        draw_char(img, current_x, y, c, color, scale);
        current_x += char_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("12.5", 1), 24);
        assert_eq!(text_width("-3", 2), 24);
    }

    #[test]
    fn test_draw_text_sets_pixels() {
        let mut img = RgbImage::new(40, 10);
        draw_text(&mut img, 0, 0, "1", Rgb([255, 0, 0]), 1);
        // top row of '1' is 0b00100
        assert_eq!(img.get_pixel(2, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_clips_at_border() {
        let mut img = RgbImage::new(3, 3);
        draw_text(&mut img, 1, 1, "8", Rgb([255, 255, 255]), 2);
        assert_eq!(img.width(), 3);
    }
}
