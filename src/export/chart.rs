use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::text_render::{draw_text, text_width};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);

/// Plot area in image coordinates.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl PlotArea {
    fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Map sample `index` with value `value` into the plot area.
fn to_pixel(area: &PlotArea, index: usize, count: usize, value: f64, min: f64, max: f64) -> (f32, f32) {
    let x = if count > 1 {
        area.left + area.width * index as f32 / (count - 1) as f32
    } else {
        area.left
    };
    let y = if max > min {
        area.bottom() - area.height * ((value - min) / (max - min)) as f32
    } else {
        area.top + area.height / 2.0
    };
    (x, y)
}

/// Line chart of a profile against ring radius.
pub fn render_profile_chart(values: &[f64]) -> RgbImage {
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let area = PlotArea {
        left: MARGIN_LEFT as f32,
        top: MARGIN_TOP as f32,
        width: (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) as f32,
        height: (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) as f32,
    };

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // horizontal grid at quarter steps
    for step in 1..4 {
        let y = area.top + area.height * step as f32 / 4.0;
        draw_line_segment_mut(&mut image, (area.left, y), (area.left + area.width, y), GRID);
    }

    draw_hollow_rect_mut(
        &mut image,
        Rect::at(MARGIN_LEFT as i32, MARGIN_TOP as i32)
            .of_size(area.width as u32 + 1, area.height as u32 + 1),
        AXIS,
    );

    for (i, window) in values.windows(2).enumerate() {
        if !window[0].is_finite() || !window[1].is_finite() {
            continue;
        }
        let start = to_pixel(&area, i, values.len(), window[0], min, max);
        let end = to_pixel(&area, i + 1, values.len(), window[1], min, max);
        draw_line_segment_mut(&mut image, start, end, LINE);
    }

    if !finite.is_empty() {
        let top_label = format!("{:.2}", max);
        let bottom_label = format!("{:.2}", min);
        let label_x = |label: &str| MARGIN_LEFT.saturating_sub(text_width(label, 1) + 4);
        draw_text(&mut image, label_x(&top_label), MARGIN_TOP, &top_label, AXIS, 1);
        draw_text(
            &mut image,
            label_x(&bottom_label),
            HEIGHT - MARGIN_BOTTOM - 7,
            &bottom_label,
            AXIS,
            1,
        );
    }

    let last = format!("{}", values.len().saturating_sub(1));
    draw_text(&mut image, MARGIN_LEFT, HEIGHT - MARGIN_BOTTOM + 8, "0", AXIS, 1);
    draw_text(
        &mut image,
        WIDTH - MARGIN_RIGHT - text_width(&last, 1),
        HEIGHT - MARGIN_BOTTOM + 8,
        &last,
        AXIS,
        1,
    );
    draw_text(
        &mut image,
        WIDTH / 2,
        HEIGHT - MARGIN_BOTTOM + 20,
        "r",
        AXIS,
        2,
    );

    image
}
