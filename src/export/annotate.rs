use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut};

use crate::edges::to_gray8;
use crate::grid::Grid;
use crate::locate::Circle;

/// Convert a color name to RGB values
pub fn parse_color(color_name: &str) -> Rgb<u8> {
    match color_name.to_lowercase().as_str() {
        "red" => Rgb([255, 0, 0]),
        "green" => Rgb([0, 255, 0]),
        "blue" => Rgb([0, 0, 255]),
        "yellow" => Rgb([255, 255, 0]),
        "cyan" => Rgb([0, 255, 255]),
        "magenta" => Rgb([255, 0, 255]),
        "white" => Rgb([255, 255, 255]),
        _ => Rgb([255, 0, 0]), // Default to red
    }
}

/// Grayscale display image with the detected phantom ring drawn on top.
pub fn create_annotated_image(display: &Grid, circle: &Circle, color: Rgb<u8>) -> Result<RgbImage> {
    let gray = to_gray8(display);
    let rgb: Vec<u8> = gray.iter().flat_map(|&v| [v, v, v]).collect();

    let mut image = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
        display.cols as u32,
        display.rows as u32,
        rgb,
    )
    .context("Failed to create image buffer")?;

    let center = (circle.center_col as i32, circle.center_row as i32);
    draw_hollow_circle_mut(&mut image, center, circle.radius as i32, color);
    draw_cross_mut(&mut image, color, center.0, center.1);

    Ok(image)
}
