use crate::surface::SurfaceSize;

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Visual parameters for a cell grid.
///
/// `0` cells are treated as empty: they get the optional centered dot and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct GridStyle {
    pub cell_size: u32,
    pub empty_dot: Option<Rgba>,
    /// Darker inner border drawn on every filled cell; `0` disables it.
    pub bevel: u32,
}

/// Draws a row-major grid of color ids with row 0 at the top of `origin`.
pub fn draw_cell_grid<F>(
    frame: &mut [u8],
    size: SurfaceSize,
    origin: (u32, u32),
    grid: &[Vec<u8>],
    style: GridStyle,
    palette: F,
) where
    F: Fn(u8) -> Rgba,
{
    let cell = style.cell_size;
    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, &value) in row.iter().enumerate() {
            let x = origin.0 + col_idx as u32 * cell;
            let y = origin.1 + row_idx as u32 * cell;

            if value == 0 {
                if let Some(dot) = style.empty_dot {
                    let dot_size = 2u32;
                    let dot_x = x + (cell / 2).saturating_sub(dot_size / 2);
                    let dot_y = y + (cell / 2).saturating_sub(dot_size / 2);
                    fill_rect(frame, size, Rect::new(dot_x, dot_y, dot_size, dot_size), dot);
                }
                continue;
            }

            draw_block(frame, size, Rect::new(x, y, cell, cell), palette(value), style.bevel);
        }
    }
}

/// One filled cell: flat color with an optional darker rim.
pub fn draw_block(frame: &mut [u8], size: SurfaceSize, rect: Rect, color: Rgba, bevel: u32) {
    if bevel == 0 || rect.w <= bevel * 2 || rect.h <= bevel * 2 {
        fill_rect(frame, size, rect, color);
        return;
    }
    fill_rect(frame, size, rect, darken(color, 3));
    fill_rect(
        frame,
        size,
        Rect::new(rect.x + bevel, rect.y + bevel, rect.w - bevel * 2, rect.h - bevel * 2),
        color,
    );
}

/// Outline drawn one pixel *outside* `rect`; sides that would leave the buffer are clipped.
pub fn draw_outline(frame: &mut [u8], size: SurfaceSize, rect: Rect, color: Rgba) {
    let left = rect.x.checked_sub(1);
    let top = rect.y.checked_sub(1);
    let right = rect.x + rect.w;
    let bottom = rect.y + rect.h;

    let span_x = left.unwrap_or(rect.x);
    let span_w = right + 1 - span_x;

    if let Some(top) = top {
        fill_rect(frame, size, Rect::new(span_x, top, span_w, 1), color);
    }
    if bottom < size.height {
        fill_rect(frame, size, Rect::new(span_x, bottom, span_w, 1), color);
    }
    if let Some(left) = left {
        fill_rect(frame, size, Rect::new(left, rect.y, 1, rect.h), color);
    }
    if right < size.width {
        fill_rect(frame, size, Rect::new(right, rect.y, 1, rect.h), color);
    }
}

pub fn fill_rect(frame: &mut [u8], size: SurfaceSize, rect: Rect, color: Rgba) {
    for_each_pixel(frame, size, rect, |px| px.copy_from_slice(&color));
}

/// Alpha-blends `color` over whatever is already in `rect`.
pub fn shade_rect(frame: &mut [u8], size: SurfaceSize, rect: Rect, color: Rgba, alpha: u8) {
    let a = alpha as u16;
    let inv = 255 - a;
    for_each_pixel(frame, size, rect, |px| {
        for channel in 0..3 {
            let blended = (px[channel] as u16 * inv + color[channel] as u16 * a) / 255;
            px[channel] = blended as u8;
        }
        px[3] = 255;
    });
}

pub fn darken(color: Rgba, divisor: u8) -> Rgba {
    let d = divisor.max(1);
    let [r, g, b, a] = color;
    [r - r / d, g - g / d, b - b / d, a]
}

fn for_each_pixel<F>(frame: &mut [u8], size: SurfaceSize, rect: Rect, mut f: F)
where
    F: FnMut(&mut [u8]),
{
    let max_x = rect.x.saturating_add(rect.w).min(size.width);
    let max_y = rect.y.saturating_add(rect.h).min(size.height);
    if rect.x >= max_x || rect.y >= max_y || frame.len() < size.rgba_len() {
        return;
    }

    let stride = size.width as usize * 4;
    let row_bytes = (max_x - rect.x) as usize * 4;
    for y in rect.y..max_y {
        let start = y as usize * stride + rect.x as usize * 4;
        for px in frame[start..start + row_bytes].chunks_exact_mut(4) {
            f(px);
        }
    }
}
