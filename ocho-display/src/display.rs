use sdl2::pixels::Color;
use sdl2::rect::Rect;

use ocho_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use ocho_core::FrameBuffer;

/// # Display
/// Renders the machine's 64x32 frame buffer into an SDL2 window, one filled
/// rectangle per cell: foreground color when the cell is lit, background
/// when it is not. Lit cells optionally get a background-colored outline so
/// adjacent pixels stay distinguishable at large scales.
///
/// Purely a consumer; it never writes back into the frame buffer.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    scale: u32,
    fg: Color,
    bg: Color,
    outlines: bool,
}

impl Display {
    /// Create a window sized for the frame buffer at `scale` pixels per cell.
    pub fn new(
        sdl: &sdl2::Sdl,
        scale: u32,
        fg: Color,
        bg: Color,
        outlines: bool,
    ) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                "ocho",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Display {
            canvas,
            scale,
            fg,
            bg,
            outlines,
        })
    }

    /// Draw one frame from the buffer and present it.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        self.canvas.set_draw_color(self.bg);
        self.canvas.clear();

        for (row, cells) in frame.iter().enumerate() {
            for (col, &lit) in cells.iter().enumerate() {
                if !lit {
                    continue;
                }
                let rect = cell_rect(col, row, self.scale);
                self.canvas.set_draw_color(self.fg);
                self.canvas.fill_rect(rect)?;
                if self.outlines {
                    self.canvas.set_draw_color(self.bg);
                    self.canvas.draw_rect(rect)?;
                }
            }
        }

        self.canvas.present();
        Ok(())
    }
}

/// The window rectangle covering one frame buffer cell.
fn cell_rect(col: usize, row: usize, scale: u32) -> Rect {
    Rect::new(
        col as i32 * scale as i32,
        row as i32 * scale as i32,
        scale,
        scale,
    )
}
