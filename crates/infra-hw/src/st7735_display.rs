// ST7735 panel adapter (SPI, 160x80).
//
// Two render paths mirror the two view modes: a 2x5 grid of color-coded
// metric lines, and a single-metric history trace with a heat-colored
// backdrop.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, Pin, Spidev};
use st7735_lcd::{Orientation, ST7735};
use tracing::info;

use airlog_core::domain::{Frame, FrameLine};
use airlog_core::port::{DisplayError, StatusDisplay};

const WIDTH: u32 = 160;
const HEIGHT: u32 = 80;
/// Row offset of the 80px window inside the controller's RAM
const PANEL_Y_OFFSET: u16 = 25;
/// Grid layout: 2 columns x 5 rows
const GRID_COLUMNS: i32 = 2;
const GRID_ROWS: i32 = 5;
const GRID_X_INSET: i32 = 2;
const GRID_Y_INSET: i32 = 2;
/// Top band reserved for the title in graph mode
const GRAPH_TOP: i32 = 25;

/// GPIO wiring of the panel
pub struct PanelPins {
    pub dc: u64,
    pub reset: u64,
    pub backlight: u64,
}

/// The attached status panel
pub struct St7735Panel {
    driver: ST7735<Spidev, Pin, Pin>,
}

impl St7735Panel {
    /// Open the panel, e.g. on `/dev/spidev0.1` at 10 MHz
    pub fn open(spi_path: &str, spi_hz: u32, pins: PanelPins) -> Result<Self, DisplayError> {
        let mut spi = Spidev::open(spi_path).map_err(|e| DisplayError::Bus(e.to_string()))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(spi_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)
            .map_err(|e| DisplayError::Bus(e.to_string()))?;

        let dc = output_pin(pins.dc)?;
        let reset = output_pin(pins.reset)?;
        let backlight = output_pin(pins.backlight)?;
        backlight
            .set_value(1)
            .map_err(|e| DisplayError::Bus(e.to_string()))?;

        let mut delay = Delay;
        // BGR subpixel order, inverted panel
        let mut driver = ST7735::new(spi, dc, reset, false, true, WIDTH, HEIGHT);
        driver
            .init(&mut delay)
            .map_err(|_| DisplayError::Bus("ST7735 init failed".to_string()))?;
        driver
            .set_orientation(&Orientation::LandscapeSwapped)
            .map_err(|_| DisplayError::Bus("ST7735 orientation failed".to_string()))?;
        driver.set_offset(0, PANEL_Y_OFFSET);

        info!(spi = %spi_path, "ST7735 panel initialized");
        Ok(Self { driver })
    }

    fn draw_grid(&mut self, lines: &[FrameLine]) -> Result<(), DisplayError> {
        self.driver.clear(Rgb565::BLACK).map_err(draw_err)?;

        let cell_w = WIDTH as i32 / GRID_COLUMNS;
        let cell_h = HEIGHT as i32 / GRID_ROWS;
        for (i, line) in lines.iter().enumerate() {
            let i = i as i32;
            let x = GRID_X_INSET + cell_w * (i / GRID_ROWS);
            let y = GRID_Y_INSET + cell_h * (i % GRID_ROWS);
            let style = MonoTextStyle::new(&FONT_6X10, level_color(line));
            Text::with_baseline(&line.text(), Point::new(x, y), style, Baseline::Top)
                .draw(&mut self.driver)
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_graph(&mut self, line: &FrameLine, trace: &[f64]) -> Result<(), DisplayError> {
        self.driver.clear(Rgb565::WHITE).map_err(draw_err)?;

        for (i, v) in trace.iter().enumerate() {
            let x = i as i32;
            if x >= WIDTH as i32 {
                break;
            }
            // Cold-to-hot backdrop column
            let (r, g, b) = heat_rgb(*v);
            let column = Rectangle::new(
                Point::new(x, GRAPH_TOP),
                Size::new(1, (HEIGHT as i32 - GRAPH_TOP) as u32),
            );
            column
                .into_styled(PrimitiveStyle::with_fill(Rgb565::new(r >> 3, g >> 2, b >> 3)))
                .draw(&mut self.driver)
                .map_err(draw_err)?;

            // Black trace marker
            let marker_y = HEIGHT as i32 - (v * f64::from(HEIGHT as i32 - GRAPH_TOP)) as i32;
            Rectangle::new(Point::new(x, marker_y.clamp(GRAPH_TOP, HEIGHT as i32 - 1)), Size::new(1, 1))
                .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
                .draw(&mut self.driver)
                .map_err(draw_err)?;
        }

        let style = MonoTextStyle::new(&FONT_10X20, Rgb565::BLACK);
        Text::with_baseline(&line.text(), Point::zero(), style, Baseline::Top)
            .draw(&mut self.driver)
            .map_err(draw_err)?;
        Ok(())
    }
}

fn output_pin(number: u64) -> Result<Pin, DisplayError> {
    let pin = Pin::new(number);
    pin.export().map_err(|e| DisplayError::Bus(e.to_string()))?;
    pin.set_direction(Direction::Out)
        .map_err(|e| DisplayError::Bus(e.to_string()))?;
    Ok(pin)
}

fn draw_err(_: ()) -> DisplayError {
    DisplayError::Draw("ST7735 draw failed".to_string())
}

fn level_color(line: &FrameLine) -> Rgb565 {
    let (r, g, b) = line.level.rgb();
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Map a normalized value to the blue-to-red backdrop used in graph mode
fn heat_rgb(v: f64) -> (u8, u8, u8) {
    let hue = (1.0 - v.clamp(0.0, 1.0)) * 0.6;
    hsv_to_rgb(hue, 1.0, 1.0)
}

/// Standard HSV to RGB, hue in 0..=1
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

impl StatusDisplay for St7735Panel {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        match frame {
            Frame::Grid { lines } => self.draw_grid(lines),
            Frame::Graph { line, trace } => self.draw_graph(line, trace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_backdrop_runs_blue_to_red() {
        // Low values sit at the blue end of the sweep
        let (r, _, b) = heat_rgb(0.0);
        assert!(b > r);
        // High values at the red end
        let (r, _, b) = heat_rgb(1.0);
        assert!(r > b);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), (0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), (0, 0, 255));
    }
}
