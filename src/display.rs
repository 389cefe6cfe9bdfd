use crate::interpreter::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use std::io;
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the environment to put the framebuffer on a screen. It
/// should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// draw a whole frame; (0, 0) is top-left
    fn draw(&mut self, framebuffer: &Framebuffer) -> Result<(), io::Error>;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    #[cfg(test)]
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel that is (or isn't) lit. canvas y
    /// grows upwards, so rows are negated
    fn points_from_framebuffer<'a>(
        &self,
        framebuffer: &'a Framebuffer,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let target = lit as u8;
        framebuffer.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, px)| **px == target)
                .map(move |(x, _)| (x as f64, -1.0 * y as f64))
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(SCREEN_WIDTH, SCREEN_HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, framebuffer: &Framebuffer) -> Result<(), io::Error> {
        render(&mut self.terminal, &self.resolution, framebuffer)
    }
}

/// paint the framebuffer onto a TUI canvas, 1:1 with terminal cells when
/// there's room. on a smaller terminal the canvas shrinks to fit and tui
/// scales the pixels down
fn render<B: Backend>(
    terminal: &mut Terminal<B>,
    resolution: &Resolution,
    framebuffer: &Framebuffer,
) -> Result<(), io::Error> {
    let off: Vec<_> = resolution
        .points_from_framebuffer(framebuffer, false)
        .collect();
    let on: Vec<_> = resolution.points_from_framebuffer(framebuffer, true).collect();
    let x_bounds = resolution.x_bounds();
    let y_bounds = resolution.y_bounds();
    let (w, h) = (resolution.0 as u16, resolution.1 as u16);

    terminal.draw(|f| {
        // never hand tui an area outside the terminal, it asserts on that
        let area = Rect::new(0, 0, 2 + w, 2 + h).intersection(f.size());

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .title("CHIP-8")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::Black)),
            )
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .marker(Marker::Block)
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &off,
                    color: Color::Black,
                });
                ctx.draw(&Points {
                    coords: &on,
                    color: Color::White,
                });
            });
        f.render_widget(canvas, area);
    })?;
    Ok(())
}

/// useful for testing non-display routines; remembers what it was asked to draw
#[derive(Default)]
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub last_lit: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, framebuffer: &Framebuffer) -> Result<(), io::Error> {
        let r = Resolution(SCREEN_WIDTH, SCREEN_HEIGHT);
        self.frames_drawn += 1;
        self.last_lit = r.points_from_framebuffer(framebuffer, true).count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui::backend::TestBackend;

    fn glyph_framebuffer() -> Framebuffer {
        let mut fb = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        fb[0][0] = 1;
        fb[31][63] = 1;
        fb[10][20] = 1;
        fb
    }

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_blank_framebuffer_points() {
        let r = Resolution(64, 32);
        let fb = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        assert_eq!(r.points_from_framebuffer(&fb, true).count(), 0);
        assert_eq!(
            r.points_from_framebuffer(&fb, false).count(),
            r.pixel_count()
        );
    }

    #[test]
    fn test_lit_points_are_top_left_origin() {
        let r = Resolution(64, 32);
        let mut fb = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        fb[0][0] = 1;
        fb[31][63] = 1;
        let points: Vec<_> = r.points_from_framebuffer(&fb, true).collect();
        assert_eq!(points, vec![(0.0, 0.0), (63.0, -31.0)]);
    }

    #[test]
    fn test_dummy_display_counts() {
        let mut d = DummyDisplay::new();
        let mut fb = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        fb[4][4] = 1;
        d.draw(&fb).unwrap();
        assert_eq!(d.frames_drawn, 1);
        assert_eq!(d.last_lit, 1);
    }

    #[test]
    fn test_render_fits_full_size_terminal() -> Result<(), io::Error> {
        let mut terminal = Terminal::new(TestBackend::new(80, 40))?;
        let r = Resolution(64, 32);
        render(&mut terminal, &r, &glyph_framebuffer())?;
        let buffer = terminal.backend().buffer();
        // border corner, then the title
        assert_eq!(buffer.get(0, 0).symbol, "┌");
        assert_eq!(buffer.get(1, 0).symbol, "C");
        // bottom-right border at 65x33, nothing drawn beyond it
        assert_eq!(buffer.get(65, 33).symbol, "┘");
        assert_eq!(buffer.get(70, 36).symbol, " ");
        Ok(())
    }

    #[test]
    fn test_render_on_small_terminal_doesnt_panic() -> Result<(), io::Error> {
        for (w, h) in [(80, 24), (40, 10), (20, 5)] {
            let mut terminal = Terminal::new(TestBackend::new(w, h))?;
            let r = Resolution(64, 32);
            render(&mut terminal, &r, &glyph_framebuffer())?;
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 24))?;
        render(&mut terminal, &Resolution(64, 32), &glyph_framebuffer())?;
        // the box is cut short at the bottom of the terminal
        assert_eq!(terminal.backend().buffer().get(65, 0).symbol, "┐");
        Ok(())
    }
}
