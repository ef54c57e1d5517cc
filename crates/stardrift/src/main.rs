use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};
use stardrift_config::Config;
use stardrift_core::SurfaceSize;
use stardrift_field::{FieldState, FrameScheduler};

mod logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Some(path) = logging::init()? {
        log::info!("logging to {}", path.display());
    }
    let config = Config::load()?;
    let (cols, rows) = crossterm::terminal::size()?;

    let terminal = ratatui::init();
    let result = App::new(config, Rect::new(0, 0, cols, rows)).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Is the animation paused?
    paused: bool,
    config: Config,
    /// Host of the per-frame callbacks.
    scheduler: FrameScheduler,
    /// The mounted background.
    field: FieldState,
    rng: StdRng,
    /// Terminal size in pixels.
    viewport: SurfaceSize,
    /// Reference point for frame timestamps.
    started: Instant,
    /// Transient message shown in the status line.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`] and mount the configured background.
    pub fn new(config: Config, area: Rect) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scheduler = FrameScheduler::new();
        let viewport = SurfaceSize::from_cells(area);
        let field = FieldState::mount(&config, None, viewport, &scheduler, &mut rng);
        Self {
            running: false,
            paused: false,
            config,
            scheduler,
            field,
            rng,
            viewport,
            started: Instant::now(),
            status: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let interval = Duration::from_millis(self.config.frame_interval_ms());
        let mut next_frame = Instant::now();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            let timeout = next_frame.saturating_duration_since(Instant::now());
            self.handle_crossterm_events(timeout)?;

            let now = Instant::now();
            if now >= next_frame {
                self.run_due_frames();
                next_frame += interval;
                // Skip missed refreshes instead of bursting to catch up
                if next_frame < now {
                    next_frame = now + interval;
                }
            }
        }

        self.field.unmount();
        Ok(())
    }

    /// Fire every frame callback due on this refresh.
    fn run_due_frames(&mut self) {
        let due = self.scheduler.take_due();
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.field.run_frame(&due, now_ms, &self.scheduler, &mut self.rng);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.field.resize(Some(SurfaceSize::from_cells(area)), self.viewport);
        self.field.render(frame, area);

        let color = self.config.palette.accent();
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Background only
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let mut status = vec![
            self.config.style.name().bold().fg(color),
            "  ".into(),
            self.config.palette.name().fg(color),
        ];
        if self.paused {
            status.push("  paused".dark_gray());
        }
        if let Some(message) = &self.status {
            status.push(format!("  {message}").dark_gray());
        }
        frame.render_widget(Line::from(status).centered(), chunks[1]);

        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "s".bold().fg(color),
            " style  ".dark_gray(),
            "p".bold().fg(color),
            " palette  ".dark_gray(),
            "r".bold().fg(color),
            " reseed  ".dark_gray(),
            "space".bold().fg(color),
            " pause  ".dark_gray(),
            "w".bold().fg(color),
            " save".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[2]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next frame is not delayed.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.cycle_style(),
            (_, KeyCode::Char('p')) => self.cycle_palette(),
            (_, KeyCode::Char('r')) => self.reseed(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('w')) => self.save_config(),
            _ => {}
        }
    }

    /// Apply a new terminal size to the surface.
    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.viewport = SurfaceSize::from_cells(Rect::new(0, 0, cols, rows));
        self.field.resize(Some(self.viewport), self.viewport);
    }

    /// Tear down the current background and mount the next style.
    fn cycle_style(&mut self) {
        self.config.style = self.config.style.next();
        let container = Some(self.field.surface());
        self.field.unmount();
        self.field = FieldState::mount(
            &self.config,
            container,
            self.viewport,
            &self.scheduler,
            &mut self.rng,
        );
        if self.paused {
            self.field.pause();
        }
        self.status = None;
    }

    /// Cycle through available palettes.
    fn cycle_palette(&mut self) {
        self.config.palette = self.config.palette.next();
        self.field.set_palette(self.config.palette);
    }

    /// Rebuild the particles with fresh random parameters.
    fn reseed(&mut self) {
        self.field.reconfigure(&self.config, &mut self.rng);
    }

    /// Pause or resume the frame loop.
    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.field.pause();
        } else {
            self.field.resume(&self.scheduler);
        }
    }

    /// Write the current configuration to disk.
    fn save_config(&mut self) {
        self.status = Some(match self.config.save() {
            Ok(path) => format!("saved {}", path.display()),
            Err(err) => {
                log::error!("failed to save config: {err:#}");
                "save failed".to_string()
            }
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
