/// Terminal-based ASCII viewer for PLY meshes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use plyview_core::{Camera, CameraCommand, ViewerContext};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Camera(CameraCommand),
    Quit,
}

/// Arrows rotate, Shift+arrows pan, `+`/`-` zoom, `r` resets, `q`/Esc quit.
pub fn key_action(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char('+') | KeyCode::Char('=') => CameraCommand::ZoomIn,
        KeyCode::Char('-') => CameraCommand::ZoomOut,
        KeyCode::Char('r') => CameraCommand::Reset,
        KeyCode::Up if shift => CameraCommand::PanUp,
        KeyCode::Down if shift => CameraCommand::PanDown,
        KeyCode::Left if shift => CameraCommand::PanLeft,
        KeyCode::Right if shift => CameraCommand::PanRight,
        KeyCode::Up => CameraCommand::RotateUp,
        KeyCode::Down => CameraCommand::RotateDown,
        KeyCode::Left => CameraCommand::RotateLeft,
        KeyCode::Right => CameraCommand::RotateRight,
        _ => return None,
    };
    Some(KeyAction::Camera(command))
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    context: ViewerContext,
    renderer: AsciiRenderer,
    width: u16,
    height: u16,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Fails if the mesh has a face pointing past its vertex list.
    pub fn new(context: ViewerContext) -> io::Result<Self> {
        context
            .mesh()
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let (width, height) = terminal::size()?;

        Ok(Self {
            context,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            width,
            height,
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => match key_action(code, modifiers) {
                Some(KeyAction::Quit) => self.running = false,
                Some(KeyAction::Camera(command)) => {
                    debug!(?command, "Camera command");
                    self.context.apply(command);
                    self.dirty = true;
                }
                None => {}
            },
            Event::Resize(width, height) => {
                self.width = width;
                self.height = height;
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let camera = Camera::from_context(&self.context, self.width as u32, self.height as u32);

        self.renderer.clear();
        self.context
            .mesh()
            .draw(&mut self.renderer.frame(&camera))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "PLYView | {} faces | FPS: {:.1} | Arrows=Rotate Shift+Arrows=Pan +/-=Zoom R=Reset Q=Quit",
                self.context.mesh().faces().len(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_bindings() {
        assert_eq!(
            key_action(KeyCode::Up, KeyModifiers::NONE),
            Some(KeyAction::Camera(CameraCommand::RotateUp))
        );
        assert_eq!(
            key_action(KeyCode::Up, KeyModifiers::SHIFT),
            Some(KeyAction::Camera(CameraCommand::PanUp))
        );
        assert_eq!(
            key_action(KeyCode::Right, KeyModifiers::SHIFT | KeyModifiers::CONTROL),
            Some(KeyAction::Camera(CameraCommand::PanRight))
        );
        assert_eq!(
            key_action(KeyCode::Left, KeyModifiers::NONE),
            Some(KeyAction::Camera(CameraCommand::RotateLeft))
        );
    }

    #[test]
    fn test_zoom_and_quit_bindings() {
        assert_eq!(
            key_action(KeyCode::Char('+'), KeyModifiers::SHIFT),
            Some(KeyAction::Camera(CameraCommand::ZoomIn))
        );
        assert_eq!(
            key_action(KeyCode::Char('-'), KeyModifiers::NONE),
            Some(KeyAction::Camera(CameraCommand::ZoomOut))
        );
        assert_eq!(
            key_action(KeyCode::Esc, KeyModifiers::NONE),
            Some(KeyAction::Quit)
        );
        assert_eq!(key_action(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }
}
