//! # Live console view.
//!
//! The crossterm-based renderer. It polls [`StateBoard::snapshot`] at the
//! configured cadence and redraws one status line per seat plus a fork
//! strip; `q`, `Esc` or Ctrl-C cancels the shared token to request
//! shutdown. This is the only module that knows about crossterm.
//!
//! The renderer is a pure observer: it never touches the ring or the line,
//! and accepts that a snapshot may mix fields from adjacent instants (the
//! board promises no cross-field consistency — good enough for a status
//! display).
//!
//! Runs as a blocking loop; call it via `tokio::task::spawn_blocking`. The
//! alternate screen and raw mode are restored by an RAII guard even when
//! the loop exits early on an I/O error.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use tokio_util::sync::CancellationToken;

use crate::board::{BoardSnapshot, Phase, StateBoard};

/// Restores the terminal on drop, whatever path the render loop took.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Console renderer for one table run.
pub struct Console {
    board: Arc<StateBoard>,
    refresh: Duration,
}

impl Console {
    /// Creates a renderer over `board`, redrawing every `refresh`.
    pub fn new(board: Arc<StateBoard>, refresh: Duration) -> Self {
        Self { board, refresh }
    }

    /// Runs the render loop until `token` is cancelled.
    ///
    /// A quit key (`q`, `Esc`, Ctrl-C) cancels `token` itself, which both
    /// ends this loop and tells the table to shut down. The token is also
    /// cancelled when the loop exits on a terminal I/O error, so the run
    /// always comes down with its renderer.
    pub fn run(&self, token: &CancellationToken) -> io::Result<()> {
        let res = self.render_loop(token);
        token.cancel();
        res
    }

    fn render_loop(&self, token: &CancellationToken) -> io::Result<()> {
        let _guard = RawModeGuard::enter()?;
        let mut out = io::stdout();

        while !token.is_cancelled() {
            self.draw(&mut out)?;

            // Key polling doubles as the frame timer.
            if event::poll(self.refresh)? {
                if let TermEvent::Key(key) = event::read()? {
                    let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL));
                    if quit {
                        token.cancel();
                    }
                }
            }
        }
        Ok(())
    }

    /// Draws one frame from a board snapshot.
    fn draw(&self, out: &mut Stdout) -> io::Result<()> {
        let snap = self.board.snapshot();

        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        for (seat, cell) in snap.seats.iter().enumerate() {
            queue!(
                out,
                cursor::MoveTo(0, seat as u16),
                Print(format!("Philosopher {seat}: "))
            )?;
            match cell.phase {
                Phase::Thinking => queue!(
                    out,
                    SetForegroundColor(Color::Green),
                    Print(format!("Thinking [{:>3}%]", cell.progress)),
                    ResetColor
                )?,
                Phase::Waiting => queue!(
                    out,
                    SetForegroundColor(Color::Yellow),
                    Print("Waiting for forks"),
                    ResetColor
                )?,
                Phase::Dining => queue!(
                    out,
                    SetForegroundColor(Color::Red),
                    Print(format!("Dining   [{:>3}%]", cell.progress)),
                    ResetColor
                )?,
            }
            queue!(out, Print(format!("   cycles={}", cell.cycles)))?;
        }

        self.draw_forks(out, &snap)?;

        queue!(
            out,
            cursor::MoveTo(0, snap.seats.len() as u16 + 2),
            Print("press q to quit")
        )?;
        out.flush()
    }

    /// Draws the fork availability strip below the seat lines.
    fn draw_forks(&self, out: &mut Stdout, snap: &BoardSnapshot) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(0, snap.seats.len() as u16),
            Print("Forks: ")
        )?;
        for (fork, &free) in snap.forks.iter().enumerate() {
            if free {
                queue!(
                    out,
                    SetForegroundColor(Color::Cyan),
                    Print(format!("[F{fork}: FREE] ")),
                    ResetColor
                )?;
            } else {
                queue!(
                    out,
                    SetForegroundColor(Color::Magenta),
                    Print(format!("[F{fork}: BUSY] ")),
                    ResetColor
                )?;
            }
        }
        Ok(())
    }
}
