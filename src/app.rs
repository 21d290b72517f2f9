use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

use crate::classify::KeyStroke;
use crate::runtime::is_keypress;
use crate::tally::KeyTally;
use crate::timer::Deadline;

/// How long the total stays highlighted after a keypress
pub const FLASH_DURATION: Duration = Duration::from_millis(300);

/// Widest the note may grow, in terminal columns
pub const NOTE_MAX_WIDTH: usize = 60;

/// Where keypresses go. Keys typed into the note are never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Counter,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub tally: KeyTally,
    pub focus: Focus,
    pub note: String,
    pub show_chart: bool,
    flash: Deadline,
}

impl App {
    pub fn new(tally: KeyTally, show_chart: bool) -> Self {
        Self {
            tally,
            focus: Focus::Counter,
            note: String::new(),
            show_chart,
            flash: Deadline::new(FLASH_DURATION),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant, wall: DateTime<Local>) -> Action {
        if !is_keypress(key) {
            return Action::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Action::Quit,
                KeyCode::Char('r') => {
                    self.reset();
                    return Action::Continue;
                }
                _ => {}
            }
        }

        match self.focus {
            Focus::Counter => match key.code {
                KeyCode::Tab | KeyCode::BackTab => self.focus = Focus::Note,
                _ => {
                    self.tally.record(&KeyStroke::from(key), now, wall);
                    self.flash.arm(now);
                }
            },
            Focus::Note => self.edit_note(key),
        }

        Action::Continue
    }

    fn edit_note(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::Counter;
            }
            KeyCode::Backspace => {
                self.note.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut next = self.note.clone();
                next.push(c);
                if next.width() <= NOTE_MAX_WIDTH {
                    self.note = next;
                }
            }
            _ => {}
        }
    }

    /// Advance timers. Returns true when something visible changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let closed = self.tally.on_tick(now);
        let flash_ended = self.flash.poll(now);
        closed || flash_ended
    }

    pub fn reset(&mut self) {
        self.flash.cancel();
        self.tally.reset();
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_pending()
    }
}
