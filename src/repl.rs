//! Interactive prompt with raw-mode line editing and live suggestions.
//!
//! The prompt owns the wall clock: every tick it advances the bar
//! counter, pumps deferred work, drains engine chatter above the input
//! line, and repaints. Suggestions refresh after a short quiet period
//! so the hint strip does not churn on every keystroke.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use crate::autocomplete::{Debounce, SuggestionItem};
use crate::config::StoreConfig;
use crate::engine::{Engine, MemorySink};
use crate::synth::SilentBank;

const PROMPT: &str = "🛒 ";
// The cart emoji renders double-width in every terminal that matters.
const PROMPT_COLS: u16 = 3;
const HINT_LIMIT: usize = 4;

enum KeyResult {
    Continue,
    Submit,
    Quit,
}

/// Terminal front end over an [`Engine`].
pub struct Repl {
    engine: Engine,
    sink: MemorySink,
    input: String,
    cursor: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
    suggestions: Vec<SuggestionItem>,
    debounce: Debounce,
    next_bar: Instant,
}

impl Repl {
    pub fn new(config: StoreConfig) -> Self {
        let sink = MemorySink::new();
        let mut engine = Engine::new(
            config,
            Box::new(SilentBank::new()),
            Box::new(sink.clone()),
        );
        engine.state_mut().transport.start();
        let debounce = Debounce::new(Duration::from_millis(
            engine.config().autocomplete.debounce_ms,
        ));
        let next_bar = Instant::now() + engine.state().transport.bar_duration();
        Repl {
            engine,
            sink,
            input: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_pos: None,
            suggestions: Vec::new(),
            debounce,
            next_bar,
        }
    }

    /// Run until the performer quits with Ctrl+C, Ctrl+D, or `exit`.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        let result = self.run_loop();
        disable_raw_mode()?;
        println!();
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = io::stdout();
        self.banner(&mut out)?;
        let mut dirty = true;
        loop {
            let now = Instant::now();
            self.advance_clock(now);
            if self.debounce.ready(now) {
                self.refresh_suggestions();
                dirty = true;
            }
            if self.drain_log(&mut out)? {
                dirty = true;
            }
            if dirty {
                self.draw(&mut out)?;
                dirty = false;
            }
            // 50ms keeps swap settles within a frame of their due time.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    dirty = true;
                    match self.handle_key(key) {
                        KeyResult::Continue => {}
                        KeyResult::Submit => {
                            if self.submit(&mut out)? {
                                break;
                            }
                        }
                        KeyResult::Quit => break,
                    }
                }
            }
        }
        Ok(())
    }

    fn banner(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            Print("🛒 Welcome to the supermarket. The store is open.\r\n"),
            Print("Type commands like [0] add beer. Tab completes, Ctrl+C leaves.\r\n"),
        )?;
        out.flush()
    }

    /// Fire any bar boundaries we have crossed, then pump deferred work.
    fn advance_clock(&mut self, now: Instant) {
        while now >= self.next_bar {
            let at = self.next_bar;
            if self.engine.state().transport.is_running() {
                self.engine.on_bar_at(at);
            }
            self.next_bar += self.engine.state().transport.bar_duration();
        }
        self.engine.pump_at(now);
    }

    /// Print anything the engine said since last tick. Returns true if
    /// the prompt line needs repainting.
    fn drain_log(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let lines = self.sink.messages();
        if lines.is_empty() {
            return Ok(false);
        }
        self.sink.clear();
        queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for line in lines {
            queue!(out, Print(line), Print("\r\n"))?;
        }
        out.flush()?;
        Ok(true)
    }

    fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(PROMPT),
            Print(&self.input),
        )?;
        if let Some(hint) = self.hint_line() {
            queue!(
                out,
                SetAttribute(Attribute::Dim),
                Print(hint),
                SetAttribute(Attribute::Reset),
            )?;
        }
        queue!(out, cursor::MoveToColumn(self.cursor_column()))?;
        out.flush()
    }

    fn hint_line(&self) -> Option<String> {
        if self.suggestions.is_empty() {
            return None;
        }
        let shown: Vec<&str> = self
            .suggestions
            .iter()
            .take(HINT_LIMIT)
            .map(|item| item.text.as_str())
            .collect();
        Some(format!("   ⇥ {}", shown.join(" · ")))
    }

    fn cursor_column(&self) -> u16 {
        PROMPT_COLS + self.input[..self.cursor].chars().count() as u16
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyResult::Quit,
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyResult::Quit,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.cursor = 0;
                self.suggestions.clear();
                KeyResult::Continue
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
                KeyResult::Continue
            }
            KeyCode::Backspace => {
                self.delete_char();
                KeyResult::Continue
            }
            KeyCode::Left => {
                self.cursor_left();
                KeyResult::Continue
            }
            KeyCode::Right => {
                self.cursor_right();
                KeyResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                KeyResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.input.len();
                KeyResult::Continue
            }
            KeyCode::Up => {
                self.history_prev();
                KeyResult::Continue
            }
            KeyCode::Down => {
                self.history_next();
                KeyResult::Continue
            }
            KeyCode::Tab => {
                self.accept_first();
                KeyResult::Continue
            }
            KeyCode::Esc => {
                self.suggestions.clear();
                self.history_pos = None;
                KeyResult::Continue
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::Continue,
        }
    }

    fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.debounce.touch(Instant::now());
    }

    fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.input.remove(start);
        self.cursor = start;
        self.debounce.touch(Instant::now());
    }

    fn cursor_left(&mut self) {
        if let Some((i, _)) = self.input[..self.cursor].char_indices().next_back() {
            self.cursor = i;
        }
    }

    fn cursor_right(&mut self) {
        if let Some(c) = self.input[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => self.history.len() - 1,
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.input = self.history[pos].clone();
        self.cursor = self.input.len();
        self.suggestions.clear();
    }

    fn history_next(&mut self) {
        match self.history_pos {
            Some(p) if p + 1 < self.history.len() => {
                self.history_pos = Some(p + 1);
                self.input = self.history[p + 1].clone();
            }
            Some(_) => {
                self.history_pos = None;
                self.input.clear();
            }
            None => return,
        }
        self.cursor = self.input.len();
        self.suggestions.clear();
    }

    /// Tab: complete with the top suggestion.
    fn accept_first(&mut self) {
        if self.suggestions.is_empty() {
            self.refresh_suggestions();
        }
        let item = match self.suggestions.first() {
            Some(item) => item.clone(),
            None => return,
        };
        let (text, cursor) = self.engine.accept_suggestion(&self.input, self.cursor, &item);
        self.input = text;
        self.cursor = cursor;
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self.engine.update_suggestions(&self.input, self.cursor);
    }

    /// Execute the current line. Returns true when the performer asked
    /// to leave.
    fn submit(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let line = self.input.trim().to_string();
        queue!(out, Print("\r\n"))?;
        out.flush()?;
        self.input.clear();
        self.cursor = 0;
        self.suggestions.clear();
        self.history_pos = None;
        if line.is_empty() {
            return Ok(false);
        }
        if line == "exit" || line == "quit" {
            return Ok(true);
        }
        if self.history.last().map(String::as_str) != Some(line.as_str()) {
            self.history.push(line.clone());
        }
        self.engine.execute_command(&line);
        self.drain_log(out)?;
        Ok(false)
    }
}
