use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ikutsu_core::{palette::PALETTE_LEN, view::DrillView, Digit, Intent, Session, DIGIT_PALETTE};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::block_font;

const TITLE: &str = "Ikutsu to Ikutsu";
const OPERAND_GLYPHS: usize = 2;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    target: Color,
    muted: Color,
    success: Color,
    danger: Color,
    on_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            target: Color::Magenta,
            muted: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
            on_accent: Color::Black,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Dispatch(Intent),
    MoveCursor(isize),
    ChooseHighlighted,
    Quit,
}

/// Map a key to an action. `solved` switches Enter from check to next.
pub fn key_action(key: &KeyEvent, solved: bool) -> Option<KeyAction> {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            Digit::from_key(ch).map(|digit| KeyAction::Dispatch(Intent::ChooseDigit(digit)))
        }
        KeyCode::Left | KeyCode::Char('h') => Some(KeyAction::MoveCursor(-1)),
        KeyCode::Right | KeyCode::Char('l') => Some(KeyAction::MoveCursor(1)),
        KeyCode::Char(' ') => Some(KeyAction::ChooseHighlighted),
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('c') => {
            Some(KeyAction::Dispatch(Intent::Clear))
        }
        KeyCode::Enter if solved => Some(KeyAction::Dispatch(Intent::NextProblem)),
        KeyCode::Enter => Some(KeyAction::Dispatch(Intent::CheckAnswer)),
        KeyCode::Char('n') => Some(KeyAction::Dispatch(Intent::NextProblem)),
        _ => None,
    }
}

/// Terminal presentation surface for one drill session.
pub struct DrillApp {
    session: Session,
    cursor: usize,
    status: String,
    should_quit: bool,
    tick_rate: Duration,
    theme: Theme,
}

impl DrillApp {
    pub fn new(session: Session, tick_rate: Duration) -> Self {
        Self {
            session,
            cursor: 0,
            status: "Pick a number, then press Enter to check.".to_string(),
            should_quit: false,
            tick_rate,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx, self.tick_rate);

        let result = self.event_loop(&mut terminal, &mut event_rx).await;
        restore_terminal(&mut terminal)?;
        let stats = self.session.stats();
        info!(
            seen = stats.problems_seen,
            solved = stats.problems_solved,
            attempts = stats.attempts,
            "Session finished"
        );
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        event_rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break,
            }
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let solved = self.session.snapshot().is_accepted();
        let Some(action) = key_action(&key, solved) else {
            return;
        };
        debug!(?action, "Key action");
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::MoveCursor(delta) => self.move_cursor(delta),
            KeyAction::ChooseHighlighted => {
                let digit = DIGIT_PALETTE[self.cursor];
                self.dispatch(Intent::ChooseDigit(digit));
            }
            KeyAction::Dispatch(intent) => self.dispatch(intent),
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        let was_solved = self.session.snapshot().is_accepted();
        let state = *self.session.dispatch(intent);
        let advanced = was_solved && matches!(intent, Intent::NextProblem);
        match intent {
            Intent::ChooseDigit(digit) if !was_solved => self.cursor = digit.palette_index(),
            Intent::NextProblem if advanced => self.cursor = 0,
            _ => {}
        }

        self.status = match (advanced, state.feedback(), state.selected()) {
            (true, _, _) => "New problem!".to_string(),
            (false, Some(feedback), _) => feedback.text().to_string(),
            (false, None, Some(digit)) => format!("Selected {digit}. Press Enter to check."),
            (false, None, None) => "Pick a number, then press Enter to check.".to_string(),
        };
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.session.snapshot().is_accepted() {
            return;
        }
        let len = PALETTE_LEN as isize;
        let next = (self.cursor as isize + delta).rem_euclid(len);
        self.cursor = next as usize;
    }

    fn draw(&self, frame: &mut Frame) {
        let view = DrillView::from_state(self.session.snapshot());
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(block_font::FONT_HEIGHT as u16 + 2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        self.render_title(frame, layout[0]);
        self.render_prompt(frame, layout[1], &view);
        self.render_operands(frame, layout[2], &view);
        self.render_feedback(frame, layout[3], &view);
        self.render_palette(frame, layout[4], &view);
        self.render_controls(frame, layout[5], &view);
        self.render_status(frame, layout[6], &view);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center);
        frame.render_widget(title, area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        let style = if view.solved {
            Style::default()
                .fg(self.theme.success)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.primary_fg)
        };
        let prompt = Paragraph::new(Line::from(Span::styled(view.prompt.clone(), style)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(prompt, area);
    }

    fn render_operands(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        let box_width = block_font::width_for(OPERAND_GLYPHS) as u16 + 4;
        let sign_width = block_font::width_for(1) as u16 + 2;
        let total = box_width * 3 + sign_width * 2;
        let row = centered_rect(total, area.height, area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(box_width),
                Constraint::Length(sign_width),
                Constraint::Length(box_width),
                Constraint::Length(sign_width),
                Constraint::Length(box_width),
            ])
            .split(row);

        let given_color = if view.solved {
            self.theme.success
        } else {
            self.theme.accent
        };
        let selected_color = match (view.solved, view.selected) {
            (true, _) => self.theme.success,
            (false, Some(_)) => self.theme.accent,
            (false, None) => self.theme.muted,
        };

        self.render_operand_box(
            frame,
            columns[0],
            &view.given.to_string(),
            given_color,
            false,
        );
        self.render_sign(frame, columns[1], "+");
        self.render_operand_box(
            frame,
            columns[2],
            &view.selected_label(),
            selected_color,
            !view.solved,
        );
        self.render_sign(frame, columns[3], "=");
        self.render_operand_box(
            frame,
            columns[4],
            &view.target.to_string(),
            self.theme.target,
            false,
        );
    }

    fn render_operand_box(
        &self,
        frame: &mut Frame,
        area: Rect,
        text: &str,
        color: Color,
        active: bool,
    ) {
        let lines: Vec<Line> = block_font::render(text)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(color))))
            .collect();
        let border_style = if active {
            Style::default()
                .fg(self.theme.target)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_sign(&self, frame: &mut Frame, area: Rect, sign: &str) {
        let mut lines = vec![Line::from("")];
        lines.extend(
            block_font::render(sign)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.muted)))),
        );
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_feedback(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        let Some(feedback) = view.feedback else {
            return;
        };
        let (icon, color) = if feedback.is_correct() {
            ("✔", self.theme.success)
        } else {
            ("✘", self.theme.danger)
        };
        let banner = Paragraph::new(Line::from(vec![
            Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                feedback.text(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center);
        frame.render_widget(banner, area);
    }

    fn render_palette(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        if view.palette.is_empty() {
            let next = Paragraph::new(Line::from(Span::styled(
                "Press Enter for the next problem!",
                Style::default()
                    .fg(self.theme.target)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(next, area);
            return;
        }

        let mut spans = Vec::with_capacity(view.palette.len() * 2);
        for (index, button) in view.palette.iter().enumerate() {
            let mut style = if button.selected {
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.target)
                    .add_modifier(Modifier::BOLD)
            } else if button.enabled {
                Style::default().fg(self.theme.primary_fg)
            } else {
                Style::default().fg(self.theme.muted)
            };
            if index == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {:>2} ", button.digit.value()), style));
            spans.push(Span::raw(" "));
        }
        let palette = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Numbers"))
            .alignment(Alignment::Center);
        frame.render_widget(palette, area);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        let key_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        if view.controls.show_clear {
            spans.push(Span::styled("[Bksp]", key_style));
            spans.push(Span::raw(" Clear  "));
        }
        if view.controls.show_check {
            let style = if view.controls.check_enabled {
                key_style
            } else {
                Style::default().fg(self.theme.muted)
            };
            spans.push(Span::styled("[Enter]", style));
            spans.push(Span::styled(" Check  ", style));
        }
        if view.controls.show_next {
            spans.push(Span::styled("[Enter]", key_style));
            spans.push(Span::raw(" Next problem  "));
        }
        spans.push(Span::styled("[q]", key_style));
        spans.push(Span::raw(" Quit"));
        let controls = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(controls, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, view: &DrillView) {
        let stats = self.session.stats();
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = format!(
            "Solved {} of {}  ·  Checks {}",
            stats.problems_solved, stats.problems_seen, stats.attempts
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(secondary),
            Line::from(Span::styled(view.hint, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>, tick_rate: Duration) {
    thread::spawn(move || loop {
        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
