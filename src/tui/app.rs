use std::borrow::Cow;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, KeyModifiers};
use log::{debug, info};
use ratatui::{
    buffer::Buffer,
    crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind},
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{
        palette::{
            material::{AMBER, BLUE, GREEN, RED},
            tailwind::SLATE,
        },
        Color, Modifier, Style, Stylize,
    },
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph,
        StatefulWidget, Widget, Wrap,
    },
    DefaultTerminal, Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tasks::{Task, TaskId, TaskList};

const TODO_HEADER_STYLE: Style = Style::new().fg(SLATE.c100).bg(BLUE.c800);
const NORMAL_ROW_BG: Color = SLATE.c950;
const ALT_ROW_BG_COLOR: Color = SLATE.c900;
const SELECTED_STYLE: Style = Style::new().bg(SLATE.c800).add_modifier(Modifier::BOLD);
const TEXT_FG_COLOR: Color = SLATE.c200;
const COMPLETED_TEXT_FG_COLOR: Color = GREEN.c500;
const EDITING_BORDER_COLOR: Color = AMBER.c400;
const NOTIFICATION_BORDER_COLOR: Color = RED.c400;

const INPUT_PLACEHOLDER: &str = "add a new task";
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Blocking message shown over the list until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    fn error(message: impl Into<String>) -> Self {
        Self {
            title: "error".to_string(),
            message: message.into(),
        }
    }
}

pub struct App {
    tasks: TaskList,
    state: ListState,
    input: String,
    input_mode: InputMode,
    hide_completed: bool,
    notification: Option<Notification>,
    exit: bool,
}

const fn alternate_colors(i: usize) -> Color {
    if i % 2 == 0 {
        NORMAL_ROW_BG
    } else {
        ALT_ROW_BG_COLOR
    }
}

impl App {
    pub fn new(tasks: TaskList, hide_completed: bool) -> Self {
        Self {
            tasks,
            state: ListState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            hide_completed,
            notification: None,
            exit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(
            "event=tui_start module=tui status=ok tasks={} hide_completed={}",
            self.tasks.len(),
            self.hide_completed
        );
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        info!("event=tui_exit module=tui status=ok tasks={}", self.tasks.len());
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(&mut *self, area);
        if let Some(position) = self.cursor_position(area) {
            frame.set_cursor_position(position);
        }
    }

    /// Cursor cell at the end of the typed text; `None` unless editing without a popup.
    fn cursor_position(&self, area: Rect) -> Option<Position> {
        if self.input_mode != InputMode::Editing || self.notification.is_some() {
            return None;
        }
        let [_, _, _, input_area, _] = Self::layout(area);
        let inner = Self::input_block().inner(input_area);
        if inner.is_empty() {
            return None;
        }
        let typed = self.input_display(inner.width).width();
        let offset = u16::try_from(typed).unwrap_or(u16::MAX);
        let x = inner
            .x
            .saturating_add(offset)
            .min(inner.right().saturating_sub(1));
        Some(Position::new(x, inner.y))
    }

    /// The part of the input buffer that fits the box, leaving one cell for the cursor.
    fn input_display(&self, inner_width: u16) -> Cow<'_, str> {
        tail_to_width(&self.input, usize::from(inner_width).saturating_sub(1))
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)
            }
            _ => Ok(()),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.notification.take().is_some() {
            debug!("event=notification_dismiss module=tui status=ok");
            return Ok(());
        }
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key_event),
            InputMode::Editing => self.handle_editing_key(key_event),
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => self.exit(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_previous(),
            KeyCode::Char('g') => self.state.select_first(),
            KeyCode::Char('G') => self.state.select_last(),
            KeyCode::Esc => self.state.select(None),
            KeyCode::Char('a') | KeyCode::Char('i') => self.input_mode = InputMode::Editing,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('h') => self.toggle_hide_completed(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }

    fn submit_input(&mut self) {
        match self.tasks.add(self.input.as_str()) {
            Ok(_) => self.input.clear(),
            Err(err) => self.notification = Some(Notification::error(err.to_string())),
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.tasks.toggle_completion(id);
            self.clamp_selection();
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.tasks.delete(id);
            self.clamp_selection();
        }
    }

    fn toggle_hide_completed(&mut self) {
        self.hide_completed = !self.hide_completed;
        debug!(
            "event=filter_toggle module=tui status=ok hide_completed={}",
            self.hide_completed
        );
        self.clamp_selection();
    }

    fn visible(&self) -> Vec<&Task> {
        self.tasks.visible_list(self.hide_completed)
    }

    /// Keeps the selection inside the visible list; `select_last` parks it at `usize::MAX`.
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        match self.state.selected() {
            Some(_) if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn selected_id(&mut self) -> Option<TaskId> {
        self.clamp_selection();
        let index = self.state.selected()?;
        self.visible().get(index).map(|task| task.id)
    }

    fn selected_task(&self) -> Option<&Task> {
        let visible = self.visible();
        let index = self.state.selected()?.min(visible.len().checked_sub(1)?);
        visible.get(index).copied()
    }

    fn layout(area: Rect) -> [Rect; 5] {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area)
    }

    fn render_header(area: Rect, buf: &mut Buffer) {
        Paragraph::new("task manager")
            .bold()
            .centered()
            .render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let hints = match self.input_mode {
            InputMode::Normal => {
                "a add, space toggle, d delete, h filter, jk move, g/G top/bottom, q quit"
            }
            InputMode::Editing => "Enter to add, Esc to stop editing",
        };
        Paragraph::new(hints).centered().render(area, buf);
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .title(
                Line::raw(format!(
                    "{} of {} remaining",
                    self.tasks.remaining(),
                    self.tasks.len()
                ))
                .centered(),
            )
            .borders(Borders::TOP)
            .border_set(symbols::border::EMPTY)
            .border_style(TODO_HEADER_STYLE)
            .bg(NORMAL_ROW_BG);

        let items: Vec<ListItem> = self
            .visible()
            .into_iter()
            .enumerate()
            .map(|(i, task)| ListItem::from(task).bg(alternate_colors(i)))
            .collect();

        if items.is_empty() {
            let message = if self.tasks.is_empty() {
                "nothing to do"
            } else {
                "all done"
            };
            Paragraph::new(message.fg(TEXT_FG_COLOR).italic())
                .centered()
                .block(block)
                .render(area, buf);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(SELECTED_STYLE)
            .highlight_symbol(">")
            .highlight_spacing(HighlightSpacing::Always);

        // `Widget` and `StatefulWidget` both define `render`.
        StatefulWidget::render(list, area, buf, &mut self.state);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let [created, filter] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)]).areas(area);

        if let Some(task) = self.selected_task() {
            let added = task.created_at.with_timezone(&Local).format("%H:%M:%S");
            Paragraph::new(format!(" added {added}").dim()).render(created, buf);
        }

        let label = if self.hide_completed {
            "show completed"
        } else {
            "hide completed"
        };
        Paragraph::new(Line::from(vec!["<h> ".blue().bold(), label.into()]))
            .right_aligned()
            .render(filter, buf);
    }

    fn input_block() -> Block<'static> {
        Block::bordered().title(" new task ")
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let mut block = Self::input_block();
        if self.input_mode == InputMode::Editing {
            block = block.border_style(Style::new().fg(EDITING_BORDER_COLOR));
        }
        let text: Span = if self.input.is_empty() {
            INPUT_PLACEHOLDER.dim()
        } else {
            self.input_display(block.inner(area).width).into()
        };
        Paragraph::new(text).block(block).render(area, buf);
    }

    fn render_notification(notification: &Notification, area: Rect, buf: &mut Buffer) {
        let width = u16::try_from(notification.message.width().saturating_add(6))
            .unwrap_or(u16::MAX)
            .max(30)
            .min(area.width);
        let area = popup_area(area, width, 5);
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", notification.title)).centered())
            .border_style(Style::new().fg(NOTIFICATION_BORDER_COLOR));
        let text = Text::from(vec![
            Line::from(notification.message.as_str()),
            Line::from("press any key".dim()),
        ]);
        Clear.render(area, buf);
        Paragraph::new(text)
            .centered()
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Tail of `text` fitting in `max_width` columns, prefixed with an ellipsis when cut.
fn tail_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let width = c.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        start = i;
    }
    Cow::Owned(format!("{ELLIPSIS}{}", &text[start..]))
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [header, list, status, input, footer] = App::layout(area);
        App::render_header(header, buf);
        self.render_list(list, buf);
        self.render_status(status, buf);
        self.render_input(input, buf);
        self.render_footer(footer, buf);
        if let Some(notification) = &self.notification {
            App::render_notification(notification, area, buf);
        }
    }
}

impl From<&Task> for ListItem<'_> {
    fn from(value: &Task) -> Self {
        let line = if value.completed {
            Line::styled(
                format!(" ☑ {}", value.text()),
                Style::new()
                    .fg(COMPLETED_TEXT_FG_COLOR)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            Line::styled(format!(" ☐ {}", value.text()), TEXT_FG_COLOR)
        };
        ListItem::new(line)
    }
}
