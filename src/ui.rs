use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::error;

use crate::app::App;
use crate::error::StoreError;
use crate::store::KeyValueStore;
use crate::todo::{TodoId, TodoItem};

const HANDLE: &str = "⠿";
const DELETE: &str = "✕";
// handle, space, "[x]", space
const TITLE_COLUMN: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    from: usize,
    hover: Option<usize>,
}

/// Screen areas from the last draw, used to hit-test mouse events.
#[derive(Debug, Default, Clone, Copy)]
struct HitAreas {
    input: Rect,
    button: Rect,
    rows: Rect,
    offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTarget {
    Handle,
    Body,
    Delete,
}

/// View-local state: focus, selection and any drag in progress. Model state lives in [`App`].
pub struct View {
    focus: Focus,
    selected: Option<TodoId>,
    selected_hint: usize,
    drag: Option<Drag>,
    areas: HitAreas,
    list_state: ListState,
    dirty: Rc<Cell<bool>>,
    quit: bool,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            focus: Focus::Input,
            selected: None,
            selected_hint: 0,
            drag: None,
            areas: HitAreas::default(),
            list_state: ListState::default(),
            dirty: Rc::new(Cell::new(true)),
            quit: false,
        }
    }

    /// Redraw whenever the controller reports a change.
    pub fn attach<S: KeyValueStore>(&self, app: &mut App<S>) {
        let dirty = Rc::clone(&self.dirty);
        app.subscribe(move |_| dirty.set(true));
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    fn select(&mut self, items: &[TodoItem], index: usize) {
        if let Some(item) = items.get(index) {
            self.selected = Some(item.id);
            self.selected_hint = index;
        }
    }

    /// Index of the selected item, falling back to the nearest row when it was removed.
    fn selected_index(&mut self, items: &[TodoItem]) -> Option<usize> {
        if let Some(index) = self
            .selected
            .and_then(|id| items.iter().position(|t| t.id == id))
        {
            self.selected_hint = index;
            return Some(index);
        }
        if items.is_empty() {
            self.selected = None;
            return None;
        }
        let index = self.selected_hint.min(items.len() - 1);
        self.select(items, index);
        Some(index)
    }

    fn row_at(&self, column: u16, row: u16, len: usize) -> Option<(usize, RowTarget)> {
        let rows = self.areas.rows;
        if !rows.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.areas.offset + usize::from(row - rows.y);
        if index >= len {
            return None;
        }
        let col = column - rows.x;
        let target = if col + 1 >= rows.width {
            RowTarget::Delete
        } else if col < 2 {
            RowTarget::Handle
        } else {
            RowTarget::Body
        };
        Some((index, target))
    }

    /// Turns one terminal event into controller calls.
    pub fn handle_event<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        event: Event,
    ) -> Result<(), StoreError> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(app, key),
            Event::Mouse(mouse) => self.handle_mouse(app, mouse),
            Event::Resize(..) => {
                self.dirty.set(true);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        key: KeyEvent,
    ) -> Result<(), StoreError> {
        self.dirty.set(true);
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return Ok(());
        }
        if app.pending_delete().is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.resolve_delete(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.resolve_delete(false)
                }
                _ => Ok(()),
            };
        }
        if let Some(drag) = self.drag {
            if key.code == KeyCode::Esc {
                self.drag = None;
                return app.on_reorder(drag.from, None);
            }
        }
        match key.code {
            KeyCode::Esc => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Input => Focus::List,
                    Focus::List => Focus::Input,
                };
                return Ok(());
            }
            _ => {}
        }
        match self.focus {
            Focus::Input => self.handle_input_key(app, key),
            Focus::List => self.handle_list_key(app, key),
        }
    }

    fn handle_input_key<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        key: KeyEvent,
    ) -> Result<(), StoreError> {
        match key.code {
            KeyCode::Enter => app.on_create(),
            KeyCode::Backspace => {
                let mut text = app.input().to_string();
                if text.pop().is_some() {
                    app.on_input_change(text);
                }
                Ok(())
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = app.input().to_string();
                text.push(c);
                app.on_input_change(text);
                Ok(())
            }
            KeyCode::Down => {
                self.focus = Focus::List;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_list_key<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        key: KeyEvent,
    ) -> Result<(), StoreError> {
        let items = app.todos().items().to_vec();
        let Some(index) = self.selected_index(&items) else {
            return Ok(());
        };
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shift => self.reorder_by(app, index, -1),
            KeyCode::Down if shift => self.reorder_by(app, index, 1),
            KeyCode::Char('K') => self.reorder_by(app, index, -1),
            KeyCode::Char('J') => self.reorder_by(app, index, 1),
            KeyCode::Up | KeyCode::Char('k') => {
                if index == 0 {
                    self.focus = Focus::Input;
                } else {
                    self.select(&items, index - 1);
                }
                Ok(())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(&items, index + 1);
                Ok(())
            }
            KeyCode::Home => {
                self.select(&items, 0);
                Ok(())
            }
            KeyCode::End => {
                self.select(&items, items.len() - 1);
                Ok(())
            }
            KeyCode::Char(' ') | KeyCode::Enter => app.on_toggle(items[index].id),
            KeyCode::Char('d') | KeyCode::Delete => app.on_delete(items[index].id),
            _ => Ok(()),
        }
    }

    fn reorder_by<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        index: usize,
        delta: isize,
    ) -> Result<(), StoreError> {
        let to = index
            .checked_add_signed(delta)
            .filter(|to| *to < app.todos().len());
        app.on_reorder(index, to)
    }

    fn handle_mouse<S: KeyValueStore>(
        &mut self,
        app: &mut App<S>,
        mouse: MouseEvent,
    ) -> Result<(), StoreError> {
        if app.pending_delete().is_some() {
            return Ok(());
        }
        let len = app.todos().len();
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dirty.set(true);
                if self.areas.button.contains(pos) {
                    self.focus = Focus::Input;
                    return app.on_create();
                }
                if self.areas.input.contains(pos) {
                    self.focus = Focus::Input;
                    return Ok(());
                }
                let Some((index, target)) = self.row_at(mouse.column, mouse.row, len) else {
                    return Ok(());
                };
                let items = app.todos().items().to_vec();
                self.focus = Focus::List;
                self.select(&items, index);
                let id = items[index].id;
                match target {
                    // Only the delete affordance fires; the row underneath never sees the click.
                    RowTarget::Delete => app.on_delete(id),
                    RowTarget::Handle => {
                        self.drag = Some(Drag {
                            from: index,
                            hover: Some(index),
                        });
                        Ok(())
                    }
                    RowTarget::Body => app.on_toggle(id),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let hover = self.row_at(mouse.column, mouse.row, len).map(|(i, _)| i);
                if let Some(drag) = self.drag.as_mut() {
                    if drag.hover != hover {
                        drag.hover = hover;
                        self.dirty.set(true);
                    }
                }
                Ok(())
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return Ok(());
                };
                self.dirty.set(true);
                let to = self.row_at(mouse.column, mouse.row, len).map(|(i, _)| i);
                app.on_reorder(drag.from, to)
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let items = app.todos().items().to_vec();
                if let Some(index) = self.selected_index(&items) {
                    let next = if mouse.kind == MouseEventKind::ScrollDown {
                        (index + 1).min(items.len() - 1)
                    } else {
                        index.saturating_sub(1)
                    };
                    self.select(&items, next);
                    self.dirty.set(true);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Polls for events until the user quits. Failed writes are logged and the loop carries on.
pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    view: &mut View,
    tick: Duration,
) -> io::Result<()> {
    loop {
        app.sync_external();
        if view.take_dirty() {
            terminal.draw(|f| draw(f, app, view))?;
        }
        if view.should_quit() {
            return Ok(());
        }
        if event::poll(tick)? {
            let event = event::read()?;
            if let Err(err) = view.handle_event(app, event) {
                error!(error = %err, "failed to save todo list");
            }
        }
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>, view: &mut View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(chunks[0]);

    draw_input(f, app, view, top[0]);
    draw_button(f, app, view, top[1]);
    draw_list(f, app, view, chunks[1]);
    draw_hints(f, app, view, chunks[2]);

    if app.pending_delete().is_some() {
        let area = f.area();
        draw_confirm(f, area);
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_input<S: KeyValueStore>(f: &mut Frame, app: &App<S>, view: &mut View, area: Rect) {
    let focused = view.focus == Focus::Input && app.pending_delete().is_none();
    let block = Block::default()
        .title("New todo")
        .borders(Borders::ALL)
        .border_style(focus_border(focused));
    let inner = block.inner(area);
    // leave one column for the cursor after the text
    let visible = input_tail(app.input(), usize::from(inner.width.saturating_sub(1)));
    let cursor = Span::raw(visible).width() as u16;
    f.render_widget(Paragraph::new(visible).block(block), area);
    if focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position(Position::new(inner.x + cursor, inner.y));
    }
    view.areas.input = area;
}

/// The longest suffix of `text` that fits in `max` display columns.
fn input_tail(text: &str, max: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    let mut buf = [0u8; 4];
    for (i, c) in text.char_indices().rev() {
        let w = Span::raw(&*c.encode_utf8(&mut buf)).width();
        if used + w > max {
            break;
        }
        used += w;
        start = i;
    }
    &text[start..]
}

fn draw_button<S: KeyValueStore>(f: &mut Frame, app: &App<S>, view: &mut View, area: Rect) {
    let style = if app.can_create() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };
    let button = Paragraph::new("Create")
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(button, area);
    view.areas.button = area;
}

/// Truncates to `max` display columns, marking the cut with an ellipsis.
fn fit_width(title: &str, max: usize) -> String {
    if Span::raw(title).width() <= max {
        return title.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in title.chars() {
        let w = Span::raw(c.to_string()).width();
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    if max > 0 {
        out.push('…');
    }
    out
}

fn todo_row(item: &TodoItem, width: u16, dragging: bool) -> Line<'static> {
    let available = usize::from(width.saturating_sub(TITLE_COLUMN + 2));
    let title = fit_width(&item.title, available);
    let pad = usize::from(width)
        .saturating_sub(usize::from(TITLE_COLUMN) + Span::raw(title.as_str()).width() + 1);
    let title_style = if item.is_done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let handle_style = if dragging {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(HANDLE, handle_style),
        Span::raw(" "),
        Span::raw(if item.is_done { "[x]" } else { "[ ]" }),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" ".repeat(pad)),
        Span::styled(DELETE, Style::default().fg(Color::Red)),
    ])
}

fn draw_list<S: KeyValueStore>(f: &mut Frame, app: &App<S>, view: &mut View, area: Rect) {
    let items = app.todos().items();
    let done = items.iter().filter(|t| t.is_done).count();
    let block = Block::default()
        .title(format!("Todos ({done}/{})", items.len()))
        .borders(Borders::ALL)
        .border_style(focus_border(view.focus == Focus::List));
    let inner = block.inner(area);

    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let dragging = view.drag.is_some_and(|d| d.from == i);
            let row = ListItem::new(todo_row(item, inner.width, dragging));
            if view.drag.is_some_and(|d| d.hover == Some(i) && d.from != i) {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let selected = view.selected_index(items);
    view.list_state.select(selected);
    let highlight = if view.focus == Focus::List {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(rows).block(block).highlight_style(highlight);
    f.render_stateful_widget(list, area, &mut view.list_state);

    view.areas.rows = inner;
    view.areas.offset = view.list_state.offset();
}

fn draw_hints<S: KeyValueStore>(f: &mut Frame, app: &App<S>, view: &View, area: Rect) {
    let text = if app.pending_delete().is_some() {
        "y: delete  n/Esc: keep"
    } else if view.drag.is_some() {
        "release over a row to drop  Esc: cancel"
    } else {
        match view.focus {
            Focus::Input => "Enter: create  Tab: list  Esc: quit",
            Focus::List => {
                "Space: toggle  d: delete  Shift+↑/↓: move  Tab: input  Esc: quit"
            }
        }
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_confirm(f: &mut Frame, area: Rect) {
    let width = 24.min(area.width);
    let height = 3.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new("Delete this? (y/n)")
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::{MemoryStore, TODOS_KEY};
    use ratatui::backend::TestBackend;

    const WIDTH: u16 = 40;
    const HEIGHT: u16 = 12;

    fn setup(raw: &str, confirm: bool) -> (Terminal<TestBackend>, App<MemoryStore>, View) {
        let mut kv = MemoryStore::new();
        kv.set(TODOS_KEY, raw).unwrap();
        let mut app = App::with_clock(kv, confirm, Box::new(FixedClock(500)));
        let view = View::new();
        view.attach(&mut app);
        app.hydrate();
        let terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        (terminal, app, view)
    }

    fn abc() -> &'static str {
        r#"[{"id":1,"title":"A","isDone":false},{"id":2,"title":"B","isDone":false},{"id":3,"title":"C","isDone":true}]"#
    }

    fn render(terminal: &mut Terminal<TestBackend>, app: &App<MemoryStore>, view: &mut View) -> String {
        terminal.draw(|f| draw(f, app, view)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn titles(app: &App<MemoryStore>) -> Vec<String> {
        app.todos().items().iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn renders_rows_with_checkbox_and_delete() {
        let (mut terminal, app, mut view) = setup(abc(), false);
        let screen = render(&mut terminal, &app, &mut view);
        assert!(screen.contains("⠿ [ ] A"));
        assert!(screen.contains("⠿ [x] C"));
        assert!(screen.contains("Create"));
        assert!(screen.contains("Todos (1/3)"));
        let row = screen.lines().find(|l| l.contains("[ ] A")).unwrap();
        assert!(row.trim_end_matches('│').ends_with(DELETE));
    }

    #[test]
    fn done_title_is_crossed_out() {
        let (mut terminal, app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        let rows = view.areas.rows;
        let cell = &terminal.backend().buffer()[(rows.x + TITLE_COLUMN, rows.y + 2)];
        assert_eq!(cell.symbol(), "C");
        assert!(cell.modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn typing_and_enter_creates_item() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        render(&mut terminal, &app, &mut view);
        for c in "Buy milk".chars() {
            view.handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.input(), "Buy milk");
        view.handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(titles(&app), vec!["Buy milk"]);
        assert_eq!(app.input(), "");
        assert!(render(&mut terminal, &app, &mut view).contains("[ ] Buy milk"));
    }

    #[test]
    fn disabled_button_ignores_clicks() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        render(&mut terminal, &app, &mut view);
        let button = view.areas.button;
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), button.x + 2, button.y + 1),
        )
        .unwrap();
        assert!(app.todos().is_empty());

        app.on_input_change("x");
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), button.x + 2, button.y + 1),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["x"]);
    }

    #[test]
    fn clicking_create_adds_the_item() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        app.on_input_change("x");
        render(&mut terminal, &app, &mut view);
        // the button is the rightmost twelve columns of the top row
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), WIDTH - 6, 1),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["x"]);
        assert_eq!(app.input(), "");
    }

    #[test]
    fn clicking_the_input_box_does_not_create() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        app.on_input_change("x");
        render(&mut terminal, &app, &mut view);
        view.handle_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2, 1))
            .unwrap();
        assert!(app.todos().is_empty());
        assert_eq!(app.input(), "x");
    }

    #[test]
    fn long_input_shows_its_tail_with_cursor_after_it() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        let text = format!("{}end", "a".repeat(100));
        app.on_input_change(text);
        let screen = render(&mut terminal, &app, &mut view);
        let input_row = screen.lines().nth(1).unwrap();
        assert!(input_row.contains("aaaend"));

        let input = view.areas.input;
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor.y, input.y + 1);
        assert_eq!(cursor.x, input.x + input.width - 2);
        assert_eq!(terminal.backend().buffer()[(cursor.x - 1, cursor.y)].symbol(), "d");
    }

    #[test]
    fn input_wider_than_u16_renders() {
        let (mut terminal, mut app, mut view) = setup("[]", false);
        app.on_input_change("z".repeat(70_000));
        let screen = render(&mut terminal, &app, &mut view);
        assert!(screen.lines().nth(1).unwrap().contains("zzzz"));
    }

    #[test]
    fn input_tail_respects_width() {
        assert_eq!(input_tail("hello", 10), "hello");
        assert_eq!(input_tail("hello", 3), "llo");
        assert_eq!(input_tail("hello", 0), "");
        assert_eq!(input_tail("añb", 2), "ñb");
    }

    #[test]
    fn delete_click_does_not_toggle_row() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        let rows = view.areas.rows;
        view.handle_event(
            &mut app,
            mouse(
                MouseEventKind::Down(MouseButton::Left),
                rows.x + rows.width - 1,
                rows.y,
            ),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["B", "C"]);
        assert!(app.todos().items().iter().all(|t| t.id != 1));
        assert!(!app.todos().items()[0].is_done);
    }

    #[test]
    fn row_click_toggles() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        let rows = view.areas.rows;
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), rows.x + 8, rows.y + 1),
        )
        .unwrap();
        assert!(app.todos().items()[1].is_done);
        assert_eq!(view.focus(), Focus::List);
    }

    #[test]
    fn drag_handle_reorders() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        let rows = view.areas.rows;
        view.handle_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), rows.x, rows.y))
            .unwrap();
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Drag(MouseButton::Left), rows.x + 4, rows.y + 2),
        )
        .unwrap();
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Up(MouseButton::Left), rows.x + 4, rows.y + 2),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["B", "C", "A"]);
        assert_eq!(app.store().load().unwrap(), *app.todos());
    }

    #[test]
    fn drop_outside_list_or_escape_cancels() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        let rows = view.areas.rows;
        view.handle_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), rows.x, rows.y))
            .unwrap();
        view.handle_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 0, 0))
            .unwrap();
        assert_eq!(titles(&app), vec!["A", "B", "C"]);

        view.handle_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), rows.x, rows.y))
            .unwrap();
        view.handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(!view.should_quit());
        view.handle_event(
            &mut app,
            mouse(MouseEventKind::Up(MouseButton::Left), rows.x, rows.y + 2),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["A", "B", "C"]);
    }

    #[test]
    fn keyboard_toggle_move_and_delete() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        view.handle_event(&mut app, key(KeyCode::Tab)).unwrap();
        view.handle_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(app.todos().items()[0].is_done);

        view.handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)),
        )
        .unwrap();
        assert_eq!(titles(&app), vec!["B", "A", "C"]);

        // selection follows the moved item
        view.handle_event(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert_eq!(titles(&app), vec!["B", "C"]);
    }

    #[test]
    fn confirm_prompt_blocks_until_answered() {
        let (mut terminal, mut app, mut view) = setup(abc(), true);
        render(&mut terminal, &app, &mut view);
        view.handle_event(&mut app, key(KeyCode::Tab)).unwrap();
        view.handle_event(&mut app, key(KeyCode::Delete)).unwrap();
        assert!(render(&mut terminal, &app, &mut view).contains("Delete this?"));

        view.handle_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(!app.todos().items()[0].is_done);
        view.handle_event(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.todos().len(), 3);

        view.handle_event(&mut app, key(KeyCode::Delete)).unwrap();
        view.handle_event(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert_eq!(titles(&app), vec!["B", "C"]);
        assert!(!render(&mut terminal, &app, &mut view).contains("Delete this?"));
    }

    #[test]
    fn controller_changes_mark_view_dirty() {
        let (mut terminal, mut app, mut view) = setup(abc(), false);
        render(&mut terminal, &app, &mut view);
        view.take_dirty();
        app.on_toggle(2).unwrap();
        assert!(view.take_dirty());
        assert!(!view.take_dirty());
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(fit_width("abcdef", 10), "abcdef");
        assert_eq!(fit_width("abcdef", 4), "abc…");
    }
}
