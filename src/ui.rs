use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use mockable::Clock;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::info;

use crate::column::{ColumnId, COLUMNS};
use crate::editor::{EditResponse, FormEditor};
use crate::state::{AppState, BoardEvent, DragState, Reducer};
use crate::task::{Task, TaskId};
use crate::theme::Palette;

pub const TITLE: &str = "TaskNest";
pub const INPUT_PLACEHOLDER: &str = "Add a new task...";
pub const DROP_PLACEHOLDER: &str = "Drop tasks here";

/// Rows taken by one card: title, description, date and a spacer.
const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Content,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub column: ColumnId,
    pub id: TaskId,
    pub content: String,
    pub description: String,
    pub field: EditField,
}

impl EditForm {
    fn open(column: ColumnId, task: &Task) -> Self {
        Self {
            column,
            id: task.id,
            content: task.content.clone(),
            description: task.description.clone(),
            field: EditField::Content,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            EditField::Content => &mut self.content,
            EditField::Description => &mut self.description,
        }
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            EditField::Content => EditField::Description,
            EditField::Description => EditField::Content,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input,
    Editing(EditForm),
}

/// Screen regions, shared by drawing and mouse hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub input: Rect,
    pub columns: [Rect; 3],
    pub status: Rect,
}

impl BoardLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(rows[2]);

        Self {
            header: rows[0],
            input: rows[1],
            columns: [columns[0], columns[1], columns[2]],
            status: rows[3],
        }
    }

    pub fn column_area(&self, column: ColumnId) -> Rect {
        self.columns[column.index()]
    }

    pub fn column_at(&self, x: u16, y: u16) -> Option<ColumnId> {
        COLUMNS
            .iter()
            .map(|c| c.id)
            .find(|&id| self.column_area(id).contains(Position::new(x, y)))
    }

    /// Card under the pointer as (column, index, id).
    pub fn card_at(&self, state: &AppState, x: u16, y: u16) -> Option<(ColumnId, usize, TaskId)> {
        let column = self.column_at(x, y)?;
        let inner = self.column_area(column).inner(Margin::new(1, 1));
        if !inner.contains(Position::new(x, y)) {
            return None;
        }
        let index = usize::from((y - inner.y) / CARD_HEIGHT);
        let task = state.board.column(column).items.get(index)?;
        Some((column, index, task.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub focus: ColumnId,
    pub selected: usize,
    pub mode: Mode,
    pub layout: Option<BoardLayout>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: ColumnId::Todo,
            selected: 0,
            mode: Mode::Normal,
            layout: None,
        }
    }
}

impl ViewState {
    pub fn clamp(&mut self, state: &AppState) {
        let len = state.board.column(self.focus).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn focus_on(&mut self, column: ColumnId, state: &AppState) {
        self.focus = column;
        self.clamp(state);
    }

    fn selected_task<'a>(&self, state: &'a AppState) -> Option<&'a Task> {
        state.board.column(self.focus).items.get(self.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    None,
    Quit,
    Dispatch(BoardEvent),
    SubmitEdit {
        column: ColumnId,
        id: TaskId,
        response: EditResponse,
    },
}

pub fn handle_key(state: &AppState, view: &mut ViewState, key: KeyEvent) -> UiAction {
    if key.kind != KeyEventKind::Press {
        return UiAction::None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return UiAction::Quit;
    }

    match view.mode {
        Mode::Input => handle_input_key(state, view, key),
        Mode::Editing(_) => handle_edit_key(view, key),
        Mode::Normal if state.drag != DragState::Idle => handle_drag_key(state, view, key),
        Mode::Normal => handle_normal_key(state, view, key),
    }
}

fn handle_normal_key(state: &AppState, view: &mut ViewState, key: KeyEvent) -> UiAction {
    match key.code {
        KeyCode::Char('q') => return UiAction::Quit,
        KeyCode::Left | KeyCode::Char('h') => view.focus_on(view.focus.left(), state),
        KeyCode::Right | KeyCode::Char('l') => view.focus_on(view.focus.right(), state),
        KeyCode::Up | KeyCode::Char('k') => view.selected = view.selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            view.selected += 1;
            view.clamp(state);
        }
        KeyCode::Char('a') | KeyCode::Char('i') => view.mode = Mode::Input,
        KeyCode::Char('t') => return UiAction::Dispatch(BoardEvent::ToggleTheme),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(task) = view.selected_task(state) {
                return UiAction::Dispatch(BoardEvent::Remove {
                    column: view.focus,
                    id: task.id,
                });
            }
        }
        KeyCode::Char('e') => {
            if let Some(task) = view.selected_task(state) {
                view.mode = Mode::Editing(EditForm::open(view.focus, task));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('m') => {
            if let Some(task) = view.selected_task(state) {
                return UiAction::Dispatch(BoardEvent::DragStart {
                    column: view.focus,
                    id: task.id,
                });
            }
        }
        _ => {}
    }
    UiAction::None
}

fn handle_input_key(state: &AppState, view: &mut ViewState, key: KeyEvent) -> UiAction {
    let pending = &state.input.pending;
    match key.code {
        KeyCode::Esc => {
            view.mode = Mode::Normal;
            UiAction::None
        }
        KeyCode::Enter => {
            // Follow the new card so it ends up selected.
            view.focus = state.input.target;
            view.selected = usize::MAX;
            UiAction::Dispatch(BoardEvent::Add)
        }
        KeyCode::Tab => UiAction::Dispatch(BoardEvent::SelectColumn(state.input.target.cycle())),
        KeyCode::Backspace => {
            let mut text = pending.clone();
            text.pop();
            UiAction::Dispatch(BoardEvent::InputChanged(text))
        }
        KeyCode::Char(c) => UiAction::Dispatch(BoardEvent::InputChanged(format!("{pending}{c}"))),
        _ => UiAction::None,
    }
}

fn handle_drag_key(state: &AppState, view: &mut ViewState, key: KeyEvent) -> UiAction {
    match key.code {
        KeyCode::Char('q') => UiAction::Quit,
        KeyCode::Left | KeyCode::Char('h') => {
            view.focus_on(view.focus.left(), state);
            UiAction::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            view.focus_on(view.focus.right(), state);
            UiAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
            view.selected = usize::MAX;
            UiAction::Dispatch(BoardEvent::Drop { column: view.focus })
        }
        KeyCode::Esc => UiAction::Dispatch(BoardEvent::DragEnd),
        _ => UiAction::None,
    }
}

fn handle_edit_key(view: &mut ViewState, key: KeyEvent) -> UiAction {
    let Mode::Editing(form) = &mut view.mode else {
        return UiAction::None;
    };

    let response = match (key.code, form.field) {
        (KeyCode::Esc, EditField::Content) => EditResponse::cancelled(),
        (KeyCode::Esc, EditField::Description) => EditResponse {
            content: Some(form.content.clone()),
            description: None,
        },
        (KeyCode::Enter, EditField::Content) | (KeyCode::Tab | KeyCode::BackTab, _) => {
            form.switch_field();
            return UiAction::None;
        }
        (KeyCode::Enter, EditField::Description) => {
            EditResponse::new(form.content.clone(), form.description.clone())
        }
        (KeyCode::Backspace, _) => {
            form.active_mut().pop();
            return UiAction::None;
        }
        (KeyCode::Char(c), _) => {
            form.active_mut().push(c);
            return UiAction::None;
        }
        _ => return UiAction::None,
    };

    let (column, id) = (form.column, form.id);
    view.mode = Mode::Normal;
    UiAction::SubmitEdit {
        column,
        id,
        response,
    }
}

/// Left press on a card picks it up, dragging moves the drop target along
/// with the pointer, and left release drops it on the column under the
/// pointer, or cancels the drag when there is none.
pub fn handle_mouse(state: &AppState, view: &mut ViewState, mouse: MouseEvent) -> UiAction {
    if view.mode != Mode::Normal {
        return UiAction::None;
    }
    let Some(layout) = view.layout else {
        return UiAction::None;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((column, index, id)) = layout.card_at(state, mouse.column, mouse.row) {
                view.focus = column;
                view.selected = index;
                return UiAction::Dispatch(BoardEvent::DragStart { column, id });
            }
            if let Some(column) = layout.column_at(mouse.column, mouse.row) {
                view.focus_on(column, state);
            }
            UiAction::None
        }
        MouseEventKind::Up(MouseButton::Left) if state.drag != DragState::Idle => {
            match layout.column_at(mouse.column, mouse.row) {
                Some(column) => {
                    view.focus = column;
                    view.selected = usize::MAX;
                    UiAction::Dispatch(BoardEvent::Drop { column })
                }
                None => UiAction::Dispatch(BoardEvent::DragEnd),
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if state.drag != DragState::Idle => {
            if let Some(column) = layout.column_at(mouse.column, mouse.row) {
                view.focus_on(column, state);
            }
            UiAction::None
        }
        _ => UiAction::None,
    }
}

pub fn render(f: &mut Frame, state: &AppState, view: &ViewState) {
    let palette = state.display_mode.palette();
    let layout = BoardLayout::new(f.area());

    f.render_widget(Block::default().style(palette.base()), f.area());
    render_header(f, state, &palette, layout.header);
    render_input(f, state, view, &palette, layout.input);
    for descriptor in &COLUMNS {
        render_column(f, state, view, &palette, descriptor.id, layout.column_area(descriptor.id));
    }
    render_status_bar(f, state, view, &palette, layout.status);

    if let Mode::Editing(form) = &view.mode {
        render_edit_form(f, form, &palette);
    }
}

fn render_header(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.border());
    let inner = block.inner(area);
    f.render_widget(block, area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(20)])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        palette.base().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let toggle = Paragraph::new(Line::from(vec![
        Span::styled("[t] ", palette.muted()),
        Span::styled(state.display_mode.toggle_label(), palette.base()),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(toggle, chunks[1]);
}

fn render_input(
    f: &mut Frame,
    state: &AppState,
    view: &ViewState,
    palette: &Palette,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20)])
        .split(area);

    let active = view.mode == Mode::Input;
    let text = if state.input.pending.is_empty() && !active {
        Line::from(Span::styled(INPUT_PLACEHOLDER, palette.muted()))
    } else {
        Line::from(Span::styled(state.input.pending.as_str(), palette.base()))
    };
    let input = Paragraph::new(text.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New task ")
            .border_style(if active { palette.selected() } else { palette.border() }),
    );
    f.render_widget(input, chunks[0]);

    let target = state.input.target;
    let selector = Paragraph::new(Line::from(Span::styled(
        target.name(),
        palette.base().fg(target.descriptor().accent),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Column [Tab] ")
            .border_style(palette.border()),
    );
    f.render_widget(selector, chunks[1]);

    if active {
        let x = cursor_x(chunks[0], text.width());
        f.set_cursor_position(Position::new(x, chunks[0].y + 1));
    }
}

/// Column of the input cursor, kept inside the input box borders.
fn cursor_x(area: Rect, text_width: usize) -> u16 {
    let width = u16::try_from(text_width).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2))
}

fn render_column(
    f: &mut Frame,
    state: &AppState,
    view: &ViewState,
    palette: &Palette,
    id: ColumnId,
    area: Rect,
) {
    let column = state.board.column(id);
    let accent = id.descriptor().accent;
    let focused = view.focus == id;
    let drop_target = focused && state.drag != DragState::Idle;

    let border_style = if drop_target {
        palette.selected()
    } else if focused {
        palette.base().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        palette.base().fg(accent)
    };
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(format!(" {} ", column.name), Style::default().fg(accent)),
            Span::styled(format!("({}) ", column.len()), palette.muted()),
        ]))
        .borders(Borders::ALL)
        .border_style(border_style);

    if column.is_empty() {
        let placeholder =
            Paragraph::new(Line::from(Span::styled(DROP_PLACEHOLDER, palette.muted())))
                .alignment(Alignment::Center)
                .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = column
        .items
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let selected = focused && view.mode == Mode::Normal && view.selected == i;
            let title_style = if state.is_dragging(task.id) {
                palette.selected().add_modifier(Modifier::REVERSED)
            } else if selected {
                palette.selected()
            } else {
                palette.base().add_modifier(Modifier::BOLD)
            };
            let marker = if selected { "▶ " } else { "  " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, palette.selected()),
                    Span::styled(task.content.as_str(), title_style),
                ]),
                Line::from(Span::styled(format!("  {}", task.description), palette.muted())),
                Line::from(Span::styled(
                    format!("  {}", task.date),
                    palette.muted().add_modifier(Modifier::ITALIC),
                )),
                Line::default(),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(
    f: &mut Frame,
    state: &AppState,
    view: &ViewState,
    palette: &Palette,
    area: Rect,
) {
    let hints: &[(&str, &str)] = match view.mode {
        Mode::Input => &[("Enter", "add"), ("Tab", "column"), ("Esc", "done")],
        Mode::Editing(_) => &[("Tab", "field"), ("Enter", "next/save"), ("Esc", "cancel")],
        Mode::Normal if state.drag != DragState::Idle => {
            &[("←/→", "target"), ("Enter", "drop"), ("Esc", "cancel")]
        }
        Mode::Normal => &[
            ("q", "quit"),
            ("h/l", "columns"),
            ("j/k", "tasks"),
            ("a", "add"),
            ("e", "edit"),
            ("d", "delete"),
            ("space", "drag"),
            ("t", "theme"),
        ],
    };

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key}"), palette.selected()),
                Span::styled(format!(" {label} "), palette.muted()),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_edit_form(f: &mut Frame, form: &EditForm, palette: &Palette) {
    let area = centered_rect(60, 6, f.area());
    let field_line = |label: &'static str, value: &str, active: bool| {
        let style = if active { palette.selected() } else { palette.base() };
        Line::from(vec![
            Span::styled(label, palette.muted()),
            Span::styled(value.to_string(), style),
            Span::styled(if active { "▏" } else { "" }, style),
        ])
    };

    let body = Paragraph::new(vec![
        field_line("Title:       ", &form.content, form.field == EditField::Content),
        Line::default(),
        field_line("Description: ", &form.description, form.field == EditField::Description),
    ])
    .block(
        Block::default()
            .title(" Edit task ")
            .borders(Borders::ALL)
            .border_style(palette.selected()),
    )
    .style(palette.base());

    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn run_app<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    mut state: AppState,
    reducer: &mut Reducer<C, FormEditor>,
) -> io::Result<AppState> {
    let mut view = ViewState {
        focus: state.input.target,
        ..ViewState::default()
    };

    loop {
        terminal.draw(|f| {
            view.layout = Some(BoardLayout::new(f.area()));
            render(f, &state, &view);
        })?;

        let action = match event::read()? {
            Event::Key(key) => handle_key(&state, &mut view, key),
            Event::Mouse(mouse) => handle_mouse(&state, &mut view, mouse),
            _ => UiAction::None,
        };

        match action {
            UiAction::None => {}
            UiAction::Quit => {
                info!(tasks = state.board.total_tasks(), "quitting");
                return Ok(state);
            }
            UiAction::Dispatch(event) => state = reducer.apply(state, event),
            UiAction::SubmitEdit {
                column,
                id,
                response,
            } => {
                reducer.editor_mut().stage(response);
                state = reducer.apply(state, BoardEvent::Edit { column, id });
            }
        }
        view.clamp(&state);
    }
}
