//! Application state and the reducer that advances it.
//!
//! Every user interaction becomes a [`BoardEvent`]. [`Reducer::apply`] takes
//! the current [`AppState`] by value and returns the next one, so a handler
//! always sees a fully settled state and rendering only ever reads.

use chrono::format::{Item, StrftimeItems};
use mockable::Clock;
use tracing::{debug, warn};

use crate::column::ColumnId;
use crate::editor::TaskEditor;
use crate::kanban_board::KanbanBoard;
use crate::task::TaskId;
use crate::theme::DisplayMode;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

pub fn is_renderable_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub pending: String,
    pub target: ColumnId,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pending: String::new(),
            target: ColumnId::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { column: ColumnId, id: TaskId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub board: KanbanBoard,
    pub input: InputState,
    pub drag: DragState,
    pub display_mode: DisplayMode,
}

impl AppState {
    pub fn new(board: KanbanBoard) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self, id: TaskId) -> bool {
        matches!(self.drag, DragState::Dragging { id: dragged, .. } if dragged == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    InputChanged(String),
    SelectColumn(ColumnId),
    /// Add the pending text to the target column.
    Add,
    Remove { column: ColumnId, id: TaskId },
    Edit { column: ColumnId, id: TaskId },
    DragStart { column: ColumnId, id: TaskId },
    Drop { column: ColumnId },
    /// Drag finished without a drop target.
    DragEnd,
    ToggleTheme,
}

pub struct Reducer<C, E> {
    clock: C,
    editor: E,
    date_format: String,
}

impl<C, E> Reducer<C, E>
where
    C: Clock,
    E: TaskEditor,
{
    pub fn new(clock: C, editor: E) -> Self {
        Self {
            clock,
            editor,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Sets the strftime pattern used for new task dates. A pattern chrono
    /// cannot render is ignored and the default is kept.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if is_renderable_date_format(&format) {
            self.date_format = format;
        } else {
            warn!(%format, "ignoring unrenderable date format");
        }
        self
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    fn today(&self) -> String {
        self.clock.local().format(&self.date_format).to_string()
    }

    pub fn apply(&mut self, mut state: AppState, event: BoardEvent) -> AppState {
        debug!(?event, "applying event");
        match event {
            BoardEvent::InputChanged(text) => state.input.pending = text,
            BoardEvent::SelectColumn(column) => state.input.target = column,
            BoardEvent::Add => {
                let date = self.today();
                let target = state.input.target;
                if state.board.add_task(target, &state.input.pending, date).is_some() {
                    state.input.pending.clear();
                }
            }
            BoardEvent::Remove { column, id } => {
                state.board.remove_task(column, id);
            }
            BoardEvent::Edit { column, id } => {
                state.board.edit_task(column, id, &mut self.editor);
            }
            BoardEvent::DragStart { column, id } => {
                state.drag = DragState::Dragging { column, id };
            }
            BoardEvent::Drop { column: to } => {
                if let DragState::Dragging { column: from, id } = state.drag {
                    state.board.move_task(from, id, to);
                }
                state.drag = DragState::Idle;
            }
            BoardEvent::DragEnd => state.drag = DragState::Idle,
            BoardEvent::ToggleTheme => state.display_mode = state.display_mode.toggled(),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditRequest, EditResponse, FormEditor};
    use crate::task::DEFAULT_DESCRIPTION;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    type TestReducer = Reducer<DefaultClock, FormEditor>;

    #[fixture]
    fn reducer() -> TestReducer {
        Reducer::new(DefaultClock, FormEditor::new())
    }

    #[fixture]
    fn state() -> AppState {
        AppState::new(KanbanBoard::with_sample_tasks())
    }

    fn today() -> String {
        DefaultClock.local().format(DEFAULT_DATE_FORMAT).to_string()
    }

    fn grab(column: ColumnId, id: u64) -> BoardEvent {
        BoardEvent::DragStart {
            column,
            id: TaskId(id),
        }
    }

    fn drop_on(column: ColumnId) -> BoardEvent {
        BoardEvent::Drop { column }
    }

    fn edit(column: ColumnId, id: u64) -> BoardEvent {
        BoardEvent::Edit {
            column,
            id: TaskId(id),
        }
    }

    fn run(reducer: &mut TestReducer, state: AppState, events: Vec<BoardEvent>) -> AppState {
        events.into_iter().fold(state, |s, e| reducer.apply(s, e))
    }

    #[rstest]
    fn add_uses_pending_text_and_target_then_clears_input(
        mut reducer: TestReducer,
        state: AppState,
    ) {
        let next = run(
            &mut reducer,
            state,
            vec![
                BoardEvent::InputChanged("Ship release".into()),
                BoardEvent::SelectColumn(ColumnId::InProgress),
                BoardEvent::Add,
            ],
        );

        let task = next.board.column(ColumnId::InProgress).items.last().unwrap();
        assert_eq!(task.content, "Ship release");
        assert_eq!(task.description, DEFAULT_DESCRIPTION);
        assert_eq!(task.date, today());
        assert!(next.input.pending.is_empty());
        assert_eq!(next.input.target, ColumnId::InProgress);
    }

    #[rstest]
    fn blank_add_keeps_pending_text(mut reducer: TestReducer, state: AppState) {
        let before = state.board.clone();
        let next = run(
            &mut reducer,
            state,
            vec![BoardEvent::InputChanged("   ".into()), BoardEvent::Add],
        );
        assert_eq!(next.board, before);
        assert_eq!(next.input.pending, "   ");
    }

    #[rstest]
    fn add_honours_configured_date_format(state: AppState) {
        let mut reducer =
            Reducer::new(DefaultClock, FormEditor::new()).with_date_format("%Y-%m-%d");
        let next = run(
            &mut reducer,
            state,
            vec![BoardEvent::InputChanged("x".into()), BoardEvent::Add],
        );
        let expected = DefaultClock.local().format("%Y-%m-%d").to_string();
        assert_eq!(next.board.column(ColumnId::Todo).items.last().unwrap().date, expected);
    }

    #[rstest]
    #[case("%Q")]
    #[case("%")]
    fn unrenderable_date_format_falls_back_to_default(state: AppState, #[case] format: &str) {
        let mut reducer = Reducer::new(DefaultClock, FormEditor::new()).with_date_format(format);
        let next = run(
            &mut reducer,
            state,
            vec![BoardEvent::InputChanged("x".into()), BoardEvent::Add],
        );
        assert_eq!(next.board.column(ColumnId::Todo).items.last().unwrap().date, today());
    }

    #[test]
    fn renderable_date_formats() {
        assert!(is_renderable_date_format(DEFAULT_DATE_FORMAT));
        assert!(is_renderable_date_format("%Y-%m-%d"));
        assert!(!is_renderable_date_format("%Q"));
    }

    #[rstest]
    fn drag_then_drop_moves_task_and_goes_idle(mut reducer: TestReducer, state: AppState) {
        let id = TaskId(1);
        let dragging = reducer.apply(state, grab(ColumnId::Todo, 1));
        assert_eq!(
            dragging.drag,
            DragState::Dragging {
                column: ColumnId::Todo,
                id
            }
        );
        assert!(dragging.is_dragging(id));

        let next = reducer.apply(dragging, drop_on(ColumnId::Done));

        assert_eq!(next.drag, DragState::Idle);
        assert_eq!(next.board.locate(id), Some(ColumnId::Done));
        assert_eq!(next.board.column(ColumnId::Done).items.last().unwrap().id, id);
        assert_eq!(next.board.total_tasks(), 4);
    }

    #[rstest]
    fn drop_on_source_column_clears_drag_without_moving(
        mut reducer: TestReducer,
        state: AppState,
    ) {
        let before = state.board.clone();
        let next = run(
            &mut reducer,
            state,
            vec![
                grab(ColumnId::Todo, 1),
                drop_on(ColumnId::Todo),
            ],
        );
        assert_eq!(next.drag, DragState::Idle);
        assert_eq!(next.board, before);
    }

    #[rstest]
    fn drop_while_idle_changes_nothing(mut reducer: TestReducer, state: AppState) {
        let before = state.clone();
        let next = reducer.apply(state, drop_on(ColumnId::Done));
        assert_eq!(next, before);
    }

    #[rstest]
    fn drag_end_cancels_without_touching_board(mut reducer: TestReducer, state: AppState) {
        let before = state.board.clone();
        let next = run(
            &mut reducer,
            state,
            vec![
                grab(ColumnId::Todo, 2),
                BoardEvent::DragEnd,
                drop_on(ColumnId::Done),
            ],
        );
        assert_eq!(next.drag, DragState::Idle);
        assert_eq!(next.board, before);
    }

    #[rstest]
    fn new_drag_start_replaces_dangling_drag(mut reducer: TestReducer, state: AppState) {
        let next = run(
            &mut reducer,
            state,
            vec![
                grab(ColumnId::Todo, 1),
                grab(ColumnId::InProgress, 3),
                drop_on(ColumnId::Done),
            ],
        );
        assert_eq!(next.board.locate(TaskId(1)), Some(ColumnId::Todo));
        assert_eq!(next.board.locate(TaskId(3)), Some(ColumnId::Done));
    }

    #[rstest]
    fn dropping_a_task_removed_mid_drag_does_nothing(
        mut reducer: TestReducer,
        state: AppState,
    ) {
        let next = run(
            &mut reducer,
            state,
            vec![
                grab(ColumnId::Todo, 1),
                BoardEvent::Remove {
                    column: ColumnId::Todo,
                    id: TaskId(1),
                },
                drop_on(ColumnId::Done),
            ],
        );
        assert_eq!(next.drag, DragState::Idle);
        assert_eq!(next.board.locate(TaskId(1)), None);
        assert_eq!(next.board.total_tasks(), 3);
    }

    #[rstest]
    fn edit_goes_through_the_injected_editor(mut reducer: TestReducer, state: AppState) {
        reducer.editor_mut().stage(EditResponse::new("Ads", ""));
        let next = reducer.apply(state, edit(ColumnId::Todo, 1));

        let task = next.board.find(ColumnId::Todo, TaskId(1)).unwrap();
        assert_eq!(task.content, "Ads");
        assert_eq!(task.description, "");
    }

    #[rstest]
    fn edit_with_closure_editor_and_blank_content_is_discarded(state: AppState) {
        let editor = |_: &EditRequest| EditResponse::new(" ", "kept?");
        let mut reducer = Reducer::new(DefaultClock, editor);
        let before = state.board.clone();

        let next = reducer.apply(state, edit(ColumnId::Todo, 1));

        assert_eq!(next.board, before);
    }

    #[rstest]
    fn toggle_theme_is_orthogonal_to_tasks(mut reducer: TestReducer, state: AppState) {
        let before = state.clone();
        let once = reducer.apply(state, BoardEvent::ToggleTheme);
        assert_eq!(once.display_mode, DisplayMode::Light);
        assert_eq!(once.board, before.board);

        let twice = reducer.apply(once, BoardEvent::ToggleTheme);
        assert_eq!(twice, before);
    }
}
