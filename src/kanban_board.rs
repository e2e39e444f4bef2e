use crate::column::{Column, ColumnId, COLUMNS};
use crate::editor::{EditRequest, TaskEditor};
use crate::task::{Task, TaskId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanBoard {
    columns: [Column; 3],
    next_id: u64,
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self {
            columns: COLUMNS.map(|c| Column::empty(c.id)),
            next_id: 1,
        }
    }

    /// Board pre-filled with the demo cards shown on first launch.
    pub fn with_sample_tasks() -> Self {
        const DATE: &str = "12/08/2025";
        let samples = [
            (ColumnId::Todo, "Marketing", "Plan ad campaigns"),
            (ColumnId::Todo, "Research", "Market analysis"),
            (ColumnId::InProgress, "Developer", "Frontend coding"),
            (ColumnId::Done, "UI Designer", "Design completed"),
        ];

        let mut board = Self::new();
        for (column, content, description) in samples {
            let id = board.mint_id();
            board
                .column_mut(column)
                .items
                .push(Task::new(id, content, DATE).with_description(description));
        }
        board
    }

    fn mint_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.index()]
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Column)> {
        COLUMNS.iter().map(|c| c.id).zip(self.columns.iter())
    }

    pub fn total_tasks(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn find(&self, column: ColumnId, id: TaskId) -> Option<&Task> {
        self.column(column).items.iter().find(|t| t.id == id)
    }

    /// Column currently holding `id`, if any.
    pub fn locate(&self, id: TaskId) -> Option<ColumnId> {
        self.columns()
            .find(|(_, column)| column.contains(id))
            .map(|(column_id, _)| column_id)
    }

    /// Appends a new task to `column`. Blank text is ignored.
    pub fn add_task(
        &mut self,
        column: ColumnId,
        text: &str,
        date: impl Into<String>,
    ) -> Option<TaskId> {
        let content = text.trim();
        if content.is_empty() {
            debug!(%column, "ignoring blank task text");
            return None;
        }

        let id = self.mint_id();
        self.column_mut(column).items.push(Task::new(id, content, date));
        debug!(%column, %id, "task added");
        Some(id)
    }

    pub fn remove_task(&mut self, column: ColumnId, id: TaskId) -> Option<Task> {
        let items = &mut self.column_mut(column).items;
        let position = items.iter().position(|t| t.id == id)?;
        let task = items.remove(position);
        debug!(%column, %id, "task removed");
        Some(task)
    }

    /// Replaces a task's content and description with what `editor` returns.
    ///
    /// A blank or cancelled content discards the whole edit, description
    /// included. A cancelled description becomes the empty string.
    pub fn edit_task(
        &mut self,
        column: ColumnId,
        id: TaskId,
        editor: &mut impl TaskEditor,
    ) -> bool {
        let Some(task) = self
            .column_mut(column)
            .items
            .iter_mut()
            .find(|t| t.id == id)
        else {
            return false;
        };

        let response = editor.edit(&EditRequest {
            content: task.content.clone(),
            description: task.description.clone(),
        });

        let content = match response.content {
            Some(content) if !content.trim().is_empty() => content,
            _ => {
                debug!(%column, %id, "edit discarded, content empty");
                return false;
            }
        };

        task.content = content;
        task.description = response.description.unwrap_or_default();
        debug!(%column, %id, "task edited");
        true
    }

    /// Moves a task to the end of `to`. Same-column moves and unknown ids
    /// leave the board untouched.
    pub fn move_task(&mut self, from: ColumnId, id: TaskId, to: ColumnId) -> bool {
        if from == to {
            return false;
        }
        let Some(task) = self.remove_task(from, id) else {
            return false;
        };
        self.column_mut(to).items.push(task);
        debug!(%from, %to, %id, "task moved");
        true
    }
}
