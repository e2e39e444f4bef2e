use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    Todo,
    InProgress,
    Done,
}

/// Static facts about a column: where it sits, what it is called and how it
/// is tinted. Everything that enumerates columns walks `COLUMNS`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub name: &'static str,
    pub accent: Color,
}

pub static COLUMNS: [ColumnDescriptor; 3] = [
    ColumnDescriptor {
        id: ColumnId::Todo,
        name: "To Do",
        accent: Color::Yellow,
    },
    ColumnDescriptor {
        id: ColumnId::InProgress,
        name: "In Progress",
        accent: Color::Cyan,
    },
    ColumnDescriptor {
        id: ColumnId::Done,
        name: "Done",
        accent: Color::Green,
    },
];

impl ColumnId {
    pub fn index(self) -> usize {
        match self {
            ColumnId::Todo => 0,
            ColumnId::InProgress => 1,
            ColumnId::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        COLUMNS.get(index).map(|c| c.id)
    }

    pub fn descriptor(self) -> &'static ColumnDescriptor {
        &COLUMNS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Next column in board order, wrapping around after the last one.
    pub fn cycle(self) -> Self {
        COLUMNS[(self.index() + 1) % COLUMNS.len()].id
    }

    pub fn left(self) -> Self {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(self)
    }

    pub fn right(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub items: Vec<Task>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self {
            name: id.name(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.items.iter().any(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ColumnId::Todo, ColumnId::InProgress)]
    #[case(ColumnId::InProgress, ColumnId::Done)]
    #[case(ColumnId::Done, ColumnId::Todo)]
    fn cycle_walks_columns_in_board_order(#[case] from: ColumnId, #[case] to: ColumnId) {
        assert_eq!(from.cycle(), to);
    }

    #[rstest]
    #[case(ColumnId::Todo, ColumnId::Todo, ColumnId::InProgress)]
    #[case(ColumnId::InProgress, ColumnId::Todo, ColumnId::Done)]
    #[case(ColumnId::Done, ColumnId::InProgress, ColumnId::Done)]
    fn left_and_right_stop_at_the_edges(
        #[case] from: ColumnId,
        #[case] left: ColumnId,
        #[case] right: ColumnId,
    ) {
        assert_eq!(from.left(), left);
        assert_eq!(from.right(), right);
    }

    #[test]
    fn descriptor_table_matches_index() {
        for (i, descriptor) in COLUMNS.iter().enumerate() {
            assert_eq!(descriptor.id.index(), i);
            assert_eq!(ColumnId::from_index(i), Some(descriptor.id));
        }
        assert_eq!(ColumnId::from_index(COLUMNS.len()), None);
    }
}
