use serde::{Deserialize, Serialize};

/// A drop zone on the list page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    /// The ranked favorites column.
    TopList,
    /// Any other droppable, identified by name.
    Other(String),
}

/// A slot inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropLocation {
    pub container: Container,
    pub index: usize,
}

impl DropLocation {
    #[must_use]
    pub fn top(index: usize) -> Self {
        Self {
            container: Container::TopList,
            index,
        }
    }
}

/// The result of a finished drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragEnd {
    pub source: DropLocation,
    /// `None` when the item was released outside every drop zone.
    pub destination: Option<DropLocation>,
}

/// What a drag should do to the top list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragIntent {
    Ignore,
    Remove(usize),
    Move { from: usize, to: usize },
}

impl DragEnd {
    pub(crate) fn intent(&self) -> DragIntent {
        if self.source.container != Container::TopList {
            return DragIntent::Ignore;
        }
        match &self.destination {
            None => DragIntent::Remove(self.source.index),
            Some(dest) if dest.container == Container::TopList => DragIntent::Move {
                from: self.source.index,
                to: dest.index,
            },
            Some(_) => DragIntent::Ignore,
        }
    }
}
