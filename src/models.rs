use {
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    std::collections::BTreeSet,
};

/// Identifier value meaning "not assigned yet, generate one on insert".
pub const UNASSIGNED_ID: i64 = 0;

/// A todo item as stored in the `todos` collection.
///
/// The store's `_id` is ignored on read; items are addressed by `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub deadline: NaiveDate,
}

impl TodoItem {
    /// Creates an item with an unassigned identifier.
    pub fn new<I, S>(description: impl Into<String>, tags: I, deadline: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: UNASSIGNED_ID,
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            deadline,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == UNASSIGNED_ID
    }
}

/// Field changes applied by the CLI `update` command.
#[derive(Debug, Default, Clone)]
pub struct UpdateTodo {
    pub description: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub deadline: Option<NaiveDate>,
}

impl UpdateTodo {
    pub fn apply_to(self, item: &mut TodoItem) {
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        if let Some(deadline) = self.deadline {
            item.deadline = deadline;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_none() && self.deadline.is_none()
    }
}
