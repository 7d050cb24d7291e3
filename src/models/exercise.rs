use serde::{Deserialize, Serialize};

/// An exercise record as persisted in the store.
///
/// `id` is store-assigned; the adapter strips it on write and injects it
/// on read. `workout` back-references at most one workout and must stay
/// consistent with that workout's `exercises` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub category: String,
    pub equipment: String,
    pub user: String,
    pub workout: Option<i64>,
    #[serde(rename = "self")]
    pub self_uri: Option<String>,
}

impl Exercise {
    /// A freshly created exercise carries no links; `self` is written in a
    /// second pass once the store has assigned the id.
    pub fn new(name: String, category: String, equipment: String, user: String) -> Self {
        Self {
            id: 0,
            name,
            category,
            equipment,
            user,
            workout: None,
            self_uri: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub category: String,
    pub equipment: String,
}

pub type UpdateExercise = CreateExercise;
