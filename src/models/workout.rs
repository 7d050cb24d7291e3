use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A workout record as persisted in the store.
///
/// `exercises` is an ordered list of exercise ids; every id in it must
/// reference an exercise whose `workout` field points back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
    pub user: String,
    pub exercises: Vec<i64>,
    #[serde(rename = "self")]
    pub self_uri: Option<String>,
}

impl Workout {
    pub fn new(name: String, category: String, date: NaiveDate, user: String) -> Self {
        Self {
            id: 0,
            name,
            category,
            date,
            user,
            exercises: Vec::new(),
            self_uri: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
}

pub type UpdateWorkout = CreateWorkout;
