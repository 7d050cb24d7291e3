//! Exercise↔workout link maintenance.
//!
//! Both sides of the relationship live in separate records, so every link
//! change is a sequence of independent writes with no transaction around
//! it. A failure mid-sequence leaves one side written; callers map that to
//! the documented status codes instead of rolling back.

use crate::error::{AppError, Result};
use crate::models::{Exercise, Workout};
use crate::store::{Datastore, EXERCISES, WORKOUTS};

/// Link an exercise into a workout: append the exercise id to the workout,
/// then point the exercise back at the workout. Writes happen in that
/// order; if the exercise-side write fails, the workout-side link is
/// already persisted.
pub async fn attach_exercise(
    store: &Datastore,
    mut workout: Workout,
    mut exercise: Exercise,
) -> Result<()> {
    let wid = workout.id;
    let eid = exercise.id;

    workout.exercises.push(eid);
    store.put(WORKOUTS, wid, &workout).await?;

    exercise.workout = Some(wid);
    store.put(EXERCISES, eid, &exercise).await?;

    Ok(())
}

/// Drop an exercise id from a workout's list before the exercise record is
/// deleted. Removes the first matching occurrence; a missing id is a no-op.
pub async fn detach_exercise_from_workout(store: &Datastore, eid: i64, wid: i64) -> Result<()> {
    let mut workout: Workout = store.get(WORKOUTS, wid).await?.ok_or(AppError::NotFound)?;

    if let Some(pos) = workout.exercises.iter().position(|&id| id == eid) {
        workout.exercises.remove(pos);
    }

    store.put(WORKOUTS, wid, &workout).await
}

/// Null the back-reference of the *first* exercise listed on a workout
/// about to be deleted. Remaining entries keep their `workout` field; only
/// one side is cleaned up regardless of list length.
pub async fn detach_first_exercise(store: &Datastore, workout: &Workout) -> Result<()> {
    let eid = match workout.exercises.first() {
        Some(&eid) => eid,
        None => return Ok(()),
    };

    let mut exercise: Exercise = store.get(EXERCISES, eid).await?.ok_or(AppError::NotFound)?;
    exercise.workout = None;
    store.put(EXERCISES, eid, &exercise).await
}
