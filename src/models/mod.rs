pub mod exercise;
pub mod workout;

pub use exercise::{CreateExercise, Exercise, UpdateExercise};
pub use workout::{CreateWorkout, UpdateWorkout, Workout};
