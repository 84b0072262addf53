pub mod entity;
pub mod invariants;

pub use entity::SavedMovie;
pub use invariants::validate_saved_movie;
