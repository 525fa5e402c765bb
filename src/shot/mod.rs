// Public API - what other modules can use
pub use models::{NewShot, ShotDraft, ShotError, ShotModel, ShotType, CUP_LAYOUT, FINAL_CUP};
pub use repository::ShotRepository;

// Internal modules
pub mod models;
pub mod repository;
