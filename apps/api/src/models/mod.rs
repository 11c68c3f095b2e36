pub mod analysis;
pub mod document;
pub mod questionnaire;
pub mod user;
