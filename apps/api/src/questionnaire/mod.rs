//! Background questionnaire — free-form JSON responses per user.

pub mod handlers;
