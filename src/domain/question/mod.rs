pub mod entity;
pub mod schemas;

pub use entity::{Answer, Question, User};
