pub mod question_repository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::question::entity::{Answer, AnswerWithAuthor, Question, QuestionWithAuthor, User};
use crate::domain::question::schemas::Page;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// Persistence seam for questions, answers and read-only user lookups.
/// The production implementation is Postgres; tests drive the service
/// through an in-memory double.
#[async_trait]
pub trait QuestionStore: Send + Sync {
	async fn add_question(
		&self,
		question: &Question,
	) -> Result<(), StoreError>;

	async fn question_by_id(
		&self,
		id: Uuid,
	) -> Result<Option<Question>, StoreError>;

	async fn question_with_author(
		&self,
		id: Uuid,
	) -> Result<Option<QuestionWithAuthor>, StoreError>;

	/// Writes the given snapshot back wholesale. Counter updates go through
	/// here too, so concurrent writers can lose updates; that matches the
	/// documented behavior of the system.
	async fn save_question(
		&self,
		question: &Question,
	) -> Result<(), StoreError>;

	/// Removes the record if present. Absence is not an error.
	async fn remove_question(
		&self,
		id: Uuid,
	) -> Result<(), StoreError>;

	/// Most recent first, author expanded, optionally filtered by a
	/// case-insensitive substring over the five descriptive text fields.
	async fn page_questions(
		&self,
		page: u32,
		limit: u32,
		term: Option<&str>,
	) -> Result<Page<QuestionWithAuthor>, StoreError>;

	async fn add_answer(
		&self,
		answer: &Answer,
	) -> Result<(), StoreError>;

	/// All answers of a question in insertion order, authors expanded.
	async fn answers_of(
		&self,
		question_id: Uuid,
	) -> Result<Vec<AnswerWithAuthor>, StoreError>;

	async fn user_by_id(
		&self,
		id: &str,
	) -> Result<Option<User>, StoreError>;
}
