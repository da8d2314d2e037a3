use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::repositories::QuestionStore;
use crate::domain::notify::schemas::Notice;
use crate::domain::notify::NotifyHub;
use crate::domain::question::entity::{Answer, AnswerWithAuthor, Question, QuestionWithAuthor};
use crate::domain::question::schemas::{ListQuery, Page, QuestionForm};

use super::response::ServiceError;

/// A question detail view: the question with author expanded plus every
/// answer in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionThread {
	pub question: QuestionWithAuthor,
	pub answers: Vec<AnswerWithAuthor>,
}

/// Business rules for the question board. Store and push channel are
/// injected; the service holds no state of its own beyond those handles.
pub struct QuestionService {
	store: Arc<dyn QuestionStore>,
	hub: Arc<NotifyHub>,
}

impl QuestionService {
	pub fn new(
		store: Arc<dyn QuestionStore>,
		hub: Arc<NotifyHub>,
	) -> Self {
		Self { store, hub }
	}

	pub async fn list_questions(
		&self,
		query: &ListQuery,
	) -> Result<Page<QuestionWithAuthor>, ServiceError> {
		Ok(self.store.page_questions(query.page(), query.limit(), query.term()).await?)
	}

	/// Fetches the question with its answers and bumps the read counter.
	/// Repeat views by the same reader count again.
	pub async fn question_detail(
		&self,
		id: Uuid,
	) -> Result<QuestionThread, ServiceError> {
		let mut found = self.store.question_with_author(id).await?.ok_or(ServiceError::QuestionNotFound)?;
		let answers = self.store.answers_of(id).await?;

		found.question.num_reads += 1;
		self.store.save_question(&found.question).await?;

		Ok(QuestionThread { question: found, answers })
	}

	pub async fn create_question(
		&self,
		author_id: &str,
		form: QuestionForm,
	) -> Result<Question, ServiceError> {
		if let Some(message) = form.first_error() {
			return Err(ServiceError::Validation(message));
		}
		let question = Question::new(author_id, form);
		self.store.add_question(&question).await?;
		tracing::info!("question {} posted by {author_id}", question.id);
		Ok(question)
	}

	/// Overwrites the mutable fields wholesale. Unlike creation there is no
	/// validation pass here; empty input empties the field.
	pub async fn update_question(
		&self,
		id: Uuid,
		form: QuestionForm,
	) -> Result<Question, ServiceError> {
		let mut question = self.store.question_by_id(id).await?.ok_or(ServiceError::QuestionNotFound)?;
		question.overwrite(form);
		self.store.save_question(&question).await?;
		Ok(question)
	}

	/// Idempotent. Answers of the removed question are left in place.
	pub async fn delete_question(
		&self,
		id: Uuid,
	) -> Result<(), ServiceError> {
		self.store.remove_question(id).await?;
		Ok(())
	}

	/// Persists the answer, bumps the denormalized counter, then notifies
	/// the question author. Strictly in that order, so anyone reacting to
	/// the notice re-reads consistent state. The notice itself is
	/// fire-and-forget and can never fail the operation.
	pub async fn post_answer(
		&self,
		author_id: &str,
		question_id: Uuid,
		content: String,
	) -> Result<Answer, ServiceError> {
		let mut question = self.store.question_by_id(question_id).await?.ok_or(ServiceError::QuestionNotFound)?;

		let answer = Answer::new(author_id, question_id, content);
		self.store.add_answer(&answer).await?;

		question.num_answers += 1;
		self.store.save_question(&question).await?;

		let url = format!("/questions/{}#{}", question.id, answer.id);
		let target = question.author_id.clone();
		self.hub.notify(&target, Notice::Answered { url, question }).await;

		Ok(answer)
	}
}
