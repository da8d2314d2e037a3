use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dependencies::connection_pool;
use crate::domain::question::entity::{Answer, AnswerWithAuthor, Question, QuestionWithAuthor, User};
use crate::domain::question::schemas::Page;

use super::{QuestionStore, StoreError};

const QUESTION_COLUMNS: &str = "id, author_id, title, content, location, start_at, end_at, group_name, group_explain, \
	event_type, event_topic, event_price, price, tags, num_likes, num_answers, num_reads, img, created_at";

const SEARCH_FILTER: &str =
	"(title ILIKE $1 OR content ILIKE $1 OR location ILIKE $1 OR group_name ILIKE $1 OR group_explain ILIKE $1)";

pub struct QuestionRepository {
	pool: &'static PgPool,
}

impl QuestionRepository {
	pub async fn new() -> Self {
		Self {
			pool: connection_pool().await,
		}
	}

	async fn attach_authors(
		&self,
		questions: Vec<Question>,
	) -> Result<Vec<QuestionWithAuthor>, StoreError> {
		let mut ids: Vec<String> = questions.iter().map(|q| q.author_id.clone()).collect();
		ids.sort();
		ids.dedup();
		let users: Vec<User> = sqlx::query_as("SELECT id, name FROM users WHERE id = ANY($1)")
			.bind(&ids)
			.fetch_all(self.pool)
			.await?;
		let by_id: HashMap<String, User> = users.into_iter().map(|u| (u.id.clone(), u)).collect();
		Ok(questions
			.into_iter()
			.map(|question| {
				let author = by_id.get(&question.author_id).cloned();
				QuestionWithAuthor { question, author }
			})
			.collect())
	}
}

/// Turns a search term into a LIKE pattern that matches it as a literal
/// substring.
fn substring_pattern(term: &str) -> String {
	let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
	format!("%{escaped}%")
}

#[async_trait]
impl QuestionStore for QuestionRepository {
	async fn add_question(
		&self,
		question: &Question,
	) -> Result<(), StoreError> {
		let sql = format!(
			"INSERT INTO questions ({QUESTION_COLUMNS}) \
			 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
		);
		sqlx::query(&sql)
			.bind(question.id)
			.bind(&question.author_id)
			.bind(&question.title)
			.bind(&question.content)
			.bind(&question.location)
			.bind(question.start_at)
			.bind(question.end_at)
			.bind(&question.group_name)
			.bind(&question.group_explain)
			.bind(&question.event_type)
			.bind(&question.event_topic)
			.bind(&question.event_price)
			.bind(&question.price)
			.bind(&question.tags)
			.bind(question.num_likes)
			.bind(question.num_answers)
			.bind(question.num_reads)
			.bind(&question.img)
			.bind(question.created_at)
			.execute(self.pool)
			.await?;
		Ok(())
	}

	async fn question_by_id(
		&self,
		id: Uuid,
	) -> Result<Option<Question>, StoreError> {
		let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
		Ok(sqlx::query_as(&sql).bind(id).fetch_optional(self.pool).await?)
	}

	async fn question_with_author(
		&self,
		id: Uuid,
	) -> Result<Option<QuestionWithAuthor>, StoreError> {
		let Some(question) = self.question_by_id(id).await? else {
			return Ok(None);
		};
		let author = self.user_by_id(&question.author_id).await?;
		Ok(Some(QuestionWithAuthor { question, author }))
	}

	async fn save_question(
		&self,
		question: &Question,
	) -> Result<(), StoreError> {
		sqlx::query(
			"UPDATE questions SET title = $2, content = $3, location = $4, start_at = $5, end_at = $6, \
			 group_name = $7, group_explain = $8, event_type = $9, event_topic = $10, event_price = $11, \
			 price = $12, tags = $13, num_likes = $14, num_answers = $15, num_reads = $16, img = $17 \
			 WHERE id = $1",
		)
		.bind(question.id)
		.bind(&question.title)
		.bind(&question.content)
		.bind(&question.location)
		.bind(question.start_at)
		.bind(question.end_at)
		.bind(&question.group_name)
		.bind(&question.group_explain)
		.bind(&question.event_type)
		.bind(&question.event_topic)
		.bind(&question.event_price)
		.bind(&question.price)
		.bind(&question.tags)
		.bind(question.num_likes)
		.bind(question.num_answers)
		.bind(question.num_reads)
		.bind(&question.img)
		.execute(self.pool)
		.await?;
		Ok(())
	}

	async fn remove_question(
		&self,
		id: Uuid,
	) -> Result<(), StoreError> {
		// Answers are deliberately left behind; see DESIGN.md on orphans.
		sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(self.pool).await?;
		Ok(())
	}

	async fn page_questions(
		&self,
		page: u32,
		limit: u32,
		term: Option<&str>,
	) -> Result<Page<QuestionWithAuthor>, StoreError> {
		let offset = (page as i64 - 1) * limit as i64;
		let (total, questions): (i64, Vec<Question>) = match term {
			Some(term) => {
				let pattern = substring_pattern(term);
				let count_sql = format!("SELECT COUNT(*) FROM questions WHERE {SEARCH_FILTER}");
				let total = sqlx::query_scalar(&count_sql).bind(&pattern).fetch_one(self.pool).await?;
				let page_sql = format!(
					"SELECT {QUESTION_COLUMNS} FROM questions WHERE {SEARCH_FILTER} \
					 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
				);
				let questions = sqlx::query_as(&page_sql)
					.bind(&pattern)
					.bind(limit as i64)
					.bind(offset)
					.fetch_all(self.pool)
					.await?;
				(total, questions)
			}
			None => {
				let total = sqlx::query_scalar("SELECT COUNT(*) FROM questions").fetch_one(self.pool).await?;
				let page_sql =
					format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC LIMIT $1 OFFSET $2");
				let questions = sqlx::query_as(&page_sql)
					.bind(limit as i64)
					.bind(offset)
					.fetch_all(self.pool)
					.await?;
				(total, questions)
			}
		};
		Ok(Page {
			items: self.attach_authors(questions).await?,
			total: total as u64,
			page,
			limit,
		})
	}

	async fn add_answer(
		&self,
		answer: &Answer,
	) -> Result<(), StoreError> {
		sqlx::query(
			"INSERT INTO answers (id, author_id, question_id, content, created_at) VALUES ($1, $2, $3, $4, $5)",
		)
		.bind(answer.id)
		.bind(&answer.author_id)
		.bind(answer.question_id)
		.bind(&answer.content)
		.bind(answer.created_at)
		.execute(self.pool)
		.await?;
		Ok(())
	}

	async fn answers_of(
		&self,
		question_id: Uuid,
	) -> Result<Vec<AnswerWithAuthor>, StoreError> {
		let answers: Vec<Answer> = sqlx::query_as(
			"SELECT id, author_id, question_id, content, created_at FROM answers \
			 WHERE question_id = $1 ORDER BY created_at ASC",
		)
		.bind(question_id)
		.fetch_all(self.pool)
		.await?;

		let mut ids: Vec<String> = answers.iter().map(|a| a.author_id.clone()).collect();
		ids.sort();
		ids.dedup();
		let users: Vec<User> = sqlx::query_as("SELECT id, name FROM users WHERE id = ANY($1)")
			.bind(&ids)
			.fetch_all(self.pool)
			.await?;
		let by_id: HashMap<String, User> = users.into_iter().map(|u| (u.id.clone(), u)).collect();

		Ok(answers
			.into_iter()
			.map(|answer| {
				let author = by_id.get(&answer.author_id).cloned();
				AnswerWithAuthor { answer, author }
			})
			.collect())
	}

	async fn user_by_id(
		&self,
		id: &str,
	) -> Result<Option<User>, StoreError> {
		Ok(sqlx::query_as("SELECT id, name FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(self.pool)
			.await?)
	}
}

#[cfg(test)]
mod test {
	use super::substring_pattern;

	#[test]
	fn test_like_wildcards_are_escaped() {
		assert_eq!(substring_pattern("rust"), "%rust%");
		assert_eq!(substring_pattern("100%"), "%100\\%%");
		assert_eq!(substring_pattern("a_b"), "%a\\_b%");
		assert_eq!(substring_pattern("c:\\tmp"), "%c:\\\\tmp%");
	}
}
