use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{parse_event_time, QuestionForm};

/// An event-style listing posted by a user. Counters are denormalized:
/// `num_answers` is bumped on each posted answer and `num_reads` on each
/// detail view, never recomputed from the store.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, FromRow)]
pub struct Question {
	pub id: Uuid,
	pub author_id: String,
	pub title: String,
	pub content: String,
	pub location: String,
	pub start_at: DateTime<Utc>,
	pub end_at: DateTime<Utc>,
	pub group_name: String,
	pub group_explain: String,
	pub event_type: Option<String>,
	pub event_topic: Option<String>,
	pub event_price: Option<String>,
	pub price: String,
	pub tags: Vec<String>,
	pub num_likes: i64,
	pub num_answers: i64,
	pub num_reads: i64,
	pub img: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl Question {
	pub fn new(
		author_id: &str,
		form: QuestionForm,
	) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			author_id: author_id.to_string(),
			title: trimmed(form.title),
			content: trimmed(form.content),
			location: trimmed(form.location),
			start_at: form.start_at.as_deref().map(parse_event_time).unwrap_or(now),
			end_at: form.end_at.as_deref().map(parse_event_time).unwrap_or(now),
			group_name: trimmed(form.group_name),
			group_explain: trimmed(form.group_explain),
			event_type: form.event_type,
			event_topic: form.event_topic,
			event_price: form.event_price,
			price: form.price.unwrap_or_else(|| "0".to_string()),
			tags: form.tags.unwrap_or_default(),
			num_likes: 0,
			num_answers: 0,
			num_reads: 0,
			img: None,
			created_at: now,
		}
	}

	/// Replaces every mutable descriptive field from the form. Counters,
	/// author, tags, image and timestamps of record-keeping stay untouched.
	/// Absent datetime fields keep their previous value.
	pub fn overwrite(
		&mut self,
		form: QuestionForm,
	) {
		self.title = trimmed(form.title);
		self.content = trimmed(form.content);
		self.location = trimmed(form.location);
		self.start_at = form.start_at.as_deref().map(parse_event_time).unwrap_or(self.start_at);
		self.end_at = form.end_at.as_deref().map(parse_event_time).unwrap_or(self.end_at);
		self.group_name = trimmed(form.group_name);
		self.group_explain = trimmed(form.group_explain);
		self.event_type = form.event_type;
		self.event_topic = form.event_topic;
		self.event_price = form.event_price;
		self.price = form.price.unwrap_or_default();
	}
}

fn trimmed(value: Option<String>) -> String {
	value.as_deref().unwrap_or_default().trim().to_string()
}

/// A comment attached to exactly one question. Created through the
/// post-answer operation only; never updated or deleted here.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, FromRow)]
pub struct Answer {
	pub id: Uuid,
	pub author_id: String,
	pub question_id: Uuid,
	pub content: String,
	pub created_at: DateTime<Utc>,
}

impl Answer {
	pub fn new(
		author_id: &str,
		question_id: Uuid,
		content: String,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			author_id: author_id.to_string(),
			question_id,
			content,
			created_at: Utc::now(),
		}
	}
}

/// Read-only projection of the external user record. This crate looks
/// users up by id and never writes them.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, FromRow)]
pub struct User {
	pub id: String,
	pub name: String,
}

/// A question with its author reference expanded. The author may be
/// missing if the user record has gone away.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionWithAuthor {
	pub question: Question,
	pub author: Option<User>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerWithAuthor {
	pub answer: Answer,
	pub author: Option<User>,
}
