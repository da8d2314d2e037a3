use serde::{Deserialize, Serialize};

use crate::domain::question::entity::Question;

/// Wire schema for the push channel. The `event` tag is what a browser
/// client dispatches on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notice {
	/// Someone answered the target user's question. `url` points at the
	/// question detail anchored at the new answer; `question` carries the
	/// state after the answer counter was bumped.
	Answered { url: String, question: Question },
}

impl Notice {
	pub fn event(&self) -> &'static str {
		match self {
			Self::Answered { .. } => "answered",
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::domain::question::schemas::QuestionForm;

	#[test]
	fn test_notice_wire_representation() {
		let question = Question::new(
			"owner",
			QuestionForm {
				title: Some("Meetup".into()),
				location: Some("Seoul".into()),
				start_at: Some("2024-01-01".into()),
				end_at: Some("2024-01-02".into()),
				content: Some("desc".into()),
				group_name: Some("G".into()),
				group_explain: Some("GE".into()),
				..Default::default()
			},
		);
		let url = format!("/questions/{}#anchor", question.id);
		let notice = Notice::Answered { url, question: question.clone() };
		assert_eq!(notice.event(), "answered");

		let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&notice).unwrap()).unwrap();
		assert_eq!(value["event"], "answered");
		assert_eq!(value["question"]["title"], "Meetup");
		assert_eq!(value["question"]["num_answers"], 0);
	}
}
