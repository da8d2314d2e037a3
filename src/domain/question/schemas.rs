use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Typed creation/update payload. Every field is optional at the boundary;
/// a missing field is treated exactly like an empty string by validation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QuestionForm {
	pub title: Option<String>,
	pub location: Option<String>,
	pub start_at: Option<String>,
	pub end_at: Option<String>,
	pub content: Option<String>,
	pub group_name: Option<String>,
	pub group_explain: Option<String>,
	pub event_type: Option<String>,
	pub event_topic: Option<String>,
	pub event_price: Option<String>,
	pub price: Option<String>,
	pub tags: Option<Vec<String>>,
}

impl QuestionForm {
	/// Checks the seven required fields in fixed priority order and returns
	/// the first failing field's message. Callers surface only one message,
	/// so the ordering is part of the contract.
	pub fn first_error(&self) -> Option<&'static str> {
		if blank(&self.title) {
			return Some("Please enter the event title!");
		}
		if blank(&self.location) {
			return Some("Please enter the event location!");
		}
		if blank(&self.start_at) {
			return Some("Please enter the start time!");
		}
		if blank(&self.end_at) {
			return Some("Please enter the end time!");
		}
		if blank(&self.content) {
			return Some("Please enter the event details!");
		}
		if blank(&self.group_name) {
			return Some("Please enter the organizer name!");
		}
		if blank(&self.group_explain) {
			return Some("Please enter the organizer description!");
		}
		None
	}
}

fn blank(value: &Option<String>) -> bool {
	value.as_deref().unwrap_or_default().trim().is_empty()
}

/// Parses the datetime strings browsers post for event times. Unparseable
/// input falls back to the current time, matching the store defaults.
pub(crate) fn parse_event_time(raw: &str) -> DateTime<Utc> {
	let raw = raw.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return dt.with_timezone(&Utc);
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
		return Utc.from_utc_datetime(&dt);
	}
	if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
		return Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN));
	}
	Utc::now()
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AnswerForm {
	pub content: Option<String>,
}

/// Raw listing query parameters. Kept as strings so that junk values fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
	pub page: Option<String>,
	pub limit: Option<String>,
	pub term: Option<String>,
}

impl ListQuery {
	pub fn page(&self) -> u32 {
		positive_or(&self.page, 1)
	}

	pub fn limit(&self) -> u32 {
		positive_or(&self.limit, 10)
	}

	pub fn term(&self) -> Option<&str> {
		self.term.as_deref().map(str::trim).filter(|t| !t.is_empty())
	}
}

fn positive_or(
	raw: &Option<String>,
	default: u32,
) -> u32 {
	raw.as_deref()
		.and_then(|v| v.trim().parse::<u32>().ok())
		.filter(|v| *v > 0)
		.unwrap_or(default)
}

/// One page of an ordered collection plus the metadata pagination controls
/// need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
	pub page: u32,
	pub limit: u32,
}

impl<T> Page<T> {
	pub fn total_pages(&self) -> u64 {
		let limit = self.limit.max(1) as u64;
		(self.total + limit - 1) / limit
	}
}

/// Upload allow-list for the (currently unwired) image attachment path.
/// If a form ever carries a file again, only these types may be moved out
/// of the temp directory and linked onto `Question::img`.
pub fn image_extension(mime: &str) -> Option<&'static str> {
	match mime {
		"image/jpeg" => Some("jpg"),
		"image/gif" => Some("gif"),
		"image/png" => Some("png"),
		_ => None,
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn complete_form() -> QuestionForm {
		QuestionForm {
			title: Some("Meetup".into()),
			location: Some("Seoul".into()),
			start_at: Some("2024-01-01".into()),
			end_at: Some("2024-01-02".into()),
			content: Some("desc".into()),
			group_name: Some("G".into()),
			group_explain: Some("GE".into()),
			..Default::default()
		}
	}

	#[test]
	fn test_complete_form_passes() {
		assert_eq!(complete_form().first_error(), None);
	}

	#[test]
	fn test_whitespace_only_field_fails() {
		let mut form = complete_form();
		form.group_name = Some("   ".into());
		assert_eq!(form.first_error(), Some("Please enter the organizer name!"));
	}

	#[test]
	fn test_each_missing_field_is_named() {
		let cases: Vec<(fn(&mut QuestionForm), &str)> = vec![
			(|f| f.title = None, "Please enter the event title!"),
			(|f| f.location = None, "Please enter the event location!"),
			(|f| f.start_at = None, "Please enter the start time!"),
			(|f| f.end_at = None, "Please enter the end time!"),
			(|f| f.content = None, "Please enter the event details!"),
			(|f| f.group_name = None, "Please enter the organizer name!"),
			(|f| f.group_explain = None, "Please enter the organizer description!"),
		];
		for (clear, expected) in cases {
			let mut form = complete_form();
			clear(&mut form);
			assert_eq!(form.first_error(), Some(expected));
		}
	}

	#[test]
	fn test_first_failure_wins_over_later_ones() {
		let mut form = complete_form();
		form.location = Some(String::new());
		form.group_explain = None;
		assert_eq!(form.first_error(), Some("Please enter the event location!"));
	}

	#[test]
	fn test_list_query_falls_back_silently() {
		let query = ListQuery {
			page: Some("abc".into()),
			limit: Some("-3".into()),
			term: None,
		};
		assert_eq!(query.page(), 1);
		assert_eq!(query.limit(), 10);

		let query = ListQuery {
			page: Some("0".into()),
			limit: None,
			term: Some("  ".into()),
		};
		assert_eq!(query.page(), 1);
		assert_eq!(query.limit(), 10);
		assert_eq!(query.term(), None);

		let query = ListQuery {
			page: Some("2".into()),
			limit: Some("25".into()),
			term: Some(" rust ".into()),
		};
		assert_eq!(query.page(), 2);
		assert_eq!(query.limit(), 25);
		assert_eq!(query.term(), Some("rust"));
	}

	#[test]
	fn test_parse_event_time_accepts_common_formats() {
		let midnight = parse_event_time("2024-01-01");
		assert_eq!(midnight.to_rfc3339(), "2024-01-01T00:00:00+00:00");

		let with_time = parse_event_time("2024-01-01T09:30");
		assert_eq!(with_time.to_rfc3339(), "2024-01-01T09:30:00+00:00");

		let rfc = parse_event_time("2024-01-01T09:30:00+09:00");
		assert_eq!(rfc.to_rfc3339(), "2024-01-01T00:30:00+00:00");
	}

	#[test]
	fn test_parse_event_time_junk_falls_back_to_now() {
		let before = Utc::now();
		let parsed = parse_event_time("next tuesday");
		assert!(parsed >= before && parsed <= Utc::now());
	}

	#[test]
	fn test_page_metadata() {
		let page = Page::<u32> {
			items: vec![],
			total: 21,
			page: 3,
			limit: 10,
		};
		assert_eq!(page.total_pages(), 3);
	}

	#[test]
	fn test_image_allow_list() {
		assert_eq!(image_extension("image/png"), Some("png"));
		assert_eq!(image_extension("image/jpeg"), Some("jpg"));
		assert_eq!(image_extension("image/gif"), Some("gif"));
		assert_eq!(image_extension("image/svg+xml"), None);
		assert_eq!(image_extension("application/pdf"), None);
	}
}
