use std::sync::Arc;

use async_trait::async_trait;
use axum::{
	extract::{
		ws::{Message, WebSocket},
		FromRequestParts, Path, Query, State, WebSocketUpgrade,
	},
	headers::{authorization::Bearer, Authorization},
	http::{request::Parts, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
	Json, RequestPartsExt, Router, TypedHeader,
};
use futures::{SinkExt, StreamExt};
use uuid::Uuid;

use qna::{
	domain::notify::NotifyHub,
	domain::question::schemas::{AnswerForm, ListQuery, QuestionForm},
	services::handlers::QuestionService,
	services::response::ActionOutcome,
};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<QuestionService>,
	pub hub: Arc<NotifyHub>,
}

/// Authenticated user identity for mutation routes. Session management is
/// an external concern; here the bearer token carries the user id, and a
/// missing token gets the signin redirect the browser flow expects.
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let TypedHeader(Authorization(bearer)) = parts
			.extract::<TypedHeader<Authorization<Bearer>>>()
			.await
			.map_err(|_| {
				(StatusCode::UNAUTHORIZED, Json(ActionOutcome::new("Please signin first.", "/signin"))).into_response()
			})?;
		Ok(CurrentUser(bearer.token().to_string()))
	}
}

async fn list_questions_route(
	State(state): State<AppState>,
	Query(query): Query<ListQuery>,
) -> impl IntoResponse {
	state.service.list_questions(&query).await.map(Json)
}

async fn question_detail_route(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> impl IntoResponse {
	state.service.question_detail(id).await.map(Json)
}

async fn create_question_route(
	State(state): State<AppState>,
	user: CurrentUser,
	Json(form): Json<QuestionForm>,
) -> impl IntoResponse {
	state
		.service
		.create_question(&user.0, form)
		.await
		.map(|_| ActionOutcome::new("Successfully posted", "/questions"))
}

async fn update_question_route(
	State(state): State<AppState>,
	_user: CurrentUser,
	Path(id): Path<Uuid>,
	Json(form): Json<QuestionForm>,
) -> impl IntoResponse {
	state
		.service
		.update_question(id, form)
		.await
		.map(|_| ActionOutcome::new("Successfully updated", "/questions"))
}

async fn delete_question_route(
	State(state): State<AppState>,
	_user: CurrentUser,
	Path(id): Path<Uuid>,
) -> impl IntoResponse {
	state
		.service
		.delete_question(id)
		.await
		.map(|_| ActionOutcome::new("Successfully deleted", "/questions"))
}

async fn post_answer_route(
	State(state): State<AppState>,
	user: CurrentUser,
	Path(id): Path<Uuid>,
	Json(form): Json<AnswerForm>,
) -> impl IntoResponse {
	state
		.service
		.post_answer(&user.0, id, form.content.unwrap_or_default())
		.await
		.map(|_| ActionOutcome::new("Successfully answered", format!("/questions/{id}")))
}

/// Push socket: a connected client receives every notice addressed to its
/// user id, as JSON text frames.
async fn notice_socket_route(
	ws: WebSocketUpgrade,
	user: CurrentUser,
	State(state): State<AppState>,
) -> impl IntoResponse {
	ws.on_upgrade(move |socket| forward_notices(socket, state.hub, user.0))
}

async fn forward_notices(
	socket: WebSocket,
	hub: Arc<NotifyHub>,
	user_id: String,
) {
	let mut rx = hub.subscribe(&user_id).await;
	let (mut sender, mut receiver) = socket.split();

	let mut send_task = tokio::spawn(async move {
		while let Ok(payload) = rx.recv().await {
			if sender.send(Message::Text(payload)).await.is_err() {
				break;
			}
		}
	});

	// The channel is push-only; inbound frames are drained until the
	// client hangs up.
	let mut recv_task = tokio::spawn(async move { while let Some(Ok(_)) = receiver.next().await {} });

	tokio::select! {
		_ = (&mut send_task) => recv_task.abort(),
		_ = (&mut recv_task) => send_task.abort(),
	};
}

pub fn question_routers() -> Router<AppState> {
	Router::new()
		.route("/", get(list_questions_route).post(create_question_route))
		.route("/events", get(notice_socket_route))
		.route(
			"/:id",
			get(question_detail_route).put(update_question_route).delete(delete_question_route),
		)
		.route("/:id/answers", post(post_answer_route))
}
