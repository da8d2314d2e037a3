pub mod routers;

use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{http::Method, Router};

use qna::{
	adapters::repositories::question_repository::QuestionRepository,
	dependencies::{config, connection_pool},
	domain::notify::NotifyHub,
	services::handlers::QuestionService,
};
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::routers::AppState;

#[tokio::main]
async fn main() {
	dotenv::dotenv().ok();

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			"tracing=debug,tower_http=debug,axum::rejection=trace".into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Connection
	tracing::info!("Connections Are Being Pooled...");
	let pool = connection_pool().await;
	sqlx::migrate!().run(pool).await.expect("migrations failed");

	let hub = Arc::new(NotifyHub::default());
	let service = Arc::new(QuestionService::new(Arc::new(QuestionRepository::new().await), hub.clone()));
	let state = AppState { service, hub };

	let routers = Router::new().nest("/questions", routers::question_routers()).with_state(state);

	let app = Router::new()
		.merge(routers)
		.layer(
			CorsLayer::new()
				.allow_origin(AllowOrigin::list(config().allowed_origins()))
				.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE]),
		)
		.layer(TraceLayer::new_for_http());

	tracing::info!("Start Web Server...");
	axum::Server::bind(&SocketAddr::from_str(&config().server_ip_port).unwrap())
		.serve(app.into_make_service())
		.await
		.unwrap();
}
