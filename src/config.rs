use axum::http::HeaderValue;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Address the web server is listening on
	pub server_ip_port: String,
	pub database_url: String,
	pub allow_origins: String,
}

impl Config {
	pub fn new() -> Config {
		dotenv::dotenv().ok();
		let log_level = std::env::var("LOG_LEVEL").unwrap_or("warn".to_string());
		let server_ip_port = std::env::var("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set!");
		let allow_origins = std::env::var("ALLOW_ORIGINS").unwrap_or("http://localhost:3000,http://localhost:3001".to_string());

		Config {
			log_level,
			server_ip_port,
			database_url,
			allow_origins,
		}
	}

	/// `ALLOW_ORIGINS` is a comma-separated list; CORS needs each origin as
	/// its own header value.
	pub fn allowed_origins(&self) -> Vec<HeaderValue> {
		self.allow_origins
			.split(',')
			.map(str::trim)
			.filter(|origin| !origin.is_empty())
			.map(|origin| origin.parse().expect("invalid origin in ALLOW_ORIGINS"))
			.collect()
	}
}

#[cfg(test)]
mod test {
	use super::Config;

	#[test]
	fn test_each_configured_origin_becomes_its_own_header_value() {
		let config = Config {
			log_level: "warn".into(),
			server_ip_port: "0.0.0.0:80".into(),
			database_url: "postgres://localhost/qna".into(),
			allow_origins: "http://localhost:3000, http://localhost:3001".into(),
		};
		let origins = config.allowed_origins();
		assert_eq!(origins.len(), 2);
		assert_eq!(origins[0], "http://localhost:3000");
		assert_eq!(origins[1], "http://localhost:3001");
	}
}
