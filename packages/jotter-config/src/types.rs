use serde::Deserialize;

pub const DEFAULT_USER_HEADER: &str = "X-Jotter-User-Id";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	#[serde(default)]
	pub backend: StorageBackend,
	/// Required when `backend = "postgres"`.
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	#[default]
	Postgres,
	/// Process-local storage. Everything is lost on restart.
	Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
	/// Shared bearer token expected from the gateway in front of the API. Blank disables it.
	pub api_auth_token: Option<String>,
	/// Header carrying the subject the identity provider authenticated.
	#[serde(default = "default_user_header")]
	pub user_header: String,
}
impl Default for Security {
	fn default() -> Self {
		Self {
			bind_localhost_only: default_true(),
			api_auth_token: None,
			user_header: default_user_header(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_pool_max_conns() -> u32 {
	5
}

fn default_true() -> bool {
	true
}

fn default_user_header() -> String {
	DEFAULT_USER_HEADER.to_string()
}
