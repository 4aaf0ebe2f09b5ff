mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_USER_HEADER, Postgres, Security, Service, Storage, StorageBackend,
};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let http_addr = http_addr(cfg)?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	match (cfg.storage.backend, cfg.storage.postgres.as_ref()) {
		(StorageBackend::Postgres, None) => {
			return Err(Error::Validation {
				message: "storage.postgres is required when storage.backend is postgres."
					.to_string(),
			});
		},
		(_, Some(postgres)) => {
			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		(StorageBackend::Memory, None) => {},
	}

	let header = cfg.security.user_header.trim();

	if header.is_empty() {
		return Err(Error::Validation {
			message: "security.user_header must be non-empty.".to_string(),
		});
	}
	if !header.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_') {
		return Err(Error::Validation {
			message: "security.user_header must be a valid HTTP header name.".to_string(),
		});
	}

	Ok(())
}

/// Parsed `service.http_bind`.
pub fn http_addr(cfg: &Config) -> Result<SocketAddr> {
	cfg.service.http_bind.parse().map_err(|err| Error::InvalidAddress {
		field: "service.http_bind",
		value: cfg.service.http_bind.clone(),
		source: err,
	})
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}

	cfg.security.user_header = cfg.security.user_header.trim().to_string();
}
