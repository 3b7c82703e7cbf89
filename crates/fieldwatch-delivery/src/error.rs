// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for delivery operations.

use thiserror::Error;

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Errors that can occur while sending a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("channel API error {code}: {description}")]
	Api { code: i32, description: String },

	#[error("malformed channel response: {0}")]
	Decode(#[from] serde_json::Error),
}

impl DeliveryError {
	/// Whether the failure is worth retrying.
	///
	/// Network faults, rate limits, and server-side errors are transient;
	/// a 4xx rejection (unknown chat, bot blocked) is permanent and must
	/// not hot-loop the retry path.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Network(_) => true,
			Self::Api { code, .. } => *code == 429 || *code >= 500,
			Self::Decode(_) => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rate_limit_and_server_errors_are_transient() {
		assert!(DeliveryError::Api {
			code: 429,
			description: "Too Many Requests".into()
		}
		.is_transient());
		assert!(DeliveryError::Api {
			code: 502,
			description: "Bad Gateway".into()
		}
		.is_transient());
	}

	#[test]
	fn client_rejections_are_permanent() {
		assert!(!DeliveryError::Api {
			code: 400,
			description: "chat not found".into()
		}
		.is_transient());
		assert!(!DeliveryError::Api {
			code: 403,
			description: "bot was blocked by the user".into()
		}
		.is_transient());
	}
}
