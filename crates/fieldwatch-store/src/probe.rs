// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reachability probing for equipment checks.
//!
//! The probe is a black-box predicate: reachable or not, within a bounded
//! timeout. An unreachable device is the signal the monitors are built to
//! detect, not an error.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// A reachability predicate for a device endpoint.
#[async_trait]
pub trait Prober: Send + Sync {
	/// Whether the endpoint answered within the probe's timeout.
	async fn is_reachable(&self, addr: &str) -> bool;
}

/// TCP connect probe with a bounded timeout.
///
/// Stands in for an ICMP ping, which would need raw-socket privileges;
/// the equipment we probe all exposes a TCP service on a known port.
#[derive(Debug, Clone)]
pub struct TcpProber {
	port: u16,
	timeout: Duration,
}

impl TcpProber {
	pub fn new(port: u16, timeout: Duration) -> Self {
		Self { port, timeout }
	}
}

impl Default for TcpProber {
	fn default() -> Self {
		Self {
			port: 80,
			timeout: Duration::from_secs(3),
		}
	}
}

#[async_trait]
impl Prober for TcpProber {
	async fn is_reachable(&self, addr: &str) -> bool {
		let target = if addr.contains(':') {
			addr.to_string()
		} else {
			format!("{}:{}", addr, self.port)
		};
		match tokio::time::timeout(self.timeout, TcpStream::connect(&target)).await {
			Ok(Ok(_)) => true,
			Ok(Err(e)) => {
				debug!(addr = %target, error = %e, "probe connect failed");
				false
			}
			Err(_) => {
				debug!(addr = %target, "probe timed out");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::net::TcpListener;

	#[tokio::test]
	async fn reachable_when_something_listens() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();

		let prober = TcpProber::new(addr.port(), Duration::from_secs(1));
		assert!(prober.is_reachable(&addr.to_string()).await);
	}

	#[tokio::test]
	async fn unreachable_when_nothing_listens() {
		// Bind then drop to find a port that is very likely closed.
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let prober = TcpProber::new(addr.port(), Duration::from_millis(500));
		assert!(!prober.is_reachable(&addr.to_string()).await);
	}
}
