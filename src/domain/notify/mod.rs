pub mod schemas;

use std::collections::{hash_map::Entry, HashMap};

use tokio::sync::{broadcast, Mutex};

use self::schemas::Notice;

/// Process-wide push channel, addressable by user identity. Each user id
/// owns one broadcast channel; every connected session of that user holds
/// a receiver. Delivery is fire-and-forget: a notice to a user with no
/// open session is dropped.
#[derive(Default)]
pub struct NotifyHub {
	channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
}

impl NotifyHub {
	/// Hands out a receiver for the user's channel, creating the channel on
	/// first use.
	pub async fn subscribe(
		&self,
		user_id: &str,
	) -> broadcast::Receiver<String> {
		match self.channels.lock().await.entry(user_id.to_string()) {
			Entry::Occupied(occupied_entry) => occupied_entry.get().subscribe(),
			Entry::Vacant(vacant_entry) => {
				let (tx, rx) = broadcast::channel(100);
				vacant_entry.insert(tx);
				rx
			}
		}
	}

	/// Sends a notice to every open session of the target user. Never
	/// fails: serialization problems and absent subscribers are logged and
	/// swallowed so the calling operation cannot be poisoned by delivery.
	pub async fn notify(
		&self,
		target: &str,
		notice: Notice,
	) {
		let payload = match serde_json::to_string(&notice) {
			Ok(payload) => payload,
			Err(err) => {
				tracing::error!("failed to serialize `{}` notice for {target}: {err}", notice.event());
				return;
			}
		};
		let guard = self.channels.lock().await;
		match guard.get(target) {
			Some(tx) => {
				if let Err(err) = tx.send(payload) {
					tracing::debug!("no live session for {target}, dropping notice: {err}");
				}
			}
			None => {
				tracing::debug!("user {target} has never connected, dropping `{}` notice", notice.event());
			}
		}
	}
}
