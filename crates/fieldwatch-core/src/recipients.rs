// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recipient sets for fan-out delivery.

use crate::ids::ChatId;
use serde::{Deserialize, Serialize};

/// One or many delivery recipients.
///
/// Delivery to a set must attempt every member independently: one member's
/// permanent failure must not block the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientSet(Vec<ChatId>);

impl RecipientSet {
	pub fn new(chats: Vec<ChatId>) -> Self {
		Self(chats)
	}

	pub fn single(chat: ChatId) -> Self {
		Self(vec![chat])
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = ChatId> + '_ {
		self.0.iter().copied()
	}
}

impl From<ChatId> for RecipientSet {
	fn from(chat: ChatId) -> Self {
		Self::single(chat)
	}
}

impl From<Vec<ChatId>> for RecipientSet {
	fn from(chats: Vec<ChatId>) -> Self {
		Self::new(chats)
	}
}

impl From<Vec<i64>> for RecipientSet {
	fn from(chats: Vec<i64>) -> Self {
		Self(chats.into_iter().map(ChatId).collect())
	}
}

impl IntoIterator for RecipientSet {
	type Item = ChatId;
	type IntoIter = std::vec::IntoIter<ChatId>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_and_list_forms() {
		let one = RecipientSet::from(ChatId(42));
		assert_eq!(one.len(), 1);

		let many: RecipientSet = vec![1i64, 2, 3].into();
		assert_eq!(many.len(), 3);
		assert_eq!(many.iter().collect::<Vec<_>>(), vec![ChatId(1), ChatId(2), ChatId(3)]);
	}
}
