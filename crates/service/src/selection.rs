//! Current-quote selection

use swap_types::{Quote, QuoteSet};
use tracing::debug;

/// Resolves the current quote from a ranked set and an optional user override
pub struct SelectionPolicy;

impl SelectionPolicy {
	/// The selected provider's quote if it is present, otherwise the best one
	///
	/// `None` only when `quotes` is empty.
	pub fn select<'a>(quotes: &'a QuoteSet, selected_provider_id: Option<&str>) -> Option<&'a Quote> {
		selected_provider_id
			.and_then(|provider_id| quotes.get(provider_id))
			.or_else(|| quotes.best())
	}

	/// Carry an override over to a freshly published set
	///
	/// The override is dropped when its provider did not quote in `quotes`.
	pub fn reconcile(quotes: &QuoteSet, selected_provider_id: Option<String>) -> Option<String> {
		match selected_provider_id {
			Some(provider_id) if quotes.contains(&provider_id) => Some(provider_id),
			Some(provider_id) => {
				debug!(
					"Selected provider {} missing from new quotes, clearing selection",
					provider_id
				);
				None
			},
			None => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::quote_set;

	#[test]
	fn test_select_best_without_override() {
		let quotes = quote_set(&[("a", 100), ("b", 120)]);
		let current = SelectionPolicy::select(&quotes, None).unwrap();
		assert_eq!(current.provider_id(), "b");
	}

	#[test]
	fn test_select_honours_override() {
		let quotes = quote_set(&[("a", 100), ("b", 120)]);
		let current = SelectionPolicy::select(&quotes, Some("a")).unwrap();
		assert_eq!(current.provider_id(), "a");
	}

	#[test]
	fn test_select_falls_back_when_override_missing() {
		let quotes = quote_set(&[("a", 100), ("b", 120)]);
		let current = SelectionPolicy::select(&quotes, Some("gone")).unwrap();
		assert_eq!(current.provider_id(), "b");
	}

	#[test]
	fn test_select_none_on_empty_set() {
		let quotes = QuoteSet::new();
		assert!(SelectionPolicy::select(&quotes, None).is_none());
		assert!(SelectionPolicy::select(&quotes, Some("a")).is_none());
	}

	#[test]
	fn test_reconcile() {
		let quotes = quote_set(&[("a", 100), ("b", 120)]);
		assert_eq!(
			SelectionPolicy::reconcile(&quotes, Some("a".to_string())),
			Some("a".to_string())
		);
		assert_eq!(SelectionPolicy::reconcile(&quotes, Some("c".to_string())), None);
		assert_eq!(SelectionPolicy::reconcile(&quotes, None), None);
	}
}
