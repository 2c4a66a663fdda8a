use std::collections::HashMap;
use std::sync::Arc;

/// Data handed to a template when it is rendered.
pub type Model = HashMap<String, serde_json::Value>;

/// A single key/value pair inside [`KeyValues`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
	pub key: String,
	pub value: serde_json::Value,
}

/// An immutable, ordered list of key/value pairs used to enrich a [`Model`]
/// before rendering.
///
/// Duplicate keys are allowed. They are only resolved when the list is
/// flattened into a model: [`KeyValues::apply_overrides`] lets the last entry
/// for a key win, [`KeyValues::apply_defaults`] never touches keys the model
/// already has.
///
/// Entries live behind an [`Arc`], so cloning is cheap and the combinators
/// hand back an existing list instead of copying whenever one side is empty.
///
/// ```rust
/// use thoth_core::KeyValues;
/// use thoth_core::Model;
///
/// let kv = KeyValues::from_iter([("env", "prod"), ("region", "us-east")]);
/// let mut model = Model::new();
/// model.insert("env".into(), "dev".into());
///
/// kv.apply_defaults(&mut model);
/// assert_eq!(model["env"], "dev");
/// assert_eq!(model["region"], "us-east");
///
/// kv.apply_overrides(&mut model);
/// assert_eq!(model["env"], "prod");
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyValues {
	entries: Arc<[KeyValue]>,
}

impl KeyValues {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
		self.entries.iter()
	}

	/// True when both lists share the same underlying entries.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.entries, &other.entries)
	}

	/// Add the pairs from `more` after this list's entries.
	///
	/// Returns `self` unchanged when `more` is empty. The order of pairs taken
	/// from `more` follows the model's iteration order.
	#[must_use]
	pub fn append(&self, more: &Model) -> Self {
		if more.is_empty() {
			return self.clone();
		}

		let mut merged = Vec::with_capacity(self.entries.len() + more.len());
		merged.extend(self.entries.iter().cloned());
		merged.extend(more.iter().map(|(key, value)| {
			KeyValue {
				key: key.clone(),
				value: value.clone(),
			}
		}));

		Self {
			entries: merged.into(),
		}
	}

	/// Add the entries of `more` after this list's entries.
	///
	/// When either side is empty the other side is returned as-is.
	#[must_use]
	pub fn extend(&self, more: &Self) -> Self {
		if self.entries.is_empty() {
			return more.clone();
		}

		if more.entries.is_empty() {
			return self.clone();
		}

		let mut merged = Vec::with_capacity(self.entries.len() + more.entries.len());
		merged.extend(self.entries.iter().cloned());
		merged.extend(more.entries.iter().cloned());

		Self {
			entries: merged.into(),
		}
	}

	/// Set each key that `model` doesn't already contain.
	pub fn apply_defaults(&self, model: &mut Model) {
		for entry in self.entries.iter() {
			if !model.contains_key(&entry.key) {
				model.insert(entry.key.clone(), entry.value.clone());
			}
		}
	}

	/// Set every key, in entry order.
	pub fn apply_overrides(&self, model: &mut Model) {
		for entry in self.entries.iter() {
			model.insert(entry.key.clone(), entry.value.clone());
		}
	}
}

impl<K, V> FromIterator<(K, V)> for KeyValues
where
	K: Into<String>,
	V: Into<serde_json::Value>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let entries: Vec<KeyValue> = iter
			.into_iter()
			.map(|(key, value)| {
				KeyValue {
					key: key.into(),
					value: value.into(),
				}
			})
			.collect();

		Self {
			entries: entries.into(),
		}
	}
}

impl From<&Model> for KeyValues {
	fn from(model: &Model) -> Self {
		Self::new().append(model)
	}
}
