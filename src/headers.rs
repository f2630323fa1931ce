use crate::constants::header;
use crate::util::normalize_lower;
use indexmap::IndexMap;

/// Ordered multimap of header names to values.
///
/// Names keep the casing they were first inserted with but are matched
/// case-insensitively. Values of a multi-valued header keep insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    entries: IndexMap<String, HeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Adds a value, keeping any values already stored under the name.
    pub fn append<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        self.entries
            .entry(normalize_lower(&name))
            .or_insert_with(|| HeaderEntry {
                name,
                values: Vec::with_capacity(1),
            })
            .values
            .push(value);
    }

    /// Replaces every value stored under the name.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let key = normalize_lower(&name);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.values.clear();
                entry.values.push(value.into());
            }
            None => {
                self.entries.insert(
                    key,
                    HeaderEntry {
                        name,
                        values: vec![value.into()],
                    },
                );
            }
        }
    }

    /// First value stored under the name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&normalize_lower(name))
            .and_then(|entry| entry.values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&normalize_lower(name))
            .map(|entry| entry.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_lower(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries
            .shift_remove(&normalize_lower(name))
            .map(|entry| entry.values)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Merges a token into the `Vary` header, ignoring case-insensitive
    /// duplicates and blank input.
    pub fn add_vary<S: AsRef<str>>(&mut self, value: S) {
        let mut entries: Vec<String> = self
            .get_all(header::VARY)
            .iter()
            .flat_map(|existing| existing.split(','))
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        let incoming = value.as_ref().trim();
        if !incoming.is_empty() {
            entries.push(incoming.to_string());
        }

        if entries.is_empty() {
            self.remove(header::VARY);
            return;
        }

        let mut deduped: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            if deduped
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&entry))
            {
                continue;
            }
            deduped.push(entry);
        }

        self.insert(header::VARY, deduped.join(", "));
    }

    /// Appends every value of `other`, routing `Vary` through [`Self::add_vary`].
    pub fn extend(&mut self, other: HeaderMap) {
        for entry in other.entries.into_values() {
            if entry.name.eq_ignore_ascii_case(header::VARY) {
                for value in entry.values {
                    self.add_vary(value);
                }
            } else {
                for value in entry.values {
                    self.append(entry.name.clone(), value);
                }
            }
        }
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;
