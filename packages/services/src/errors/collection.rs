use std::fmt;

/// Key of an entry in an [`ErrorCollection`].
///
/// Appended entries get the next integer index; callers may also file
/// entries under a name, e.g. the form field that failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        ErrorKey::Index(index)
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        ErrorKey::Name(name.to_string())
    }
}

impl From<String> for ErrorKey {
    fn from(name: String) -> Self {
        ErrorKey::Name(name)
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Index(i) => write!(f, "{}", i),
            ErrorKey::Name(name) => f.write_str(name),
        }
    }
}

/// Something that can be added to an [`ErrorCollection`].
#[derive(Debug, Clone)]
pub enum ErrorItem {
    /// A single user-facing message
    Message(String),
    /// Another collection whose entries are inlined
    Collection(ErrorCollection),
}

impl ErrorItem {
    /// Captures the display message of an error value.
    pub fn from_error(e: &dyn std::error::Error) -> Self {
        ErrorItem::Message(e.to_string())
    }
}

impl From<&str> for ErrorItem {
    fn from(message: &str) -> Self {
        ErrorItem::Message(message.to_string())
    }
}

impl From<String> for ErrorItem {
    fn from(message: String) -> Self {
        ErrorItem::Message(message)
    }
}

impl From<ErrorCollection> for ErrorItem {
    fn from(collection: ErrorCollection) -> Self {
        ErrorItem::Collection(collection)
    }
}

impl From<&ErrorCollection> for ErrorItem {
    fn from(collection: &ErrorCollection) -> Self {
        ErrorItem::Collection(collection.clone())
    }
}

/// An ordered list of user-facing error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCollection {
    entries: Vec<(ErrorKey, String)>,
    next_index: usize,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message, or every message of a nested collection.
    ///
    /// Nested collections are flattened: their entries are appended one by
    /// one and get fresh indexes in this collection.
    pub fn add(&mut self, item: impl Into<ErrorItem>) {
        match item.into() {
            ErrorItem::Message(message) => self.append(message),
            ErrorItem::Collection(other) => {
                for (_, message) in other.entries {
                    self.append(message);
                }
            }
        }
    }

    pub fn add_error(&mut self, e: &dyn std::error::Error) {
        self.add(ErrorItem::from_error(e));
    }

    /// Appends a message under the next integer index.
    ///
    /// Once an entry sits at `usize::MAX` there is no next index; the
    /// message is dropped with a warning instead of overwriting that entry.
    pub fn append(&mut self, message: impl Into<String>) {
        let key = ErrorKey::Index(self.next_index);
        if self.entries.iter().any(|(k, _)| *k == key) {
            tracing::warn!(index = self.next_index, "no free index left, dropping error message");
            return;
        }
        self.next_index = self.next_index.saturating_add(1);
        self.entries.push((key, message.into()));
    }

    /// Stores `message` under `key`, replacing an existing entry in place.
    pub fn set(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        let key = key.into();
        if let ErrorKey::Index(index) = key {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }

        let message = message.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((key, message)),
        }
    }

    /// Returns the message under `key`, or `None` when there is none.
    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&str> {
        let key = key.into();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains_key(&self, key: impl Into<ErrorKey>) -> bool {
        let key = key.into();
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Removes and returns the message under `key`.
    pub fn remove(&mut self, key: impl Into<ErrorKey>) -> Option<String> {
        let key = key.into();
        let position = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_index = 0;
    }

    /// Whether at least one error has been registered.
    pub fn has(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of all messages in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, message)| message.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ErrorKey, &str)> {
        self.entries.iter().map(|(key, message)| (key, message.as_str()))
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list().join(", "))
    }
}

impl<I: Into<ErrorItem>> Extend<I> for ErrorCollection {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<I: Into<ErrorItem>> FromIterator<I> for ErrorCollection {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut collection = ErrorCollection::new();
        collection.extend(iter);
        collection
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
