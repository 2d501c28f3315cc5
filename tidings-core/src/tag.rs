//! Notification names.

use std::{borrow::Borrow, fmt, sync::Arc};

/// The name producers and consumers agree on for a logical notification.
///
/// Equality is byte-exact and case-sensitive. Cloning is O(1).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationTag(Arc<str>);

impl NotificationTag {
    /// Creates a tag from any string.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NotificationTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NotificationTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NotificationTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NotificationTag {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq<str> for NotificationTag {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NotificationTag {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for NotificationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NotificationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_tag_is_case_sensitive() {
        assert_ne!(NotificationTag::from("Saved"), NotificationTag::from("saved"));
        assert_eq!(NotificationTag::from("saved"), "saved");
    }

    #[test]
    fn test_tag_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(NotificationTag::from("order.created"), 1);
        assert_eq!(map.get("order.created"), Some(&1));
        assert_eq!(map.get("order.Created"), None);
    }
}
