//! Wire types for the meeting backend's JSON API.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A selectable persona. `name` is the unique key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub role: String,
    pub expertise: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

/// A JSON object decoded as a list of `(key, value)` pairs in document order.
///
/// The backend sends name-keyed objects for the roster and for replies, and
/// the display order follows the object's key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ordered<T>(pub Vec<(String, T)>);

impl<T> Ordered<T> {
    pub fn into_inner(self) -> Vec<(String, T)> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }
}

impl<T> FromIterator<(String, T)> for Ordered<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Ordered(iter.into_iter().collect())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// Body of `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub selected_members: Vec<String>,
}

/// Successful `POST /api/chat` response.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    /// participant name → reply text
    pub responses: Ordered<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub conversation_id: Option<u64>,
}

impl ChatReply {
    /// Requested members the backend did not answer for. The backend's own
    /// `participants` echo counts as requested when it is present.
    pub fn unanswered<'a>(&'a self, requested: &'a [String]) -> Vec<&'a str> {
        let expected = if self.participants.is_empty() {
            requested
        } else {
            self.participants.as_slice()
        };
        expected
            .iter()
            .map(String::as_str)
            .filter(|name| !self.responses.contains_key(name))
            .collect()
    }
}

/// One exchange from a participant's conversation log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub user_message: String,
    pub response: String,
}

/// Successful `GET /api/member-memory/{name}` response. Not cached.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub name: String,
    #[serde(default)]
    pub memory: Vec<String>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

/// `{ "error": "..." }` body the backend sends alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub error: String,
}
