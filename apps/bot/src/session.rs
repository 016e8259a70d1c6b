use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use teloxide::types::{ChatId, MessageId};
use tokio::sync::Mutex;

/// A menu message identifies one booking conversation.
pub type SessionKey = (ChatId, MessageId);

/// Partially collected booking attributes. Choosing the time completes the
/// selection, so it is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub service_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// A selection with every step filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedSelection {
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// In-memory selection state, lost on restart.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<SessionKey, Selection>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a conversation on the given menu message.
    pub async fn begin(&self, key: SessionKey) {
        self.inner.lock().await.insert(key, Selection::default());
    }

    pub async fn get(&self, key: SessionKey) -> Option<Selection> {
        self.inner.lock().await.get(&key).cloned()
    }

    /// Returns `None` when no session exists for the message.
    pub async fn choose_service(&self, key: SessionKey, service_id: i64) -> Option<Selection> {
        let mut map = self.inner.lock().await;
        let sel = map.get_mut(&key)?;
        *sel = Selection {
            service_id: Some(service_id),
            date: None,
        };
        Some(sel.clone())
    }

    /// Requires a chosen service.
    pub async fn choose_date(&self, key: SessionKey, date: NaiveDate) -> Option<Selection> {
        let mut map = self.inner.lock().await;
        let sel = map.get_mut(&key)?;
        if sel.service_id.is_none() {
            return None;
        }
        sel.date = Some(date);
        Some(sel.clone())
    }

    /// Fill the last step and remove the session. Requires service and date.
    pub async fn complete(&self, key: SessionKey, time: NaiveTime) -> Option<CompletedSelection> {
        let mut map = self.inner.lock().await;
        let sel = map.get(&key)?;
        let done = CompletedSelection {
            service_id: sel.service_id?,
            date: sel.date?,
            time,
        };
        map.remove(&key);
        Some(done)
    }

    pub async fn clear(&self, key: SessionKey) {
        self.inner.lock().await.remove(&key);
    }
}
