//! The session registry: the one table shared by every connection.
//!
//! The registry maps each live session to its display name (absent until the
//! session registers) and keeps a reverse name index. Both maps live behind a
//! single `RwLock` and every public operation takes that lock exactly once,
//! so each operation is atomic with respect to all others:
//!
//! - two concurrent `try_register` calls for one name cannot both succeed
//! - a [`Snapshot`] is an owned copy, so later changes never show through it
//! - callers never see or iterate the underlying maps

use super::{SessionHandle, SessionId};
use chat_proto::RESERVED_NAME;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Point-in-time copy of every registered session and its name, in
/// connection order.
pub type Snapshot = Vec<(SessionHandle, String)>;

struct Entry {
    handle: SessionHandle,
    name: Option<String>,
}

#[derive(Default)]
struct Tables {
    sessions: BTreeMap<SessionId, Entry>,
    names: HashMap<String, SessionId>,
}

/// Shared table of live sessions and their display names.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Tables>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly accepted session with no name.
    pub fn insert(&self, handle: SessionHandle) {
        let mut inner = self.inner.write();
        inner
            .sessions
            .insert(handle.id(), Entry { handle, name: None });
    }

    /// Assign `name` to session `id`.
    ///
    /// Fails without changing anything if the name is empty, reserved, held
    /// by any session (the caller included), or if `id` is not in the table.
    /// On success a previously held name is released.
    pub fn try_register(&self, id: SessionId, name: &str) -> bool {
        if name.is_empty() || name == RESERVED_NAME {
            return false;
        }

        let mut inner = self.inner.write();
        let Tables { sessions, names } = &mut *inner;

        if names.contains_key(name) {
            return false;
        }
        let Some(entry) = sessions.get_mut(&id) else {
            return false;
        };

        if let Some(old) = entry.name.replace(name.to_string()) {
            names.remove(&old);
        }
        names.insert(name.to_string(), id);
        crate::metrics::set_registered(names.len());
        true
    }

    /// Remove session `id`. Returns the name it held, if any.
    ///
    /// Removing an absent session is a no-op that returns `None`.
    pub fn remove(&self, id: SessionId) -> Option<String> {
        let mut inner = self.inner.write();
        let entry = inner.sessions.remove(&id)?;
        let name = entry.name?;
        inner.names.remove(&name);
        crate::metrics::set_registered(inner.names.len());
        Some(name)
    }

    /// The session currently holding `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<SessionHandle> {
        let inner = self.inner.read();
        let id = inner.names.get(name)?;
        inner.sessions.get(id).map(|entry| entry.handle.clone())
    }

    /// Copy out every registered session with its name.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        inner
            .sessions
            .values()
            .filter_map(|entry| {
                entry
                    .name
                    .as_ref()
                    .map(|name| (entry.handle.clone(), name.clone()))
            })
            .collect()
    }

    /// Number of live sessions, registered or not.
    pub fn len(&self) -> usize {
        self.inner.read().sessions.len()
    }

    /// Number of sessions holding a name.
    pub fn registered_count(&self) -> usize {
        self.inner.read().names.len()
    }
}
