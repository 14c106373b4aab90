//! In-memory user records.
//!
//! [`UserStore`] is an ordered list behind a cloneable handle. It is created
//! once at startup and handed to the router as its state; there is no
//! process-wide instance. Nothing is persisted.
//!
//! Each operation locks the list for its own duration only. There are no
//! transactions spanning several operations: a read followed by a write from
//! another request may interleave with other writers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// A user record. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// The client-supplied part of a user, as accepted by create and update.
///
/// Missing fields fall back to empty strings and `0`. Any `id` in the
/// incoming JSON is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub age: i32,
}

impl UserPayload {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self { name: name.into(), email: email.into(), age }
    }
}

/// Shared handle to the user list.
#[derive(Clone, Debug, Default)]
pub struct UserStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    // Highest id ever handed out, so a deleted id is never issued again.
    last_id: i32,
}

impl UserStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two sample users the service starts with.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.create(UserPayload::new("John Doe", "john.doe@example.com", 30));
        store.create(UserPayload::new("Jane Smith", "jane.smith@example.com", 25));
        store
    }

    /// Every user, in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    /// Appends a new user with id one past the current maximum, or `1` when
    /// the store has never held a user.
    ///
    /// The maximum includes ids that have since been deleted, so ids are
    /// strictly increasing over the life of the store.
    pub fn create(&self, payload: UserPayload) -> User {
        let mut inner = self.lock();
        let max = inner.users.iter().map(|u| u.id).max().unwrap_or(0);
        let id = max.max(inner.last_id) + 1;
        let user = User { id, name: payload.name, email: payload.email, age: payload.age };
        inner.last_id = id;
        inner.users.push(user.clone());
        user
    }

    /// Overwrites name, email and age of the user with `id`. The id stays.
    pub fn update(&self, id: i32, payload: UserPayload) -> Option<User> {
        let mut inner = self.lock();
        let user = inner.users.iter_mut().find(|u| u.id == id)?;
        user.name = payload.name;
        user.email = payload.email;
        user.age = payload.age;
        Some(user.clone())
    }

    /// Removes the user with `id`, returning it if it existed.
    pub fn delete(&self, id: i32) -> Option<User> {
        let mut inner = self.lock();
        let index = inner.users.iter().position(|u| u.id == id)?;
        Some(inner.users.remove(index))
    }

    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().users.is_empty()
    }

    // No code path panics while holding the guard, and every mutation above
    // leaves the list consistent after each statement.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
