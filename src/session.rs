/*!
Keeping track of the active role for the life of a browsing session.

The role is picked once, on the role-picker screen, and written to a
session-scoped key/value store (the browser's `sessionStorage`, or a
`MemoryStorage` here). After that every page asks `RoleSession` for it
instead of prompting again.

Resolution order is:

  1. a role passed explicitly with the current navigation,
  2. whatever was previously persisted in the session,
  3. nothing (`None`).

A role found in navigation state is written back to the session, so it
survives things like a page refresh that drop navigation state.
*/
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::nav::{NavEvent, HOME};
use crate::role::Role;

/// Session storage key under which the role is kept.
pub const ROLE_KEY: &str = "userRole";

/// A key/value store scoped to one browsing context.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// State carried along with a single navigation.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NavState {
    pub role: Option<Role>,
}

impl NavState {
    pub fn with_role(role: Role) -> Self { Self { role: Some(role) } }
}

#[derive(Debug, Default)]
pub struct RoleSession<S: SessionStorage> {
    storage: S,
}

impl<S: SessionStorage> RoleSession<S> {
    pub fn new(storage: S) -> Self { Self { storage } }

    /// Persist `role` for this session and return the navigation to the
    /// home view that should follow the selection.
    pub fn select_role(&mut self, role: Role) -> NavEvent {
        log::trace!("RoleSession::select_role( {} ) called.", &role);

        self.storage.set_item(ROLE_KEY, &role.to_string());
        NavEvent {
            path: HOME.to_owned(),
            state: Some(NavState::with_role(role)),
            replace: false,
        }
    }

    pub fn resolve_role(&mut self, state: Option<&NavState>) -> Option<Role> {
        if let Some(role) = state.and_then(|s| s.role) {
            log::trace!("Role {} resolved from navigation state.", &role);
            self.storage.set_item(ROLE_KEY, &role.to_string());
            return Some(role);
        }

        let stored = self.storage.get_item(ROLE_KEY)?;
        match stored.parse::<Role>() {
            Ok(role) => {
                log::trace!("Role {} resolved from session storage.", &role);
                Some(role)
            },
            Err(e) => {
                log::warn!("Ignoring stored role: {}", &e);
                None
            },
        }
    }

    /// Forget the role; the session goes back to unset.
    pub fn clear(&mut self) {
        log::trace!("RoleSession::clear() called.");
        self.storage.remove_item(ROLE_KEY);
    }

    pub fn storage(&self) -> &S { &self.storage }
}
