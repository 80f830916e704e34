//! [`AuthorityStore`]: the effective authority table plus persisted edits.

use std::sync::RwLock;

use tracing::{debug, info, warn};

use super::defaults::default_authorities;
use super::merge::merge;
use super::{
    authorities_for, category_key, AuthoritiesByCategory, Authority, AuthorityPatch,
    OverrideTable,
};
use crate::config::AppConfig;
use crate::errors::{CoreError, DirectoryError};
use crate::storage::{open_backend, KeyValueStore};

/// Storage key of the persisted override table.
pub const OVERRIDES_KEY: &str = "authorities_emails_v1";

/// Authority directory backed by a [`KeyValueStore`].
///
/// Construct one per session and pass it by reference. Nothing is cached
/// between calls: every read merges the defaults with whatever the store
/// currently holds, so an edit is visible on the very next read.
///
/// No method returns an error. Storage failures are logged; when a write
/// fails the table that could not be saved is kept in memory and served
/// until a later write succeeds, so edits still show for the rest of the
/// session but do not survive a restart.
pub struct AuthorityStore<S> {
    store: S,
    key: String,
    unsaved: RwLock<Option<OverrideTable>>,
}

impl<S: KeyValueStore> AuthorityStore<S> {
    /// Create a directory persisting under [`OVERRIDES_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, OVERRIDES_KEY)
    }

    /// Create a directory persisting under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            unsaved: RwLock::new(None),
        }
    }

    /// The key overrides are persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// A fresh copy of the built-in table.
    pub fn get_defaults(&self) -> AuthoritiesByCategory {
        default_authorities()
    }

    /// Read the persisted override table.
    ///
    /// Returns `None` when nothing is stored or the payload cannot be read
    /// or parsed.
    pub fn load_overrides(&self) -> Option<OverrideTable> {
        if let Some(table) = self.unsaved_table() {
            debug!(key = %self.key, "serving unsaved overrides from memory");
            return Some(table);
        }

        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read authority overrides");
                return None;
            }
        };

        match serde_json::from_str::<OverrideTable>(&raw) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring unparseable authority overrides");
                None
            }
        }
    }

    /// Persist `table`, replacing whatever was stored before.
    pub fn save_overrides(&self, table: &OverrideTable) {
        let payload = match serde_json::to_string(table) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize authority overrides");
                self.keep_unsaved(Some(table.clone()));
                return;
            }
        };

        match self.store.set(&self.key, &payload) {
            Ok(()) => {
                debug!(key = %self.key, categories = table.len(), "saved authority overrides");
                self.keep_unsaved(None);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to persist authority overrides, keeping them in memory");
                self.keep_unsaved(Some(table.clone()));
            }
        }
    }

    /// The effective table: defaults merged with stored overrides.
    pub fn all(&self) -> AuthoritiesByCategory {
        merge(self.get_defaults(), self.load_overrides().as_ref())
    }

    /// Authorities for `category`, falling back to the `default` list and
    /// then to an empty list.
    pub fn get_for_category(&self, category: &str) -> Vec<Authority> {
        authorities_for(self.all(), category)
    }

    /// Look up a single authority in `category` (no fallback).
    pub fn find(&self, category: &str, authority_id: &str) -> Option<Authority> {
        self.all()
            .remove(&category_key(category))?
            .into_iter()
            .find(|a| a.id == authority_id)
    }

    /// Set the contact address of one authority.
    ///
    /// The authority is looked up in the category's own list; the default
    /// fallback does not apply here. An unknown category or id leaves
    /// everything untouched. Only the email patch is written, so later
    /// changes to the built-in names and departments still show through.
    pub fn update_email(&self, category: &str, authority_id: &str, email: &str) {
        let key = category_key(category);

        let known = self
            .all()
            .get(&key)
            .is_some_and(|list| list.iter().any(|a| a.id == authority_id));
        if !known {
            debug!(category = %key, authority_id, "no such authority, email unchanged");
            return;
        }

        let mut overrides = self.load_overrides().unwrap_or_default();
        let patches = overrides.entry(key.clone()).or_default();

        let mut matched = false;
        for patch in patches.iter_mut().filter(|p| p.id == authority_id) {
            patch.email = Some(email.to_string());
            matched = true;
        }
        if !matched {
            patches.push(AuthorityPatch::email(authority_id, email));
        }

        info!(category = %key, authority_id, "updating authority email");
        self.save_overrides(&overrides);
    }

    /// Drop every stored override for `category`.
    pub fn reset_category(&self, category: &str) {
        let key = category_key(category);
        let Some(mut overrides) = self.load_overrides() else {
            return;
        };
        if overrides.remove(&key).is_none() {
            return;
        }

        info!(category = %key, "resetting authority overrides for category");
        if overrides.is_empty() {
            self.reset_all();
        } else {
            self.save_overrides(&overrides);
        }
    }

    /// Drop every stored override.
    pub fn reset_all(&self) {
        self.keep_unsaved(None);
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to clear authority overrides");
            self.keep_unsaved(Some(OverrideTable::new()));
        }
    }

    /// Check an email edit before applying it, for front ends that want to
    /// explain why an edit would be a no-op. An empty email (clearing the
    /// address) is accepted.
    pub fn check_email_edit(
        &self,
        category: &str,
        authority_id: &str,
        email: &str,
    ) -> Result<(), DirectoryError> {
        let key = category_key(category);
        let table = self.all();
        let list = table
            .get(&key)
            .ok_or_else(|| DirectoryError::UnknownCategory(key.clone()))?;
        if !list.iter().any(|a| a.id == authority_id) {
            return Err(DirectoryError::AuthorityNotFound {
                category: key,
                id: authority_id.to_string(),
            });
        }
        if !email.is_empty() && !is_plausible_email(email) {
            return Err(DirectoryError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    fn unsaved_table(&self) -> Option<OverrideTable> {
        match self.unsaved.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn keep_unsaved(&self, table: Option<OverrideTable>) {
        match self.unsaved.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
    }
}

impl AuthorityStore<Box<dyn KeyValueStore>> {
    /// Validate `config` and open the directory on the backend it selects,
    /// persisting under the configured overrides key.
    pub fn open(config: &AppConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let backend = open_backend(&config.storage)?;
        info!(
            backend = ?config.storage.backend,
            key = %config.storage.overrides_key,
            "authority directory opened"
        );
        Ok(Self::with_key(backend, config.storage.overrides_key.clone()))
    }
}

/// Loose shape check: one `@`, something before it, a dotted domain after
/// it, no whitespace.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
