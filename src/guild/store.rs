//! Per-server settings storage with admin mutators

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::ids::{ChannelId, GuildId, RoleId};

use super::backend::SettingsBackend;
use super::types::{GuildSettings, SettingsDocument, SettingsError, SettingsResult};

/// In-memory settings for every server, persisted on each mutation.
///
/// Reads never fail: an unknown server yields the default record. Mutations
/// are serialized so each read-modify-persist sequence completes before the
/// next one starts.
pub struct SettingsStore {
    settings: DashMap<GuildId, GuildSettings>,
    backend: Arc<dyn SettingsBackend>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Load every server's settings from the backend
    pub fn load(backend: Arc<dyn SettingsBackend>) -> SettingsResult<Self> {
        let document = backend.load_all()?;
        tracing::info!(
            backend = backend.name(),
            guilds = document.len(),
            "Settings store initialized"
        );

        Ok(Self {
            settings: document.into_iter().collect(),
            backend,
            write_lock: Mutex::new(()),
        })
    }

    /// Settings for a server (default record if never configured)
    pub fn get(&self, guild_id: GuildId) -> GuildSettings {
        self.settings
            .get(&guild_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of servers with a stored record
    pub fn guild_count(&self) -> usize {
        self.settings.len()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Copy of the whole store in persisted form
    pub fn snapshot(&self) -> SettingsDocument {
        self.settings
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Replace the admin role list. Callers must check platform administrator
    /// rights themselves.
    pub fn set_admin_roles(&self, guild_id: GuildId, role_ids: Vec<RoleId>) -> SettingsResult<()> {
        self.mutate(guild_id, |settings| {
            settings.admin_role_ids = role_ids;
            Ok(())
        })?;
        tracing::info!(guild_id = %guild_id, "Admin roles updated");
        Ok(())
    }

    /// Set the notify role. Fails with `AlreadySet` (leaving the stored role
    /// untouched) until the current one is cleared.
    pub fn set_notify_role(&self, guild_id: GuildId, role_id: RoleId) -> SettingsResult<()> {
        self.mutate(guild_id, |settings| match settings.notify_role_id {
            Some(existing) => Err(SettingsError::AlreadySet(existing)),
            None => {
                settings.notify_role_id = Some(role_id);
                Ok(())
            }
        })?;
        tracing::info!(guild_id = %guild_id, role_id = %role_id, "Notify role set");
        Ok(())
    }

    /// Clear the notify role, returning the role that was set
    pub fn clear_notify_role(&self, guild_id: GuildId) -> SettingsResult<RoleId> {
        let removed = self.mutate(guild_id, |settings| {
            settings.notify_role_id.take().ok_or(SettingsError::NotSet)
        })?;
        tracing::info!(guild_id = %guild_id, role_id = %removed, "Notify role cleared");
        Ok(removed)
    }

    pub fn set_command_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> SettingsResult<()> {
        self.mutate(guild_id, |settings| {
            settings.command_channel_id = Some(channel_id);
            Ok(())
        })?;
        tracing::info!(guild_id = %guild_id, channel_id = %channel_id, "Command channel set");
        Ok(())
    }

    pub fn set_response_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> SettingsResult<()> {
        self.mutate(guild_id, |settings| {
            settings.response_channel_id = Some(channel_id);
            Ok(())
        })?;
        tracing::info!(guild_id = %guild_id, channel_id = %channel_id, "Response channel set");
        Ok(())
    }

    /// Persist the whole store
    pub fn flush(&self) -> SettingsResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist()
    }

    fn persist(&self) -> SettingsResult<()> {
        self.backend.save_all(&self.snapshot())?;
        Ok(())
    }

    /// Apply `apply` to a server's record and persist on success. A rejected
    /// or unsaved mutation leaves the store as it was; a record is only
    /// created for a server once a mutation has been saved.
    fn mutate<T>(
        &self,
        guild_id: GuildId,
        apply: impl FnOnce(&mut GuildSettings) -> SettingsResult<T>,
    ) -> SettingsResult<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.get(guild_id);
        let output = apply(&mut record)?;
        let previous = self.settings.insert(guild_id, record);

        if let Err(e) = self.persist() {
            match previous {
                Some(previous) => {
                    self.settings.insert(guild_id, previous);
                }
                None => {
                    self.settings.remove(&guild_id);
                }
            }
            return Err(e);
        }
        Ok(output)
    }
}
