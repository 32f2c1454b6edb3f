//! Activity templates users define once and reuse for logging.
//!
//! Examples: "Meditate 🧘", "Exercise 💪", "Read 📚". Each template
//! carries the Google Calendar color id its logged events will use.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::storage::StateStore;

const ACTIVITIES_STATE_KEY: &str = "cairn-activities";

/// A reusable activity definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTemplate {
    /// Unique identifier (UUID)
    pub id: String,
    /// Display name (e.g., "Meditate")
    pub name: String,
    /// Single emoji character (e.g., "🧘")
    pub emoji: String,
    /// Google Calendar colorId (1-11)
    pub color_id: String,
    /// Epoch milliseconds when created
    pub created_at: i64,
}

/// Input for creating a new activity template.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub name: String,
    pub emoji: String,
    pub color_id: String,
}

/// Partial update for an existing template.
#[derive(Debug, Clone, Default)]
pub struct ActivityUpdate {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub color_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedActivities {
    templates: Vec<ActivityTemplate>,
}

/// The user's activity templates, persisted under `cairn-activities`.
pub struct ActivityBook {
    templates: Vec<ActivityTemplate>,
    store: Option<StateStore>,
}

impl ActivityBook {
    /// An in-memory book with no persistence.
    pub fn in_memory() -> Self {
        Self {
            templates: Vec::new(),
            store: None,
        }
    }

    /// Open a book backed by the given store, hydrating existing templates.
    pub fn with_store(store: StateStore) -> Result<Self> {
        let persisted: PersistedActivities = store
            .load(ACTIVITIES_STATE_KEY)?
            .unwrap_or_default();
        Ok(Self {
            templates: persisted.templates,
            store: Some(store),
        })
    }

    /// All templates, in creation order.
    pub fn templates(&self) -> &[ActivityTemplate] {
        &self.templates
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&ActivityTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Add a new template, generating its id and creation stamp.
    pub fn add(&mut self, input: NewActivity) -> ActivityTemplate {
        let template = ActivityTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            emoji: input.emoji,
            color_id: input.color_id,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        self.templates.push(template.clone());
        self.persist();
        template
    }

    /// Apply a partial update. Returns false if the id is unknown.
    pub fn update(&mut self, id: &str, updates: ActivityUpdate) -> bool {
        let Some(template) = self.templates.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(name) = updates.name {
            template.name = name;
        }
        if let Some(emoji) = updates.emoji {
            template.emoji = emoji;
        }
        if let Some(color_id) = updates.color_id {
            template.color_id = color_id;
        }
        self.persist();
        true
    }

    /// Remove a template. Returns false if the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        let removed = self.templates.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    fn persist(&self) {
        let Some(store) = &self.store else { return };
        let persisted = PersistedActivities {
            templates: self.templates.clone(),
        };
        if let Err(err) = store.save(ACTIVITIES_STATE_KEY, &persisted) {
            tracing::warn!("Failed to persist activities: {err:#}");
        }
    }
}
