use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Id of the model selected when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "operations-pro";

/// Display metadata of a selectable model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique identifier, e.g. `gpt-4o`.
    pub id: String,
    /// Human readable name, e.g. `GPT-4o`.
    pub name: String,
    /// One sentence about what the model is good at.
    #[serde(default)]
    pub description: String,
    /// Short tag shown next to the name, e.g. `Official`.
    pub badge: String,
}

impl ModelDescriptor {
    fn new(id: &str, name: &str, description: &str, badge: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            badge: badge.to_owned(),
        }
    }
}

/// A fixed, ordered list of models.
///
/// Cloning is cheap, all clones share the same entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Arc<[ModelDescriptor]>,
}

impl ModelCatalog {
    /// Creates a catalog from the given entries, keeping their order.
    ///
    /// Entries sharing an id with an earlier entry are ignored.
    pub fn new(models: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut unique: Vec<ModelDescriptor> = Vec::new();
        for model in models {
            if unique.iter().any(|m| m.id == model.id) {
                continue;
            }
            unique.push(model);
        }
        Self {
            models: unique.into(),
        }
    }

    /// The catalog shipped with the operations agent.
    pub fn builtin() -> Self {
        Self::new([
            ModelDescriptor::new(
                "operations-pro",
                "Operations Pro",
                "Advanced model for complex warehouse operations and inventory management",
                "Premium",
            ),
            ModelDescriptor::new(
                "deepseek-r1",
                "DeepSeek R1",
                "Advanced reasoning model for complex problem solving",
                "Official",
            ),
            ModelDescriptor::new(
                "claude-4-sonnet",
                "Claude 4 Sonnet",
                "Balanced model with strong analytical capabilities",
                "Official",
            ),
            ModelDescriptor::new(
                "operations-standard",
                "Operations Standard",
                "Balanced performance for daily warehouse tasks",
                "Standard",
            ),
            ModelDescriptor::new(
                "operations-fast",
                "Operations Fast",
                "Quick responses for simple queries and routine operations",
                "Fast",
            ),
            ModelDescriptor::new(
                "claude-4-opus",
                "Claude 4 Opus",
                "Most capable model for complex reasoning and analysis",
                "Official",
            ),
            ModelDescriptor::new(
                "deepseek-v3",
                "DeepSeek V3",
                "Powerful model for technical and analytical tasks",
                "Official",
            ),
            ModelDescriptor::new(
                "grok-3",
                "Grok 3",
                "Real-time information and conversational AI",
                "Official",
            ),
            ModelDescriptor::new(
                "gpt-4o",
                "GPT-4o",
                "Multimodal model with vision and text capabilities",
                "Official",
            ),
            ModelDescriptor::new(
                "gpt-4.1",
                "GPT-4.1",
                "Latest version with improved reasoning capabilities",
                "Official",
            ),
        ])
    }

    /// Looks up a model by id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    #[inline]
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.models.iter().position(|m| m.id == id)
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> &ModelDescriptor {
        &self.models[index]
    }

    /// Iterates over the models in catalog order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    /// Returns the number of models.
    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the catalog has no models.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelCatalog {
    #[inline]
    fn default() -> Self {
        Self::builtin()
    }
}
