use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::error::UnknownModelError;

/// Tracks which catalog entry is currently selected.
///
/// Every selection is validated against the catalog, so the current
/// model always exists.
#[derive(Clone, Debug)]
pub struct ModelSelector {
    catalog: ModelCatalog,
    current: usize,
}

impl ModelSelector {
    /// Creates a selector with `initial` selected.
    pub fn new(
        catalog: ModelCatalog,
        initial: &str,
    ) -> Result<Self, UnknownModelError> {
        let current = catalog
            .position(initial)
            .ok_or_else(|| UnknownModelError::new(initial))?;
        Ok(Self { catalog, current })
    }

    /// Selects the model with the given id.
    ///
    /// Unknown ids are rejected and the previous selection is kept.
    pub fn select(
        &mut self,
        id: &str,
    ) -> Result<&ModelDescriptor, UnknownModelError> {
        let Some(index) = self.catalog.position(id) else {
            return Err(UnknownModelError::new(id));
        };
        self.current = index;
        Ok(self.catalog.at(index))
    }

    /// Returns the selected model.
    #[inline]
    pub fn current(&self) -> &ModelDescriptor {
        self.catalog.at(self.current)
    }

    /// Returns the catalog this selector picks from.
    #[inline]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}
