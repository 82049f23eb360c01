use std::collections::BTreeMap;
use std::sync::Arc;

use super::definition::ScoreDefinition;
use super::error::{InputError, RegistryError};
use super::input::ScoreInput;
use super::outcome::ScoreOutcome;

/// Pure computation plugged into the registry next to its definition.
pub type ScoreFn = fn(&ScoreInput) -> Result<ScoreOutcome, InputError>;

#[derive(Clone)]
pub struct RegistryEntry {
    pub definition: Arc<ScoreDefinition>,
    pub function: ScoreFn,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.definition.id)
            .finish_non_exhaustive()
    }
}

/// Start-up phase of the registry. Registration only happens here; `build`
/// freezes the entries into a [`ScoreRegistry`].
#[derive(Debug, Default)]
pub struct ScoreRegistryBuilder {
    entries: BTreeMap<&'static str, RegistryEntry>,
}

impl ScoreRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        definition: ScoreDefinition,
        function: ScoreFn,
    ) -> Result<&mut Self, RegistryError> {
        if self.entries.contains_key(definition.id) {
            return Err(RegistryError::DuplicateId(definition.id.to_string()));
        }

        let defects = definition.defects();
        if !defects.is_empty() {
            return Err(RegistryError::InvalidDefinition {
                id: definition.id.to_string(),
                defects,
            });
        }

        tracing::debug!(score_id = definition.id, "registered score");
        self.entries.insert(
            definition.id,
            RegistryEntry {
                definition: Arc::new(definition),
                function,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> ScoreRegistry {
        ScoreRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable catalog of scores, shared read-only once built.
#[derive(Debug, Clone)]
pub struct ScoreRegistry {
    entries: BTreeMap<&'static str, RegistryEntry>,
}

impl ScoreRegistry {
    pub fn builder() -> ScoreRegistryBuilder {
        ScoreRegistryBuilder::new()
    }

    /// Registry holding every bundled score.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut builder = ScoreRegistryBuilder::new();
        crate::scores::register_all(&mut builder)?;
        let registry = builder.build();
        tracing::info!(scores = registry.len(), "score registry ready");
        Ok(registry)
    }

    pub fn lookup(&self, id: &str) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .get(id)
            .ok_or_else(|| RegistryError::UnknownScore(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every definition, ordered by id.
    pub fn list(&self) -> impl Iterator<Item = &ScoreDefinition> + '_ {
        self.entries.values().map(|entry| entry.definition.as_ref())
    }

    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ScoreDefinition> + 'a {
        let wanted = category.trim().to_lowercase();
        self.list()
            .filter(move |definition| definition.category.label() == wanted)
    }

    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a ScoreDefinition> + 'a {
        self.list().filter(move |definition| definition.matches(term))
    }

    pub fn categories(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self
            .list()
            .map(|definition| definition.category.label())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::definition::{InputField, OutputKind, ScoreCategory, ScoreShape};

    fn definition(id: &'static str, category: ScoreCategory) -> ScoreDefinition {
        ScoreDefinition::new(id, "Sample", category, ScoreShape::WeightedSum, OutputKind::Integer)
            .describe("Sample description")
            .input(InputField::flag("present"))
    }

    fn constant(_: &ScoreInput) -> Result<ScoreOutcome, InputError> {
        Ok(ScoreOutcome::new(0_i64, "points", "Low Risk", "Low", "nothing"))
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = ScoreRegistry::builder();
        builder
            .register(definition("alpha", ScoreCategory::Cardiology), constant)
            .expect("first registration");
        let err = builder
            .register(definition("alpha", ScoreCategory::Nephrology), constant)
            .expect_err("duplicate");
        assert_eq!(err, RegistryError::DuplicateId("alpha".to_string()));
        assert_eq!(builder.build().len(), 1);
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        let mut builder = ScoreRegistry::builder();
        let broken = definition("broken", ScoreCategory::Cardiology)
            .input(InputField::integer("age", 90, 18));
        let err = builder.register(broken, constant).expect_err("invalid");
        assert!(matches!(err, RegistryError::InvalidDefinition { ref id, .. } if id == "broken"));
    }

    #[test]
    fn catalog_queries_are_ordered_and_case_insensitive() {
        let mut builder = ScoreRegistry::builder();
        builder
            .register(definition("zeta", ScoreCategory::Pulmonology), constant)
            .and_then(|builder| {
                builder.register(definition("alpha", ScoreCategory::Cardiology), constant)
            })
            .and_then(|builder| {
                builder.register(definition("beta", ScoreCategory::Cardiology), constant)
            })
            .expect("registrations");
        let registry = builder.build();

        let ids: Vec<&str> = registry.list().map(|definition| definition.id).collect();
        assert_eq!(ids, vec!["alpha", "beta", "zeta"]);

        let cardiology: Vec<&str> = registry
            .by_category("Cardiology")
            .map(|definition| definition.id)
            .collect();
        assert_eq!(cardiology, vec!["alpha", "beta"]);

        assert_eq!(registry.search("ZET").count(), 1);
        assert_eq!(registry.categories(), vec!["cardiology", "pulmonology"]);
        assert!(matches!(
            registry.lookup("missing"),
            Err(RegistryError::UnknownScore(id)) if id == "missing"
        ));
    }

    #[test]
    fn standard_registry_bundles_every_score() {
        let registry = ScoreRegistry::standard().expect("bundled scores register");
        assert_eq!(registry.len(), 15);
        assert_eq!(
            registry.categories(),
            vec!["cardiology", "nephrology", "pulmonology"]
        );
        assert!(registry.contains("cha2ds2_vasc"));
        assert!(registry.contains("ckd_epi_2021"));
    }
}
