use serde::{Deserialize, Serialize};

/// Provenance tag carried by entities that came from the secondary model.
pub const SECONDARY_SOURCE: &str = "transformer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    /// Character offsets into the whole document.
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    People,
    Organizations,
    Dates,
    MonetaryValues,
    Locations,
    Other,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 6] = [
        Self::People,
        Self::Organizations,
        Self::Dates,
        Self::MonetaryValues,
        Self::Locations,
        Self::Other,
    ];

    /// Bucket for a label from the primary (OntoNotes-style) model.
    pub fn for_primary_label(label: &str) -> Self {
        match label {
            "PERSON" => Self::People,
            "ORG" => Self::Organizations,
            "DATE" => Self::Dates,
            "MONEY" => Self::MonetaryValues,
            "GPE" | "LOC" => Self::Locations,
            _ => Self::Other,
        }
    }

    /// Bucket and canonical label for a secondary (CoNLL-style) entity group.
    /// Groups the secondary model is not trusted for (e.g. `MISC`) map to `None`.
    pub fn for_secondary_label(entity_group: &str) -> Option<(Self, &'static str)> {
        match entity_group {
            "PER" => Some((Self::People, "PERSON")),
            "ORG" => Some((Self::Organizations, "ORG")),
            "LOC" => Some((Self::Locations, "LOC")),
            _ => None,
        }
    }

    pub fn bucket_name(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Organizations => "organizations",
            Self::Dates => "dates",
            Self::MonetaryValues => "monetary_values",
            Self::Locations => "locations",
            Self::Other => "other_entities",
        }
    }
}

/// Entities grouped by category, each bucket in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub people: Vec<Entity>,
    pub organizations: Vec<Entity>,
    pub dates: Vec<Entity>,
    pub monetary_values: Vec<Entity>,
    pub locations: Vec<Entity>,
    pub other_entities: Vec<Entity>,
}

impl ExtractedEntities {
    /// Bucket primary-model entities by their raw label.
    pub fn from_primary(entities: Vec<Entity>) -> Self {
        let mut result = Self::default();
        for entity in entities {
            let category = EntityCategory::for_primary_label(&entity.label);
            result.bucket_mut(category).push(entity);
        }
        result
    }

    /// Bucket secondary-model entities, rewriting their labels to the primary
    /// vocabulary and tagging their provenance. Unmapped groups are dropped.
    pub fn from_secondary(entities: Vec<Entity>) -> Self {
        let mut result = Self::default();
        for mut entity in entities {
            if let Some((category, label)) = EntityCategory::for_secondary_label(&entity.label) {
                entity.label = label.to_string();
                entity.source = Some(SECONDARY_SOURCE.to_string());
                result.bucket_mut(category).push(entity);
            }
        }
        result
    }

    pub fn bucket(&self, category: EntityCategory) -> &[Entity] {
        match category {
            EntityCategory::People => &self.people,
            EntityCategory::Organizations => &self.organizations,
            EntityCategory::Dates => &self.dates,
            EntityCategory::MonetaryValues => &self.monetary_values,
            EntityCategory::Locations => &self.locations,
            EntityCategory::Other => &self.other_entities,
        }
    }

    pub fn bucket_mut(&mut self, category: EntityCategory) -> &mut Vec<Entity> {
        match category {
            EntityCategory::People => &mut self.people,
            EntityCategory::Organizations => &mut self.organizations,
            EntityCategory::Dates => &mut self.dates,
            EntityCategory::MonetaryValues => &mut self.monetary_values,
            EntityCategory::Locations => &mut self.locations,
            EntityCategory::Other => &mut self.other_entities,
        }
    }

    pub fn total(&self) -> usize {
        EntityCategory::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }
}
