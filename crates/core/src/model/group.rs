use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::GroupId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("group display name cannot be empty")]
    EmptyName,

    #[error("group source id cannot be empty")]
    EmptySource,

    #[error("duplicate group source id: {0}")]
    DuplicateSource(GroupId),

    #[error("catalog has no groups")]
    Empty,

    #[error("invalid catalog file: {0}")]
    Parse(String),
}

/// An independently selectable topic backed by one question resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    display_name: String,
    source_id: GroupId,
}

impl Group {
    /// # Errors
    ///
    /// Returns `CatalogError` if the name or source id is blank.
    pub fn new(
        display_name: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        let source_id = GroupId::new(source_id);
        if source_id.is_empty() {
            return Err(CatalogError::EmptySource);
        }
        Ok(Self {
            display_name,
            source_id,
        })
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn source_id(&self) -> &GroupId {
        &self.source_id
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    file: String,
}

const BUILTIN_GROUPS: &[(&str, &str)] = &[
    ("Cardiology", "group1.json"),
    ("Pulmonology", "group4.json"),
    ("Gastroenterology", "group5.json"),
    ("Nephrology", "group7.json"),
    ("Hematology", "group8.json"),
    ("Endocrinology", "group10.json"),
    ("Rheumatology", "group11.json"),
    ("Immunology - Allergology", "group12.json"),
    ("Pediatrics", "group14.json"),
    ("Surgery", "group18.json"),
    ("Gynecology", "group21.json"),
];

/// Static, ordered list of the groups a user can pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCatalog {
    groups: Vec<Group>,
}

impl GroupCatalog {
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::DuplicateSource` if two groups share a source id.
    pub fn new(groups: Vec<Group>) -> Result<Self, CatalogError> {
        if groups.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (idx, group) in groups.iter().enumerate() {
            if groups[..idx].iter().any(|g| g.source_id == group.source_id) {
                return Err(CatalogError::DuplicateSource(group.source_id.clone()));
            }
        }
        Ok(Self { groups })
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .map(|(name, file)| Group {
                display_name: (*name).to_string(),
                source_id: GroupId::new(*file),
            })
            .collect();
        Self { groups }
    }

    /// Parse a catalog file of the form `[{ "name": ..., "file": ... }, ...]`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or any validation
    /// error from `Group::new` / `GroupCatalog::new`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let groups = entries
            .into_iter()
            .map(|entry| Group::new(entry.name, entry.file))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(groups)
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.source_id == *id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.iter().map(Group::source_id)
    }
}

/// The set of groups picked for the next session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelection {
    selected: Vec<GroupId>,
}

impl GroupSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_selected(&self, id: &GroupId) -> bool {
        self.selected.contains(id)
    }

    pub fn set(&mut self, id: GroupId, selected: bool) {
        match (selected, self.is_selected(&id)) {
            (true, false) => self.selected.push(id),
            (false, true) => self.selected.retain(|g| *g != id),
            _ => {}
        }
    }

    pub fn toggle(&mut self, id: GroupId) {
        let selected = self.is_selected(&id);
        self.set(id, !selected);
    }

    #[must_use]
    pub fn is_all_selected(&self, catalog: &GroupCatalog) -> bool {
        catalog.ids().all(|id| self.is_selected(id))
    }

    /// Clears the selection when every catalog group is selected, otherwise
    /// selects all of them.
    pub fn toggle_all(&mut self, catalog: &GroupCatalog) {
        if self.is_all_selected(catalog) {
            self.selected.clear();
        } else {
            for id in catalog.ids() {
                self.set(id.clone(), true);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> &[GroupId] {
        &self.selected
    }

    /// Selected ids in catalog order; ids the catalog does not know follow in
    /// the order they were selected.
    #[must_use]
    pub fn ordered_by(&self, catalog: &GroupCatalog) -> Vec<GroupId> {
        let mut ordered: Vec<GroupId> = catalog
            .ids()
            .filter(|id| self.is_selected(id))
            .cloned()
            .collect();
        ordered.extend(
            self.selected
                .iter()
                .filter(|id| catalog.get(id).is_none())
                .cloned(),
        );
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> GroupCatalog {
        GroupCatalog::new(vec![
            Group::new("A", "a.json").unwrap(),
            Group::new("B", "b.json").unwrap(),
            Group::new("C", "c.json").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = GroupCatalog::builtin();
        let rebuilt = GroupCatalog::new(builtin.groups().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), 11);
        assert_eq!(
            builtin.groups()[0].source_id(),
            &GroupId::new("group1.json")
        );
    }

    #[test]
    fn catalog_rejects_duplicates_and_blank_entries() {
        let err = GroupCatalog::new(vec![
            Group::new("A", "a.json").unwrap(),
            Group::new("A again", "a.json").unwrap(),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateSource(GroupId::new("a.json")));
        assert_eq!(Group::new(" ", "a.json").unwrap_err(), CatalogError::EmptyName);
        assert_eq!(Group::new("A", "").unwrap_err(), CatalogError::EmptySource);
        assert_eq!(GroupCatalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn catalog_from_json() {
        let catalog =
            GroupCatalog::from_json(r#"[{"name":"Math","file":"math.json"}]"#).unwrap();
        assert_eq!(catalog.groups()[0].display_name(), "Math");
        assert!(matches!(
            GroupCatalog::from_json("{}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let catalog = small_catalog();
        let mut selection = GroupSelection::new();
        selection.toggle(GroupId::new("b.json"));

        selection.toggle_all(&catalog);
        assert!(selection.is_all_selected(&catalog));
        assert_eq!(selection.len(), 3);

        selection.toggle_all(&catalog);
        assert!(selection.is_empty());
    }

    #[test]
    fn ordered_by_follows_catalog_order() {
        let catalog = small_catalog();
        let mut selection = GroupSelection::new();
        for id in ["c.json", "extra.json", "a.json", "c.json"] {
            selection.set(GroupId::new(id), true);
        }
        assert_eq!(selection.len(), 3);
        assert_eq!(
            selection.ordered_by(&catalog),
            vec![
                GroupId::new("a.json"),
                GroupId::new("c.json"),
                GroupId::new("extra.json"),
            ]
        );
    }
}
