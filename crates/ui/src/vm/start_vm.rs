use quiz_core::model::{
    GroupCatalog, GroupId, GroupSelection, LimitMode, LimitSettings, QuestionLimit,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRowVm {
    pub id: GroupId,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetVm {
    pub limit: QuestionLimit,
    pub label: String,
    pub active: bool,
}

/// What the start screen shows for the question limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitControlVm {
    Hidden,
    Fixed(String),
    Adjustable {
        presets: Vec<PresetVm>,
        label: String,
    },
}

/// Group selection and limit choice on the start screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartFormVm {
    selection: GroupSelection,
    limits: LimitSettings,
}

impl StartFormVm {
    #[must_use]
    pub fn new(limit: QuestionLimit) -> Self {
        Self {
            selection: GroupSelection::new(),
            limits: LimitSettings::with_limit(limit),
        }
    }

    #[must_use]
    pub fn limit(&self) -> QuestionLimit {
        self.limits.limit()
    }

    pub fn set_limit(&mut self, limit: QuestionLimit) {
        self.limits.set_limit(limit);
    }

    #[must_use]
    pub fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    pub fn toggle_group(&mut self, id: GroupId) {
        self.selection.toggle(id);
    }

    pub fn toggle_all(&mut self, catalog: &GroupCatalog) {
        self.selection.toggle_all(catalog);
    }

    pub fn toggle_preset(&mut self, preset: QuestionLimit) {
        if let Err(err) = self.limits.toggle_preset(preset) {
            tracing::debug!(error = %err, "ignoring unknown limit preset");
        }
    }

    pub fn step_up(&mut self) {
        self.limits.step_up();
    }

    pub fn step_down(&mut self) {
        self.limits.step_down();
    }

    #[must_use]
    pub fn toggle_all_label(&self, catalog: &GroupCatalog) -> &'static str {
        if self.selection.is_all_selected(catalog) {
            "Deselect All"
        } else {
            "Select All"
        }
    }

    #[must_use]
    pub fn group_rows(&self, catalog: &GroupCatalog) -> Vec<GroupRowVm> {
        catalog
            .groups()
            .iter()
            .map(|group| GroupRowVm {
                id: group.source_id().clone(),
                name: group.display_name().to_string(),
                selected: self.selection.is_selected(group.source_id()),
            })
            .collect()
    }

    #[must_use]
    pub fn limit_control(&self, mode: LimitMode) -> LimitControlVm {
        match mode {
            LimitMode::None => LimitControlVm::Hidden,
            LimitMode::Fixed(limit) => LimitControlVm::Fixed(limit.to_string()),
            LimitMode::Adjustable => {
                let active = self.limits.active_preset();
                let presets = self
                    .limits
                    .presets()
                    .iter()
                    .map(|&limit| PresetVm {
                        limit,
                        label: limit.value().to_string(),
                        active: active == Some(limit),
                    })
                    .collect();
                LimitControlVm::Adjustable {
                    presets,
                    label: self.limit().to_string(),
                }
            }
        }
    }

    /// Selected groups in catalog order.
    #[must_use]
    pub fn groups_to_start(&self, catalog: &GroupCatalog) -> Vec<GroupId> {
        self.selection.ordered_by(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_mutually_exclusive() {
        let mut form = StartFormVm::new(QuestionLimit::UNLIMITED);
        form.toggle_preset(QuestionLimit::new(50));
        form.toggle_preset(QuestionLimit::new(200));

        let LimitControlVm::Adjustable { presets, label } =
            form.limit_control(LimitMode::Adjustable)
        else {
            panic!("expected adjustable control");
        };
        let active: Vec<_> = presets.iter().filter(|p| p.active).map(|p| p.limit).collect();
        assert_eq!(active, vec![QuestionLimit::new(200)]);
        assert_eq!(label, "200 Questions");

        form.toggle_preset(QuestionLimit::new(200));
        assert_eq!(form.limit(), QuestionLimit::UNLIMITED);
    }

    #[test]
    fn stepping_down_stops_at_no_limit() {
        let mut form = StartFormVm::new(QuestionLimit::new(50));
        form.step_down();
        form.step_down();
        assert_eq!(form.limit(), QuestionLimit::UNLIMITED);
        assert_eq!(
            form.limit_control(LimitMode::Fixed(QuestionLimit::new(100))),
            LimitControlVm::Fixed("100 Questions".into())
        );
    }

    #[test]
    fn toggle_all_flips_label() {
        let catalog = GroupCatalog::builtin();
        let mut form = StartFormVm::default();
        assert_eq!(form.toggle_all_label(&catalog), "Select All");
        form.toggle_all(&catalog);
        assert_eq!(form.toggle_all_label(&catalog), "Deselect All");
        assert_eq!(form.groups_to_start(&catalog).len(), catalog.len());
        form.toggle_all(&catalog);
        assert!(form.selection().is_empty());
    }
}
