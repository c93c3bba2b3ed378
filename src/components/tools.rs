use eframe::egui;

/// What a click on the canvas does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Fill,
    Fix,
    /// Momentary: one sample, then back to the previous tool.
    Dropper,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Fill => "Fill",
            Tool::Fix => "Fix",
            Tool::Dropper => "Dropper",
        }
    }

    pub fn is_persistent(self) -> bool {
        !matches!(self, Tool::Dropper)
    }
}

/// Active tool plus the persistent one the dropper falls back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ToolState {
    active: Tool,
    last_persistent: Tool,
}

impl ToolState {
    pub fn active(&self) -> Tool {
        self.active
    }

    pub fn last_persistent(&self) -> Tool {
        self.last_persistent
    }

    /// Switch tools. Returns true when the active tool actually changed.
    pub fn set(&mut self, tool: Tool) -> bool {
        if tool.is_persistent() {
            self.last_persistent = tool;
        }
        let changed = self.active != tool;
        self.active = tool;
        changed
    }

    /// Called after the dropper sampled a colour.
    pub fn finish_dropper(&mut self) {
        if self.active == Tool::Dropper {
            self.active = self.last_persistent;
        }
    }

    /// Mode radio buttons. Returns the tool the user picked this frame.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<Tool> {
        let mut picked = None;
        ui.label("Mode");
        for tool in [Tool::Fill, Tool::Fix, Tool::Dropper] {
            if ui.radio(self.active == tool, tool.label()).clicked() {
                picked = Some(tool);
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_fill() {
        let tools = ToolState::default();
        assert_eq!(tools.active(), Tool::Fill);
        assert_eq!(tools.last_persistent(), Tool::Fill);
    }

    #[test]
    fn dropper_reverts_to_previous_tool() {
        let mut tools = ToolState::default();
        tools.set(Tool::Fix);
        tools.set(Tool::Dropper);
        assert_eq!(tools.active(), Tool::Dropper);
        tools.finish_dropper();
        assert_eq!(tools.active(), Tool::Fix);
    }

    #[test]
    fn dropper_does_not_become_persistent() {
        let mut tools = ToolState::default();
        tools.set(Tool::Dropper);
        tools.set(Tool::Dropper);
        tools.finish_dropper();
        assert_eq!(tools.active(), Tool::Fill);
    }

    #[test]
    fn finish_outside_dropper_is_noop() {
        let mut tools = ToolState::default();
        tools.set(Tool::Fix);
        tools.finish_dropper();
        assert_eq!(tools.active(), Tool::Fix);
    }

    #[test]
    fn set_reports_changes() {
        let mut tools = ToolState::default();
        assert!(!tools.set(Tool::Fill));
        assert!(tools.set(Tool::Fix));
    }
}
