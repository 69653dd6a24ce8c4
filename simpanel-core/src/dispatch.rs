use crate::{Command, CommandSink};

/// Button label to command, in declaration order. Labels are unique; adding
/// a label twice replaces the earlier command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonTable {
    entries: Vec<(String, Command)>,
}

impl ButtonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, command: Command) -> Self {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, existing)) => *existing = command,
            None => self.entries.push((label, command)),
        }
        self
    }

    pub fn get(&self, label: &str) -> Option<&Command> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, command)| command)
    }

    pub fn supported_views(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Returns whether `label` was known.
    pub fn on_button_click(&self, label: &str, sink: &impl CommandSink) -> bool {
        let Some(command) = self.get(label) else {
            tracing::debug!(label, "no handler for button");
            return false;
        };

        tracing::info!(label, ?command, "button clicked");
        sink.issue_command(command.clone());
        true
    }
}

impl<L: Into<String>> FromIterator<(L, Command)> for ButtonTable {
    fn from_iter<T: IntoIterator<Item = (L, Command)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ButtonTable::new(), |table, (label, command)| table.with(label, command))
    }
}
