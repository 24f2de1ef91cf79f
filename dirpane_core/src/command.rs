//! Panel actions and the named handler table exposed to key-binding layers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};

/// A state transition a key binding can trigger on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelAction {
    /// Show or hide the integrated terminal.
    ToggleIntegratedTerminal,
    /// Navigate to the parent of the current directory.
    NavigateToParent,
    /// List the current directory again.
    Refresh,
    /// Show or hide dotfiles.
    ToggleHiddenFiles,
}

impl PanelAction {
    /// Every action, in handler table order.
    pub const ALL: [PanelAction; 4] = [
        PanelAction::ToggleIntegratedTerminal,
        PanelAction::NavigateToParent,
        PanelAction::Refresh,
        PanelAction::ToggleHiddenFiles,
    ];

    /// Handler name used by key-binding layers.
    pub fn name(self) -> &'static str {
        match self {
            PanelAction::ToggleIntegratedTerminal => "toggleIntegratedTerminal",
            PanelAction::NavigateToParent => "navigateToParent",
            PanelAction::Refresh => "refresh",
            PanelAction::ToggleHiddenFiles => "toggleHiddenFiles",
        }
    }

    /// Look an action up by its handler name.
    pub fn from_name(name: &str) -> PanelResult<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| PanelError::UnknownAction(name.to_owned()))
    }
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name → action table handed to the key-binding layer.
///
/// Built once per panel and never rebuilt, so bindings registered against it
/// stay valid for the panel's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handlers {
    table: BTreeMap<&'static str, PanelAction>,
}

impl Handlers {
    pub(crate) fn new() -> Self {
        Self { table: PanelAction::ALL.into_iter().map(|a| (a.name(), a)).collect() }
    }

    /// Resolve a handler name.
    pub fn get(&self, name: &str) -> Option<PanelAction> {
        self.table.get(name).copied()
    }

    /// All registered handler names.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for action in PanelAction::ALL {
            assert_eq!(PanelAction::from_name(action.name()).unwrap(), action);
        }
    }

    #[test]
    fn unknown_name_errors() {
        let err = PanelAction::from_name("openPodBayDoors").unwrap_err();
        assert!(matches!(err, PanelError::UnknownAction(name) if name == "openPodBayDoors"));
    }

    #[test]
    fn handlers_cover_every_action() {
        let handlers = Handlers::new();
        assert_eq!(handlers.len(), PanelAction::ALL.len());
        assert_eq!(
            handlers.get("toggleIntegratedTerminal"),
            Some(PanelAction::ToggleIntegratedTerminal)
        );
        assert!(handlers.get("ToggleIntegratedTerminal").is_none());
        assert!(handlers.names().any(|n| n == "refresh"));
    }
}
