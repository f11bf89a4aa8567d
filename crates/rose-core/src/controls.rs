// ── Action controls ──
//
// Controls are registered once by a front end's setup routine. Each one
// is a concrete value bound to one action resource; there is no global
// lookup by selector.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::config::ActionPaths;
use crate::model::ActionUrl;

/// The commands the device accepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ControlKind {
    Decay,
    Revert,
    DisplayToggle,
}

impl ControlKind {
    /// Human label for buttons and key hints.
    pub fn label(self) -> &'static str {
        match self {
            Self::Decay => "Decay",
            Self::Revert => "Revert",
            Self::DisplayToggle => "Toggle display",
        }
    }

    fn path(self, paths: &ActionPaths) -> Option<&ActionUrl> {
        match self {
            Self::Decay => paths.decay.as_ref(),
            Self::Revert => paths.revert.as_ref(),
            Self::DisplayToggle => paths.display.as_ref(),
        }
    }
}

/// A control bound to the action resource it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionControl {
    pub kind: ControlKind,
    pub url: ActionUrl,
}

/// The registered controls of one front end.
#[derive(Debug, Clone, Default)]
pub struct ControlSet {
    controls: Vec<ActionControl>,
}

impl ControlSet {
    /// Register a control for every configured action path, in
    /// [`ControlKind`] order. Kinds without a path are skipped.
    pub fn from_paths(paths: &ActionPaths) -> Self {
        let controls = ControlKind::iter()
            .filter_map(|kind| {
                kind.path(paths).map(|url| ActionControl {
                    kind,
                    url: url.clone(),
                })
            })
            .collect();
        Self { controls }
    }

    pub fn get(&self, kind: ControlKind) -> Option<&ActionControl> {
        self.controls.iter().find(|c| c.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionControl> {
        self.controls.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }
}
