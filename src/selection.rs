/// Hover and selection state for connectors.
///
/// At most one connector is active (selected for deletion) at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectorSelection {
    active: Option<i32>,
    hovered: Option<i32>,
}

impl ConnectorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<i32> {
        self.active
    }

    pub fn hovered(&self) -> Option<i32> {
        self.hovered
    }

    /// Handle a click: a highlighted connector becomes active, anything else
    /// clears the selection. Returns `true` if the selection changed.
    pub fn click(&mut self, connector: Option<i32>) -> bool {
        let changed = self.active != connector;
        self.active = connector;
        changed
    }

    /// Returns `true` if the hovered connector changed.
    pub fn hover(&mut self, connector: Option<i32>) -> bool {
        let changed = self.hovered != connector;
        self.hovered = connector;
        changed
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Take the active connector, leaving nothing selected.
    pub fn take_active(&mut self) -> Option<i32> {
        self.active.take()
    }

    /// Drop references to a connector that no longer exists.
    pub fn forget(&mut self, connector: i32) {
        if self.active == Some(connector) {
            self.active = None;
        }
        if self.hovered == Some(connector) {
            self.hovered = None;
        }
    }

    /// Drop references to connectors not accepted by `exists`.
    pub fn retain<F>(&mut self, exists: F)
    where
        F: Fn(i32) -> bool,
    {
        self.active = self.active.filter(|&id| exists(id));
        self.hovered = self.hovered.filter(|&id| exists(id));
    }
}
