use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Highlight {
    Hover,
    Selected,
}

/// Emitted when the user leaves selection mode from the page itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionEvent {
    SelectionStoppedByUser,
}

/// Which roots the next extraction pass walks.
///
/// Either a discrete, ordered set of user-picked nodes or the whole
/// document; switching to one mode clears the other.
#[derive(Debug, Clone)]
pub struct SelectionState<N> {
    active: bool,
    page_parsed: bool,
    hovered: Option<N>,
    selected: Vec<N>,
}

impl<N> Default for SelectionState<N> {
    fn default() -> Self {
        Self {
            active: false,
            page_parsed: false,
            hovered: None,
            selected: Vec::new(),
        }
    }
}

impl<N: Copy + PartialEq> SelectionState<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_page_parsed(&self) -> bool {
        self.page_parsed
    }

    pub fn selected(&self) -> &[N] {
        &self.selected
    }

    pub fn hovered(&self) -> Option<N> {
        self.hovered
    }

    /// Enter selection mode, discarding any previous selection.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.clear_selections();
        self.active = true;
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.hovered = None;
    }

    pub fn clear_selections(&mut self) {
        self.selected.clear();
        self.page_parsed = false;
    }

    /// Switch to whole-document mode.
    pub fn parse_entire_page(&mut self) {
        self.clear_selections();
        self.page_parsed = true;
    }

    pub fn hover(&mut self, node: N) {
        if self.active {
            self.hovered = Some(node);
        }
    }

    /// Add or remove `node` from the selection. Returns whether the event
    /// was consumed (selection mode active).
    pub fn toggle(&mut self, node: N) -> bool {
        if !self.active {
            return false;
        }
        self.page_parsed = false;
        match self.selected.iter().position(|n| *n == node) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(node),
        }
        true
    }

    /// Escape pressed on the page.
    pub fn escape(&mut self) -> Option<SelectionEvent> {
        if !self.active {
            return None;
        }
        self.stop();
        Some(SelectionEvent::SelectionStoppedByUser)
    }

    pub fn highlight(&self, node: N) -> Option<Highlight> {
        if self.selected.contains(&node) {
            Some(Highlight::Selected)
        } else if self.hovered == Some(node) {
            Some(Highlight::Hover)
        } else {
            None
        }
    }

    pub fn page_highlighted(&self) -> bool {
        self.page_parsed
    }

    /// Roots for the next extraction, or `None` when nothing is selected.
    pub fn roots(&self, body: Option<N>) -> Option<Vec<N>> {
        if !self.selected.is_empty() {
            return Some(self.selected.clone());
        }
        if self.page_parsed {
            return body.map(|b| vec![b]);
        }
        None
    }
}
