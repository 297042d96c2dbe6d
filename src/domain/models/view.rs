#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Generate,
    Gallery,
}

impl View {
    pub fn toggle(self) -> View {
        match self {
            View::Generate => return View::Gallery,
            View::Gallery => return View::Generate,
        }
    }

    /// Position of the view's tab in the header.
    pub fn index(self) -> usize {
        match self {
            View::Generate => return 0,
            View::Gallery => return 1,
        }
    }
}
