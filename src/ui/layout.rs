use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;

/// Pre-computed layout areas for the main draw loop. The top bar holds the
/// tab list on the left and the league label plus load spinner on the right.
pub struct LayoutAreas {
    pub tabs: Rect,
    pub status: Rect,
    pub main: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        Self::from_rect(Rect::new(0, 0, size.width, size.height), false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool) {
        *self = Self::from_rect(area, full_screen);
    }

    fn from_rect(area: Rect, full_screen: bool) -> Self {
        if full_screen {
            let [main] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            return LayoutAreas { tabs: Rect::ZERO, status: Rect::ZERO, main };
        }

        let [bar, main] =
            Layout::vertical([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Fill(1)])
                .areas(area);
        let [tabs, status] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(30)]).areas(bar);

        LayoutAreas { tabs, status, main }
    }
}
