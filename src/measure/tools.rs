use serde::{Deserialize, Serialize};

/// Mutually exclusive interaction modes. `None` is the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    None,
    Distance,
    Area,
    Marker,
    SmartDistance,
    MultiRoute,
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::None => "Pan",
            Tool::Distance => "Distance (D)",
            Tool::Area => "Area (A)",
            Tool::Marker => "Marker (M)",
            Tool::SmartDistance => "Smart distance (S)",
            Tool::MultiRoute => "Route (R)",
        }
    }

    pub fn shortcut(&self) -> Option<char> {
        match self {
            Tool::None => None,
            Tool::Distance => Some('D'),
            Tool::Area => Some('A'),
            Tool::Marker => Some('M'),
            Tool::SmartDistance => Some('S'),
            Tool::MultiRoute => Some('R'),
        }
    }

    /// The activatable tools, in toolbar order
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Distance,
            Tool::Area,
            Tool::Marker,
            Tool::SmartDistance,
            Tool::MultiRoute,
        ]
    }

    /// Tools that accumulate map clicks into a measurement session
    pub fn uses_session(&self) -> bool {
        matches!(self, Tool::Distance | Tool::Area | Tool::SmartDistance)
    }

    /// Tools that listen for map clicks at all
    pub fn accepts_clicks(&self) -> bool {
        self.uses_session() || *self == Tool::Marker
    }

    /// Minimum number of vertices before a finish is accepted
    pub fn min_points(&self) -> usize {
        match self {
            Tool::Area => 3,
            Tool::Marker => 1,
            Tool::None => 0,
            Tool::Distance | Tool::SmartDistance | Tool::MultiRoute => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_none() {
        assert_eq!(Tool::default(), Tool::None);
    }

    #[test]
    fn test_all_excludes_idle() {
        let all = Tool::all();
        assert_eq!(all.len(), 5);
        assert!(!all.contains(&Tool::None));
    }

    #[test]
    fn test_display_names_contain_shortcuts() {
        for tool in Tool::all() {
            let key = tool.shortcut().unwrap();
            assert!(
                tool.display_name().contains(&format!("({})", key)),
                "Display name should contain shortcut: {}",
                tool.display_name()
            );
        }
    }

    #[test]
    fn test_click_acceptance() {
        assert!(Tool::Distance.accepts_clicks());
        assert!(Tool::Area.accepts_clicks());
        assert!(Tool::Marker.accepts_clicks());
        assert!(Tool::SmartDistance.accepts_clicks());
        assert!(!Tool::MultiRoute.accepts_clicks());
        assert!(!Tool::None.accepts_clicks());
    }

    #[test]
    fn test_min_points() {
        assert_eq!(Tool::Distance.min_points(), 2);
        assert_eq!(Tool::Area.min_points(), 3);
        assert_eq!(Tool::SmartDistance.min_points(), 2);
    }
}
