#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    /// Label of the toggle button, which names the theme it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "어두운 테마",
            Theme::Dark => "밝은 테마",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut theme = Theme::default();

        theme.toggle();
        assert!(theme.is_dark());
        assert_eq!(theme.toggle_label(), "밝은 테마");

        theme.toggle();
        assert_eq!(theme, Theme::Light);
    }
}
