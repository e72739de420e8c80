/// An option that is either left to the tool default or explicitly on/off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    #[default]
    Unset,
    False,
    True,
}

impl TriState {
    pub fn token(self) -> Option<&'static str> {
        match self {
            TriState::Unset => None,
            TriState::False => Some("false"),
            TriState::True => Some("true"),
        }
    }

    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }

    pub fn is_true(self) -> bool {
        self == TriState::True
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { TriState::True } else { TriState::False }
    }
}
