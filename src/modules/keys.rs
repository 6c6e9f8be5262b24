// Keyboard vocabulary for the popup: DOM `KeyboardEvent.key` names mapped
// onto the handful of keys the popup reacts to.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Control,
    Delete,
    Backspace,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "Control" => Self::Control,
            "Delete" => Self::Delete,
            "Backspace" => Self::Backspace,
            "Tab" => Self::Tab,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Which way a navigation key moves the selection through the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

impl Key {
    /// Tab moves down the list like ArrowDown.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Tab | Self::ArrowDown => Some(Direction::Down),
            Self::ArrowUp => Some(Direction::Up),
            Self::ArrowLeft => Some(Direction::Left),
            Self::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}
