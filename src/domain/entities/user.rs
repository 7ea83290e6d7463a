use std::fmt;

/// The sender of an incoming command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: Option<impl Into<String>>) -> Self {
        self.username = username.map(|u| u.into());
        self
    }

    pub fn with_first_name(mut self, first: Option<impl Into<String>>) -> Self {
        self.first_name = first.map(|f| f.into());
        self
    }

    /// Username if known, then first name, then the raw id
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or(&self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
