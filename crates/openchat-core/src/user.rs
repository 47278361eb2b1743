use crate::error::{OpenChatError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    password: String,
    pub about: String,
}

impl User {
    pub fn named(
        id: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
        about: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Self {
            id: id.into(),
            name,
            password: password.into(),
            about: about.into(),
        })
    }

    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(OpenChatError::UserNameBlank);
        }
        Ok(())
    }

    pub fn is_named(&self, potential_name: &str) -> bool {
        self.name == potential_name
    }

    pub fn is_identified_as(&self, potential_id: &str) -> bool {
        self.id == potential_id
    }

    pub fn authenticates(&self, potential_password: &str) -> bool {
        self.password == potential_password
    }
}
