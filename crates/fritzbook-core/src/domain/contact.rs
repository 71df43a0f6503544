use crate::domain::number::Numbers;
use crate::domain::person::Person;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::mem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Normal,
    Vip,
}

impl Category {
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Vip => 1,
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Vip),
            other => Err(CoreError::InvalidCategory(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub category: Category,
    pub person: Person,
    pub numbers: Numbers,
    /// Seconds since the unix epoch.
    pub modified_at: Option<i64>,
}

impl Contact {
    pub fn new(category: Category, person: Person, numbers: Numbers) -> Self {
        Self {
            category,
            person,
            numbers,
            modified_at: None,
        }
    }

    pub fn with_modified_at(mut self, modified_at: i64) -> Self {
        self.modified_at = Some(modified_at);
        self
    }

    pub fn has_numbers(&self) -> bool {
        !self.numbers.is_empty()
    }

    pub fn normalize_numbers(&mut self, country_code: &str) {
        self.numbers = mem::take(&mut self.numbers).normalized(country_code);
    }

    pub fn select_main_number(&mut self) {
        self.numbers = mem::take(&mut self.numbers).with_main_number();
    }
}
