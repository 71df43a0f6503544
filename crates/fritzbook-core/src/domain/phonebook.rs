use crate::domain::contact::Contact;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phonebook {
    pub name: Option<String>,
    pub contacts: Vec<Contact>,
}

impl Phonebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            contacts: Vec::new(),
        }
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn normalize_numbers(&mut self, country_code: &str) {
        for contact in &mut self.contacts {
            contact.normalize_numbers(country_code);
        }
    }

    pub fn select_main_numbers(&mut self) {
        for contact in &mut self.contacts {
            contact.select_main_number();
        }
    }
}

/// The phonebooks of one import, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonebookCollection {
    pub phonebooks: Vec<Phonebook>,
}

impl PhonebookCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_phonebook(&mut self, phonebook: Phonebook) {
        self.phonebooks.push(phonebook);
    }

    pub fn contact_count(&self) -> usize {
        self.phonebooks.iter().map(|book| book.contacts.len()).sum()
    }

    pub fn normalize_numbers(&mut self, country_code: &str) {
        for book in &mut self.phonebooks {
            book.normalize_numbers(country_code);
        }
    }

    pub fn select_main_numbers(&mut self) {
        for book in &mut self.phonebooks {
            book.select_main_numbers();
        }
    }
}
