pub mod contact;
pub mod number;
pub mod person;
pub mod phone;
pub mod phonebook;

pub use contact::{Category, Contact};
pub use number::{NumberEntry, NumberType, Numbers};
pub use person::Person;
pub use phone::{normalize_number, to_international, DEFAULT_COUNTRY_CODE};
pub use phonebook::{Phonebook, PhonebookCollection};
