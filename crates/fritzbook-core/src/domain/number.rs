use crate::domain::phone::normalize_number;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberType {
    Home,
    Mobile,
    Work,
    Fax,
}

impl NumberType {
    /// Document order of numbers inside a contact.
    pub const ALL: [NumberType; 4] = [Self::Home, Self::Mobile, Self::Work, Self::Fax];

    /// Candidates for the main number, best first. Fax never qualifies.
    pub const MAIN_CANDIDATES: [NumberType; 3] = [Self::Home, Self::Mobile, Self::Work];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Mobile => "mobile",
            Self::Work => "work",
            Self::Fax => "fax",
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "mobile" => Ok(Self::Mobile),
            "work" => Ok(Self::Work),
            "fax" => Ok(Self::Fax),
            other => Err(CoreError::InvalidNumberType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberEntry {
    number: String,
    main: bool,
    vanity: Option<String>,
    quickdial: Option<u8>,
}

impl NumberEntry {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            main: false,
            vanity: None,
            quickdial: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Result<Self, CoreError> {
        self.main = match priority {
            0 => false,
            1 => true,
            other => return Err(CoreError::InvalidPriority(other)),
        };
        Ok(self)
    }

    /// An empty vanity string leaves the entry without one.
    pub fn with_vanity(mut self, vanity: impl Into<String>) -> Self {
        let vanity = vanity.into();
        self.vanity = (!vanity.is_empty()).then_some(vanity);
        self
    }

    pub fn with_quickdial(mut self, quickdial: u8) -> Result<Self, CoreError> {
        if !(1..=99).contains(&quickdial) {
            return Err(CoreError::InvalidQuickdial(quickdial));
        }
        self.quickdial = Some(quickdial);
        Ok(self)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// `1` for the contact's main number, `0` otherwise.
    pub fn priority(&self) -> u8 {
        u8::from(self.main)
    }

    pub fn is_main(&self) -> bool {
        self.main
    }

    pub fn vanity(&self) -> Option<&str> {
        self.vanity.as_deref()
    }

    pub fn quickdial(&self) -> Option<u8> {
        self.quickdial
    }
}

/// At most one number per [`NumberType`]; inserting an occupied type replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbers {
    home: Option<NumberEntry>,
    mobile: Option<NumberEntry>,
    work: Option<NumberEntry>,
    fax: Option<NumberEntry>,
}

impl Numbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: NumberType, entry: NumberEntry) -> Option<NumberEntry> {
        self.slot_mut(kind).replace(entry)
    }

    /// Like [`Numbers::insert`] but with the type given as text, as read from
    /// external data.
    pub fn add(&mut self, kind: &str, entry: NumberEntry) -> Result<(), CoreError> {
        let kind = kind.parse::<NumberType>()?;
        self.insert(kind, entry);
        Ok(())
    }

    pub fn get(&self, kind: NumberType) -> Option<&NumberEntry> {
        match kind {
            NumberType::Home => self.home.as_ref(),
            NumberType::Mobile => self.mobile.as_ref(),
            NumberType::Work => self.work.as_ref(),
            NumberType::Fax => self.fax.as_ref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NumberType, &NumberEntry)> + '_ {
        NumberType::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|entry| (kind, entry)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn normalized(mut self, country_code: &str) -> Self {
        for kind in NumberType::ALL {
            if let Some(entry) = self.slot_mut(kind).as_mut() {
                entry.number = normalize_number(&entry.number, country_code);
            }
        }
        self
    }

    /// Marks the best candidate as main number and clears every other flag.
    /// Without a home, mobile or work number the set is returned unchanged.
    pub fn with_main_number(mut self) -> Self {
        let Some(main) = NumberType::MAIN_CANDIDATES
            .into_iter()
            .find(|kind| self.get(*kind).is_some())
        else {
            return self;
        };

        for kind in NumberType::ALL {
            if let Some(entry) = self.slot_mut(kind).as_mut() {
                entry.main = kind == main;
            }
        }
        self
    }

    fn slot_mut(&mut self, kind: NumberType) -> &mut Option<NumberEntry> {
        match kind {
            NumberType::Home => &mut self.home,
            NumberType::Mobile => &mut self.mobile,
            NumberType::Work => &mut self.work,
            NumberType::Fax => &mut self.fax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NumberEntry, NumberType, Numbers};
    use crate::error::CoreError;
    use proptest::prelude::*;

    fn main_types(numbers: &Numbers) -> Vec<NumberType> {
        numbers
            .iter()
            .filter(|(_, entry)| entry.is_main())
            .map(|(kind, _)| kind)
            .collect()
    }

    #[test]
    fn add_rejects_unknown_type() {
        let mut numbers = Numbers::new();
        let err = numbers.add("pager", NumberEntry::new("123")).unwrap_err();
        assert_eq!(err, CoreError::InvalidNumberType("pager".to_string()));
        assert!(numbers.is_empty());
    }

    #[test]
    fn insert_overwrites_same_type() {
        let mut numbers = Numbers::new();
        numbers.add("work", NumberEntry::new("111")).unwrap();
        numbers.add("work", NumberEntry::new("222")).unwrap();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers.get(NumberType::Work).unwrap().number(), "222");
    }

    #[test]
    fn iter_follows_type_order() {
        let mut numbers = Numbers::new();
        numbers.insert(NumberType::Fax, NumberEntry::new("4"));
        numbers.insert(NumberType::Home, NumberEntry::new("1"));
        numbers.insert(NumberType::Work, NumberEntry::new("3"));
        let kinds: Vec<NumberType> = numbers.iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![NumberType::Home, NumberType::Work, NumberType::Fax]
        );
    }

    #[test]
    fn quickdial_and_priority_are_validated() {
        assert_eq!(
            NumberEntry::new("1").with_quickdial(0).unwrap_err(),
            CoreError::InvalidQuickdial(0)
        );
        assert_eq!(
            NumberEntry::new("1").with_quickdial(100).unwrap_err(),
            CoreError::InvalidQuickdial(100)
        );
        assert_eq!(
            NumberEntry::new("1").with_priority(2).unwrap_err(),
            CoreError::InvalidPriority(2)
        );
        let entry = NumberEntry::new("1").with_quickdial(99).unwrap();
        assert_eq!(entry.quickdial(), Some(99));
    }

    #[test]
    fn main_number_prefers_home_over_mobile_and_work() {
        let mut numbers = Numbers::new();
        numbers.insert(NumberType::Work, NumberEntry::new("3"));
        numbers.insert(NumberType::Mobile, NumberEntry::new("2"));
        let numbers = numbers.with_main_number();
        assert_eq!(main_types(&numbers), vec![NumberType::Mobile]);
    }

    #[test]
    fn main_number_clears_stale_flags() {
        let mut numbers = Numbers::new();
        numbers.insert(
            NumberType::Work,
            NumberEntry::new("3").with_priority(1).unwrap(),
        );
        numbers.insert(
            NumberType::Fax,
            NumberEntry::new("4").with_priority(1).unwrap(),
        );
        numbers.insert(NumberType::Home, NumberEntry::new("1"));
        let numbers = numbers.with_main_number();
        assert_eq!(main_types(&numbers), vec![NumberType::Home]);
    }

    #[test]
    fn fax_only_gets_no_main_number() {
        let mut numbers = Numbers::new();
        numbers.insert(NumberType::Fax, NumberEntry::new("4"));
        let numbers = numbers.with_main_number();
        assert!(main_types(&numbers).is_empty());
    }

    #[test]
    fn normalized_keeps_entry_attributes() {
        let mut numbers = Numbers::new();
        numbers.insert(
            NumberType::Home,
            NumberEntry::new("044 400 00 00")
                .with_vanity("PIZZA")
                .with_quickdial(7)
                .unwrap(),
        );
        let numbers = numbers.normalized("+41");
        let entry = numbers.get(NumberType::Home).unwrap();
        assert_eq!(entry.number(), "+4144 400 00 00");
        assert_eq!(entry.vanity(), Some("PIZZA"));
        assert_eq!(entry.quickdial(), Some(7));
        assert_eq!(entry.priority(), 0);
    }

    #[test]
    fn empty_vanity_is_unset() {
        let entry = NumberEntry::new("+41441").with_vanity("");
        assert_eq!(entry.vanity(), None);
    }

    fn arb_entry() -> impl Strategy<Value = Option<NumberEntry>> {
        proptest::option::of(("[0-9]{3,10}", 0u8..=1).prop_map(|(number, priority)| {
            NumberEntry::new(number)
                .with_priority(priority)
                .expect("priority in range")
        }))
    }

    proptest! {
        #[test]
        fn exactly_one_main_number_when_candidates_exist(
            home in arb_entry(),
            mobile in arb_entry(),
            work in arb_entry(),
            fax in arb_entry(),
        ) {
            let mut numbers = Numbers::new();
            for (kind, entry) in [
                (NumberType::Home, home),
                (NumberType::Mobile, mobile),
                (NumberType::Work, work),
                (NumberType::Fax, fax),
            ] {
                if let Some(entry) = entry {
                    numbers.insert(kind, entry);
                }
            }
            let expected = NumberType::MAIN_CANDIDATES
                .into_iter()
                .find(|kind| numbers.get(*kind).is_some());
            let before = numbers.clone();
            let after = numbers.with_main_number();

            match expected {
                Some(kind) => prop_assert_eq!(main_types(&after), vec![kind]),
                None => prop_assert_eq!(after, before),
            }
        }
    }
}
