use crate::Result;

/// One listing item: the free-text number mention and the name it belongs to,
/// both already stripped of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub text: String,
    pub name: String,
}

pub trait ListingSource {
    fn source_name(&self) -> &'static str;
    fn fetch_page(&self, page: u32) -> Result<String>;
}
