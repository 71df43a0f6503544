//! The phonebook import format understood by the FRITZ!Box firmware.
//!
//! The firmware is strict about this layout: ISO-8859-1 with a matching XML
//! declaration, two-space indentation, and empty `services`/`setup` elements
//! in every contact.

use crate::error::{Result, SyncError};
use fritzbook_core::{
    Category, Contact, NumberEntry, NumberType, Numbers, Person, Phonebook, PhonebookCollection,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::path::Path;

pub const ENCODING: &str = "iso-8859-1";
const INDENT: usize = 2;

pub fn write_document(collection: &PhonebookCollection) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some(ENCODING), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("phonebooks")))?;
    for book in &collection.phonebooks {
        write_phonebook(&mut writer, book)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("phonebooks")))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    let xml = String::from_utf8(xml).map_err(|err| SyncError::Parse(err.to_string()))?;
    Ok(encode_latin1(&xml))
}

/// Writes the whole document to `path` in one call, creating parent directories.
pub fn write_document_to(path: &Path, collection: &PhonebookCollection) -> Result<()> {
    let data = write_document(collection)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)?;
    Ok(())
}

fn write_phonebook(writer: &mut Writer<Vec<u8>>, book: &Phonebook) -> Result<()> {
    let mut start = BytesStart::new("phonebook");
    if let Some(name) = book.name.as_deref() {
        start.push_attribute(("name", name));
    }
    emit(writer, Event::Start(start))?;
    for contact in &book.contacts {
        write_contact(writer, contact)?;
    }
    emit(writer, Event::End(BytesEnd::new("phonebook")))
}

fn write_contact(writer: &mut Writer<Vec<u8>>, contact: &Contact) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("contact")))?;
    text_element(writer, "category", &contact.category.code().to_string())?;

    emit(writer, Event::Start(BytesStart::new("person")))?;
    text_element(writer, "realName", contact.person.real_name())?;
    if let Some(image_url) = contact.person.image_url() {
        text_element(writer, "imageURL", image_url)?;
    }
    emit(writer, Event::End(BytesEnd::new("person")))?;

    if contact.has_numbers() {
        emit(writer, Event::Start(BytesStart::new("telephony")))?;
        for (kind, entry) in contact.numbers.iter() {
            write_number(writer, kind, entry)?;
        }
        emit(writer, Event::End(BytesEnd::new("telephony")))?;
    } else {
        emit(writer, Event::Empty(BytesStart::new("telephony")))?;
    }

    emit(writer, Event::Empty(BytesStart::new("services")))?;
    emit(writer, Event::Empty(BytesStart::new("setup")))?;
    if let Some(modified_at) = contact.modified_at {
        text_element(writer, "mod_time", &modified_at.to_string())?;
    }
    emit(writer, Event::End(BytesEnd::new("contact")))
}

fn write_number(writer: &mut Writer<Vec<u8>>, kind: NumberType, entry: &NumberEntry) -> Result<()> {
    let prio = entry.priority().to_string();
    let quickdial = entry.quickdial().map(|slot| slot.to_string());

    let mut start = BytesStart::new("number");
    start.push_attribute(("type", kind.as_str()));
    start.push_attribute(("prio", prio.as_str()));
    if let Some(vanity) = entry.vanity() {
        start.push_attribute(("vanity", vanity));
    }
    if let Some(quickdial) = quickdial.as_deref() {
        start.push_attribute(("quickdial", quickdial));
    }
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(entry.number())))?;
    emit(writer, Event::End(BytesEnd::new("number")))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| SyncError::Parse(err.to_string()))
}

/// Characters outside Latin-1 become numeric character references.
fn encode_latin1(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match u8::try_from(u32::from(ch)) {
            Ok(byte) => out.push(byte),
            Err(_) => out.extend_from_slice(format!("&#{};", u32::from(ch)).as_bytes()),
        }
    }
    out
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

pub fn read_document(bytes: &[u8]) -> Result<PhonebookCollection> {
    let xml = decode_latin1(bytes);
    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut builder = DocumentBuilder::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref event)) => builder.open(event)?,
            Ok(Event::Empty(ref event)) => {
                builder.open(event)?;
                builder.close(event.local_name().as_ref())?;
            }
            Ok(Event::End(ref event)) => builder.close(event.local_name().as_ref())?,
            Ok(Event::Text(event)) => {
                let text = event
                    .unescape()
                    .map_err(|err| SyncError::Parse(err.to_string()))?;
                builder.text.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(SyncError::Parse(err.to_string())),
        }
        buf.clear();
    }

    Ok(builder.collection)
}

#[derive(Default)]
struct DocumentBuilder {
    collection: PhonebookCollection,
    book: Option<Phonebook>,
    contact: Option<RawContact>,
    number: Option<RawNumber>,
    text: String,
}

#[derive(Default)]
struct RawContact {
    category: Category,
    real_name: Option<String>,
    image_url: Option<String>,
    numbers: Numbers,
    modified_at: Option<i64>,
}

struct RawNumber {
    kind: NumberType,
    prio: u8,
    vanity: Option<String>,
    quickdial: Option<u8>,
}

impl DocumentBuilder {
    fn open(&mut self, event: &BytesStart<'_>) -> Result<()> {
        self.text.clear();
        match event.local_name().as_ref() {
            b"phonebook" => {
                self.book = Some(Phonebook {
                    name: attribute(event, b"name")?,
                    contacts: Vec::new(),
                });
            }
            b"contact" => self.contact = Some(RawContact::default()),
            b"number" => {
                let kind = attribute(event, b"type")?
                    .ok_or_else(|| SyncError::Parse("number without type".to_string()))?;
                self.number = Some(RawNumber {
                    kind: kind.parse()?,
                    prio: parse_attribute(event, b"prio")?.unwrap_or(0),
                    vanity: attribute(event, b"vanity")?,
                    quickdial: parse_attribute(event, b"quickdial")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        let raw = std::mem::take(&mut self.text);
        let text = raw.trim().to_string();

        match name {
            b"phonebooks" => {}
            b"phonebook" => {
                let book = self.book.take().ok_or_else(|| unexpected("phonebook"))?;
                self.collection.add_phonebook(book);
            }
            b"contact" => {
                let raw = self.contact.take().ok_or_else(|| unexpected("contact"))?;
                let real_name = raw.real_name.unwrap_or_default();
                let mut person = Person::new(real_name)?;
                person.set_image_url(raw.image_url);
                let mut contact = Contact::new(raw.category, person, raw.numbers);
                contact.modified_at = raw.modified_at;
                self.book
                    .as_mut()
                    .ok_or_else(|| unexpected("contact"))?
                    .add_contact(contact);
            }
            b"number" => {
                let raw = self.number.take().ok_or_else(|| unexpected("number"))?;
                let mut entry = NumberEntry::new(text).with_priority(raw.prio)?;
                if let Some(vanity) = raw.vanity {
                    entry = entry.with_vanity(vanity);
                }
                if let Some(quickdial) = raw.quickdial {
                    entry = entry.with_quickdial(quickdial)?;
                }
                self.contact_mut("number")?.numbers.insert(raw.kind, entry);
            }
            b"category" => {
                let code = parse_number::<u8>("category", &text)?;
                self.contact_mut("category")?.category = Category::try_from(code)?;
            }
            b"realName" => {
                // Names keep their surrounding spaces; only blank text collapses.
                let real_name = if text.is_empty() { text } else { raw };
                self.contact_mut("realName")?.real_name = Some(real_name);
            }
            b"imageURL" => self.contact_mut("imageURL")?.image_url = Some(text),
            b"mod_time" => {
                let modified_at = parse_number::<i64>("mod_time", &text)?;
                self.contact_mut("mod_time")?.modified_at = Some(modified_at);
            }
            _ => {}
        }
        Ok(())
    }

    fn contact_mut(&mut self, element: &str) -> Result<&mut RawContact> {
        self.contact.as_mut().ok_or_else(|| unexpected(element))
    }
}

fn attribute(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in event.attributes() {
        let attr = attr.map_err(|err| SyncError::Parse(err.to_string()))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| SyncError::Parse(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_attribute<T: std::str::FromStr>(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<T>> {
    match attribute(event, key)? {
        Some(raw) => {
            let label = String::from_utf8_lossy(key);
            Ok(Some(parse_number(&label, &raw)?))
        }
        None => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(label: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| SyncError::Parse(format!("invalid {label}: '{raw}'")))
}

fn unexpected(element: &str) -> SyncError {
    SyncError::Parse(format!("unexpected {element} element"))
}

#[cfg(test)]
mod tests {
    use super::{read_document, write_document, write_document_to};
    use crate::error::SyncError;
    use fritzbook_core::{
        Category, Contact, CoreError, NumberEntry, NumberType, Numbers, Person, Phonebook,
        PhonebookCollection,
    };
    use tempfile::TempDir;

    fn single_contact_collection() -> PhonebookCollection {
        let mut numbers = Numbers::new();
        numbers.insert(
            NumberType::Home,
            NumberEntry::new("+12345678").with_priority(1).unwrap(),
        );
        let contact = Contact::new(Category::Normal, Person::new("Mr. X").unwrap(), numbers)
            .with_modified_at(1_700_000_000);
        let mut book = Phonebook::new();
        book.add_contact(contact);
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);
        books
    }

    #[test]
    fn writes_exact_firmware_layout() {
        let data = write_document(&single_contact_collection()).expect("write");
        let expected = "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>
<phonebooks>
  <phonebook>
    <contact>
      <category>0</category>
      <person>
        <realName>Mr. X</realName>
      </person>
      <telephony>
        <number type=\"home\" prio=\"1\">+12345678</number>
      </telephony>
      <services/>
      <setup/>
      <mod_time>1700000000</mod_time>
    </contact>
  </phonebook>
</phonebooks>
";
        assert_eq!(String::from_utf8(data).expect("ascii"), expected);
    }

    #[test]
    fn optional_elements_and_attributes() {
        let mut numbers = Numbers::new();
        numbers.insert(
            NumberType::Work,
            NumberEntry::new("+41441234567")
                .with_vanity("SPAM")
                .with_quickdial(12)
                .unwrap(),
        );
        let person = Person::new("Mr. Y")
            .unwrap()
            .with_image_url("file:///var/InternerSpeicher/FRITZ/fonpix/1.jpg");
        let mut book = Phonebook::named("Blacklist");
        book.add_contact(Contact::new(Category::Vip, person, numbers));
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);

        let xml = String::from_utf8(write_document(&books).expect("write")).expect("ascii");
        assert!(xml.contains("<phonebook name=\"Blacklist\">"));
        assert!(xml.contains("<category>1</category>"));
        assert!(xml.contains("<imageURL>file:///var/InternerSpeicher/FRITZ/fonpix/1.jpg</imageURL>"));
        assert!(xml.contains(
            "<number type=\"work\" prio=\"0\" vanity=\"SPAM\" quickdial=\"12\">+41441234567</number>"
        ));
        assert!(!xml.contains("mod_time"));
    }

    #[test]
    fn contact_without_numbers_keeps_empty_telephony() {
        let mut book = Phonebook::new();
        book.add_contact(Contact::new(
            Category::Normal,
            Person::new("Nobody").unwrap(),
            Numbers::new(),
        ));
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);
        let xml = String::from_utf8(write_document(&books).expect("write")).expect("ascii");
        assert!(xml.contains("<telephony/>"));
        assert!(xml.contains("<services/>"));
        assert!(xml.contains("<setup/>"));
    }

    #[test]
    fn encodes_latin1_and_references_the_rest() {
        let mut book = Phonebook::new();
        book.add_contact(Contact::new(
            Category::Normal,
            Person::new("Zürich Inkasso €").unwrap(),
            Numbers::new(),
        ));
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);

        let data = write_document(&books).expect("write");
        let needle = b"<realName>Z\xfcrich Inkasso &#8364;</realName>";
        assert!(data.windows(needle.len()).any(|window| window == needle));

        let parsed = read_document(&data).expect("read");
        assert_eq!(
            parsed.phonebooks[0].contacts[0].person.real_name(),
            "Zürich Inkasso €"
        );
    }

    #[test]
    fn round_trip_preserves_contacts() {
        let mut numbers = Numbers::new();
        numbers.insert(
            NumberType::Home,
            NumberEntry::new("+41 44 111 11 11").with_priority(1).unwrap(),
        );
        numbers.insert(
            NumberType::Fax,
            NumberEntry::new("+41441111112")
                .with_vanity("A&B <fax>")
                .with_quickdial(99)
                .unwrap(),
        );
        let first = Contact::new(Category::Vip, Person::new("Müller & Söhne").unwrap(), numbers)
            .with_modified_at(1_451_606_400);
        let mut second_numbers = Numbers::new();
        second_numbers.insert(NumberType::Mobile, NumberEntry::new("+41791234567"));
        let second = Contact::new(
            Category::Normal,
            Person::new("Mr. Y").unwrap().with_image_url("file:///img/2.jpg"),
            second_numbers,
        );

        let mut main = Phonebook::new();
        main.add_contact(first);
        let mut other = Phonebook::named("Blacklist");
        other.add_contact(second.clone());
        other.add_contact(second);
        let mut books = PhonebookCollection::new();
        books.add_phonebook(main);
        books.add_phonebook(other);

        let data = write_document(&books).expect("write");
        let parsed = read_document(&data).expect("read");
        assert_eq!(parsed, books);
    }

    #[test]
    fn empty_vanity_is_not_written() {
        let mut numbers = Numbers::new();
        numbers.insert(NumberType::Work, NumberEntry::new("+41441").with_vanity(""));
        let mut book = Phonebook::new();
        book.add_contact(Contact::new(
            Category::Normal,
            Person::new("Mr. Z").unwrap(),
            numbers,
        ));
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);

        let xml = String::from_utf8(write_document(&books).expect("write")).expect("ascii");
        assert!(xml.contains("<number type=\"work\" prio=\"0\">+41441</number>"));
        assert!(!xml.contains("vanity"));
    }

    #[test]
    fn round_trip_keeps_spaces_around_names() {
        let mut book = Phonebook::new();
        book.add_contact(Contact::new(
            Category::Normal,
            Person::new("  Spam AG ").unwrap(),
            Numbers::new(),
        ));
        let mut books = PhonebookCollection::new();
        books.add_phonebook(book);

        let parsed = read_document(&write_document(&books).expect("write")).expect("read");
        assert_eq!(parsed.phonebooks[0].contacts[0].person.real_name(), "  Spam AG ");
    }

    #[test]
    fn read_rejects_unknown_number_type() {
        let xml = br#"<?xml version="1.0" encoding="iso-8859-1"?>
<phonebooks><phonebook><contact><category>0</category>
<person><realName>X</realName></person>
<telephony><number type="pager" prio="0">123</number></telephony>
</contact></phonebook></phonebooks>"#;
        let err = read_document(xml).unwrap_err();
        assert!(matches!(
            err,
            SyncError::Core(CoreError::InvalidNumberType(ref kind)) if kind == "pager"
        ));
    }

    #[test]
    fn read_rejects_bad_category() {
        let xml = br#"<phonebooks><phonebook><contact><category>x</category>
<person><realName>X</realName></person></contact></phonebook></phonebooks>"#;
        let err = read_document(xml).unwrap_err();
        assert!(err.to_string().contains("invalid category"));
    }

    #[test]
    fn write_document_to_creates_parent_directories() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("out").join("book.xml");
        write_document_to(&path, &single_contact_collection()).expect("write file");
        let data = std::fs::read(&path).expect("read file");
        assert!(data.starts_with(b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>"));
    }
}
