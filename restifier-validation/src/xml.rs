// XML rendering of checked messages

use crate::{FieldValue, Message};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use restifier_core::Error;
use std::fmt::Display;

/// Render `valid_data` as a document rooted at the schema name.
///
/// Repeated values become sibling elements sharing the property name and
/// nested messages become nested elements.
pub(crate) fn to_xml(message: &Message) -> Result<String, Error> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    write_message(&mut writer, message.schema().name(), message)?;

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

/// Whether `name` can be used as an element tag: a letter or `_` followed by
/// letters, digits, `_`, `-` or `.`
pub(crate) fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn write_message(writer: &mut Writer<Vec<u8>>, tag: &str, message: &Message) -> Result<(), Error> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)?;
    for (name, value) in message.valid_data().iter() {
        write_value(writer, name, value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)
}

fn write_value(writer: &mut Writer<Vec<u8>>, tag: &str, value: &FieldValue) -> Result<(), Error> {
    match value {
        FieldValue::List(items) => {
            for item in items {
                write_value(writer, tag, item)?;
            }
            Ok(())
        }
        FieldValue::Message(nested) => write_message(writer, tag, nested),
        scalar => {
            let text = scalar.to_text().unwrap_or_default();
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(xml_err)
        }
    }
}

fn xml_err<E: Display>(err: E) -> Error {
    Error::Serialization(format!("XML serialization failed: {}", err))
}
