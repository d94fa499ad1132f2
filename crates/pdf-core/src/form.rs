//! AcroForm field model
//!
//! Widgets are read page by page; each one is described by a [`FormField`]
//! carrying the fully qualified field name, its kind, and the object ids needed
//! to write a value back into the document.

use lopdf::{Object, ObjectId};

/// Field flag bits from `/Ff` (PDF 32000-1, tables 226 and 230)
pub mod flags {
    /// Button is a radio button (bit 16)
    pub const RADIO: i64 = 1 << 15;
    /// Button is a push button (bit 17)
    pub const PUSHBUTTON: i64 = 1 << 16;
    /// Choice field is a combo box (bit 18)
    pub const COMBO: i64 = 1 << 17;
}

/// Widget kind of a form field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `/Tx` field
    Text,
    /// `/Ch` field with the combo flag set
    ComboBox,
    /// `/Ch` field without the combo flag
    ListBox,
    /// `/Btn` field that is neither a radio nor a push button
    CheckBox,
    /// Anything else (radio buttons, push buttons, signatures, unknown types)
    Unsupported(String),
}

impl FieldKind {
    /// Classify a field from its (inherited) `/FT` name and `/Ff` flags
    pub fn classify(field_type: Option<&[u8]>, field_flags: i64) -> Self {
        match field_type {
            Some(b"Tx") => FieldKind::Text,
            Some(b"Ch") if field_flags & flags::COMBO != 0 => FieldKind::ComboBox,
            Some(b"Ch") => FieldKind::ListBox,
            Some(b"Btn") if field_flags & flags::PUSHBUTTON != 0 => {
                FieldKind::Unsupported("PushButton".to_string())
            }
            Some(b"Btn") if field_flags & flags::RADIO != 0 => {
                FieldKind::Unsupported("RadioButton".to_string())
            }
            Some(b"Btn") => FieldKind::CheckBox,
            Some(b"Sig") => FieldKind::Unsupported("Signature".to_string()),
            Some(other) => FieldKind::Unsupported(String::from_utf8_lossy(other).into_owned()),
            None => FieldKind::Unsupported("Unknown".to_string()),
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            FieldKind::Text => "Text Field",
            FieldKind::ComboBox => "Combobox",
            FieldKind::ListBox => "Listbox",
            FieldKind::CheckBox => "Checkbox",
            FieldKind::Unsupported(name) => name,
        }
    }
}

/// A value ready to be stored in a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text field content
    Text(String),
    /// Selected option of a combo box or list box
    Choice(String),
    /// Checkbox state
    Checked(bool),
}

/// A widget annotation and the field it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Fully qualified field name (partial names joined with `.`)
    pub name: String,
    /// Widget kind
    pub kind: FieldKind,
    /// Current `/V` value, if any
    pub value: Option<String>,
    /// Page number (1-indexed)
    pub page: usize,
    /// Object holding `/T` and `/V`
    pub field_id: ObjectId,
    /// Widget annotation object (same as `field_id` for merged dictionaries)
    pub widget_id: ObjectId,
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise byte-per-char)
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Encode text as a PDF string object
///
/// ASCII text is stored as a literal; anything else as UTF-16BE with BOM.
pub fn encode_text_string(text: &str) -> Object {
    if text.chars().all(|c| (c as u32) < 0x80) {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

/// Render a `/V` object as text for display and comparison
pub(crate) fn value_to_string(value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_field_types() {
        assert_eq!(FieldKind::classify(Some(b"Tx"), 0), FieldKind::Text);
        assert_eq!(
            FieldKind::classify(Some(b"Ch"), flags::COMBO),
            FieldKind::ComboBox
        );
        assert_eq!(FieldKind::classify(Some(b"Ch"), 0), FieldKind::ListBox);
        assert_eq!(FieldKind::classify(Some(b"Btn"), 0), FieldKind::CheckBox);
    }

    #[test]
    fn test_classify_unsupported_buttons() {
        assert!(matches!(
            FieldKind::classify(Some(b"Btn"), flags::RADIO),
            FieldKind::Unsupported(_)
        ));
        assert!(matches!(
            FieldKind::classify(Some(b"Btn"), flags::PUSHBUTTON),
            FieldKind::Unsupported(_)
        ));
        assert_eq!(FieldKind::classify(Some(b"Sig"), 0).label(), "Signature");
        assert_eq!(FieldKind::classify(None, 0).label(), "Unknown");
    }

    #[test]
    fn test_text_string_ascii() {
        let obj = encode_text_string("MES Electric");
        match obj {
            Object::String(ref bytes, _) => {
                assert_eq!(decode_text_string(bytes), "MES Electric")
            }
            _ => panic!("expected string object"),
        }
    }

    #[test]
    fn test_text_string_utf16() {
        let obj = encode_text_string("José Muñoz");
        let Object::String(bytes, _) = obj else {
            panic!("expected string object");
        };
        assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
        assert_eq!(decode_text_string(&bytes), "José Muñoz");
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(
            value_to_string(&Object::Name(b"Yes".to_vec())),
            Some("Yes".to_string())
        );
        assert_eq!(value_to_string(&Object::Null), None);
    }
}
