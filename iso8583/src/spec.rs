//! Field specification tables for the message set this crate speaks.
//!
//! Unlike a general ISO 8583:1987 implementation, this system only ever
//! exchanges two message types (`0100`/`0110`) built from a fixed set of
//! twelve fields. The table below is scoped to exactly that, in the style
//! of a const lookup table indexed by field number.

/// Data type for a field's wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// ASCII digits/text.
    Ascii,
    /// Raw binary bytes (used only by the bitmap itself).
    Binary,
}

/// Length encoding for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthType {
    /// Fixed length, no length prefix.
    Fixed(usize),
    /// 2-digit ASCII length prefix (LLVAR).
    Llvar(usize),
    /// 3-digit ASCII length prefix (LLLVAR).
    Lllvar(usize),
}

/// Definition of a single field's wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field number (0 = MTI, 1 = bitmap, 2..=11 = data fields).
    pub number: u8,
    /// Human-readable name, used in error messages.
    pub name: &'static str,
    /// Wire data type.
    pub data_type: DataType,
    /// Length encoding.
    pub length: LengthType,
}

macro_rules! field_table {
    ($($number:expr => ($name:expr, $data_type:expr, $length:expr)),* $(,)?) => {{
        const LEN: usize = 12;
        let mut table: [Option<FieldDefinition>; LEN] = [None; LEN];
        $(
            table[$number] = Some(FieldDefinition {
                number: $number,
                name: $name,
                data_type: $data_type,
                length: $length,
            });
        )*
        table
    }};
}

/// Field table for fields 0 through 11.
///
/// Field 0 (MTI) and field 1 (bitmap) are pseudo-fields handled specially
/// by [`crate::message::Message`]; fields 2 through 11 are the actual data
/// elements carried by an authorization request/response.
pub const FIELD_TABLE: [Option<FieldDefinition>; 12] = field_table! {
    0 => ("Message Type Indicator", DataType::Ascii, LengthType::Fixed(4)),
    1 => ("Bitmap", DataType::Binary, LengthType::Fixed(8)),
    2 => ("Primary Account Number", DataType::Ascii, LengthType::Fixed(16)),
    3 => ("Amount", DataType::Ascii, LengthType::Fixed(6)),
    4 => ("Transmission Date & Time", DataType::Ascii, LengthType::Fixed(20)),
    5 => ("Approval Code", DataType::Ascii, LengthType::Fixed(2)),
    6 => ("Authorization Code", DataType::Ascii, LengthType::Fixed(6)),
    7 => ("Currency", DataType::Ascii, LengthType::Fixed(3)),
    8 => ("Card Verification Value", DataType::Ascii, LengthType::Fixed(4)),
    9 => ("Expiration Date", DataType::Ascii, LengthType::Fixed(4)),
    10 => ("Acceptor Information", DataType::Ascii, LengthType::Lllvar(999)),
    11 => ("System Trace Audit Number", DataType::Ascii, LengthType::Fixed(6)),
};

/// Look up a field's definition by number.
pub fn field_definition(number: u8) -> Option<&'static FieldDefinition> {
    FIELD_TABLE.get(number as usize).and_then(|d| d.as_ref())
}

/// Subfield tag within the field 10 (Acceptor Information) composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AcceptorTag {
    /// Merchant display name.
    Name = 1,
    /// Merchant category code.
    Mcc = 2,
    /// Merchant postal code.
    PostalCode = 3,
    /// Merchant website.
    WebSite = 4,
}

impl AcceptorTag {
    /// All tags in ascending numeric order, the order they are encoded in.
    pub const ALL: [AcceptorTag; 4] = [
        AcceptorTag::Name,
        AcceptorTag::Mcc,
        AcceptorTag::PostalCode,
        AcceptorTag::WebSite,
    ];

    /// Numeric tag as carried on the wire.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse a tag from its 2-digit wire number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(AcceptorTag::Name),
            2 => Some(AcceptorTag::Mcc),
            3 => Some(AcceptorTag::PostalCode),
            4 => Some(AcceptorTag::WebSite),
            _ => None,
        }
    }

    /// Length encoding for this subfield.
    pub fn length(self) -> LengthType {
        match self {
            AcceptorTag::Name => LengthType::Llvar(99),
            AcceptorTag::Mcc => LengthType::Fixed(4),
            AcceptorTag::PostalCode => LengthType::Llvar(10),
            AcceptorTag::WebSite => LengthType::Lllvar(299),
        }
    }
}
