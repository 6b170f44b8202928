//! TLV composite encoding for field 10 (Acceptor Information).
//!
//! Field 10 carries a handful of merchant-facing subfields packed into
//! one LLLVAR string: each subfield is a 2-digit tag, a length prefix
//! sized per [`AcceptorTag::length`], and the subfield's value. Subfields
//! are written in ascending tag order and parsed back the same way.

use crate::error::{Iso8583Error, Result};
use crate::spec::{AcceptorTag, LengthType};

/// One decoded subfield: its tag and raw string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield tag.
    pub tag: AcceptorTag,
    /// Subfield value.
    pub value: String,
}

/// Encode a set of subfields into the field 10 wire string, sorted
/// ascending by tag regardless of input order.
pub fn encode(mut subfields: Vec<Subfield>) -> String {
    subfields.sort_by_key(|s| s.tag);

    let mut out = String::new();
    for subfield in subfields {
        out.push_str(&format!("{:02}", subfield.tag.number()));
        match subfield.tag.length() {
            LengthType::Fixed(_) => out.push_str(&subfield.value),
            LengthType::Llvar(_) => out.push_str(&format!("{:02}{}", subfield.value.len(), subfield.value)),
            LengthType::Lllvar(_) => out.push_str(&format!("{:03}{}", subfield.value.len(), subfield.value)),
        }
    }
    out
}

/// Decode the field 10 wire string into its subfields, in wire order.
pub fn decode(wire: &str) -> Result<Vec<Subfield>> {
    let bytes = wire.as_bytes();
    let mut offset = 0;
    let mut out = Vec::new();

    while offset < bytes.len() {
        if offset + 2 > bytes.len() {
            return Err(Iso8583Error::malformed("acceptor composite: truncated tag"));
        }
        let tag_str = std::str::from_utf8(&bytes[offset..offset + 2])
            .map_err(|_| Iso8583Error::malformed("acceptor composite: non-ASCII tag"))?;
        let tag_num: u8 = tag_str
            .parse()
            .map_err(|_| Iso8583Error::malformed(format!("acceptor composite: bad tag {tag_str:?}")))?;
        let tag = AcceptorTag::from_number(tag_num)
            .ok_or_else(|| Iso8583Error::malformed(format!("acceptor composite: unknown tag {tag_num}")))?;
        offset += 2;

        let value = match tag.length() {
            LengthType::Fixed(len) => {
                if offset + len > bytes.len() {
                    return Err(Iso8583Error::malformed("acceptor composite: truncated fixed value"));
                }
                let v = wire[offset..offset + len].to_string();
                offset += len;
                v
            }
            LengthType::Llvar(_) => {
                let (len, consumed) = read_len(bytes, offset, 2)?;
                offset += consumed;
                if offset + len > bytes.len() {
                    return Err(Iso8583Error::malformed("acceptor composite: truncated LLVAR value"));
                }
                let v = wire[offset..offset + len].to_string();
                offset += len;
                v
            }
            LengthType::Lllvar(_) => {
                let (len, consumed) = read_len(bytes, offset, 3)?;
                offset += consumed;
                if offset + len > bytes.len() {
                    return Err(Iso8583Error::malformed("acceptor composite: truncated LLLVAR value"));
                }
                let v = wire[offset..offset + len].to_string();
                offset += len;
                v
            }
        };

        out.push(Subfield { tag, value });
    }

    Ok(out)
}

fn read_len(bytes: &[u8], offset: usize, digits: usize) -> Result<(usize, usize)> {
    if offset + digits > bytes.len() {
        return Err(Iso8583Error::malformed("acceptor composite: truncated length prefix"));
    }
    let len = crate::encoding::decode_length(&bytes[offset..offset + digits])
        .map_err(|_| Iso8583Error::malformed("acceptor composite: non-numeric length prefix"))?;
    Ok((len, digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_tags() {
        let subfields = vec![
            Subfield {
                tag: AcceptorTag::WebSite,
                value: "https://acme.example".to_string(),
            },
            Subfield {
                tag: AcceptorTag::Name,
                value: "Acme Widgets".to_string(),
            },
            Subfield {
                tag: AcceptorTag::Mcc,
                value: "5944".to_string(),
            },
            Subfield {
                tag: AcceptorTag::PostalCode,
                value: "94107".to_string(),
            },
        ];

        let wire = encode(subfields.clone());
        let decoded = decode(&wire).unwrap();

        let mut sorted = subfields;
        sorted.sort_by_key(|s| s.tag);
        assert_eq!(decoded, sorted);
    }

    #[test]
    fn test_encode_sorts_ascending() {
        let wire = encode(vec![
            Subfield { tag: AcceptorTag::Mcc, value: "5944".to_string() },
            Subfield { tag: AcceptorTag::Name, value: "A".to_string() },
        ]);
        assert!(wire.starts_with("01"));
    }

    #[test]
    fn test_decode_unknown_tag() {
        assert!(decode("99foo").is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), vec![]);
    }
}
