//! Parser for the ECB `eurofxref` reference rate documents.
//!
//! The feed nests one table per publication day inside an envelope:
//!
//! ```xml
//! <gesmes:Envelope ...>
//!     <Cube>
//!         <Cube time="2019-03-01">
//!             <Cube currency="USD" rate="1.1383"/>
//!             <Cube currency="RUB" rate="74.9928"/>
//!         </Cube>
//!     </Cube>
//! </gesmes:Envelope>
//! ```
//!
//! Rate entries are the `Cube` elements carrying a `currency` attribute,
//! located by search rather than by position. Only the first table is read.

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

use crate::core::rate::{RUB, RateTable, USD};
use crate::core::ConvertError;

fn malformed(e: impl Display) -> ConvertError {
    ConvertError::MalformedDocument(format!("Invalid XML: {e}"))
}

fn attribute<'a>(
    element: &'a BytesStart<'a>,
    name: &str,
) -> Result<Option<String>, ConvertError> {
    let Some(attr) = element.try_get_attribute(name).map_err(malformed)? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(malformed)?;
    Ok(Some(value.into_owned()))
}

fn parse_rate(currency: &str, raw: Option<String>) -> Result<Decimal, ConvertError> {
    let raw = raw.ok_or_else(|| {
        ConvertError::MalformedDocument(format!("Missing rate attribute for {currency}"))
    })?;
    match Decimal::from_str(raw.trim()) {
        Ok(rate) if rate > Decimal::ZERO => Ok(rate),
        _ => Err(ConvertError::MalformedDocument(format!(
            "Invalid {currency} rate: '{raw}'"
        ))),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .inspect_err(|e| debug!("Ignoring unparseable rate date '{}': {}", raw, e))
        .ok()
}

#[derive(Default)]
struct TableCollector {
    table: RateTable,
    /// Number of open elements while inside the first table
    depth: Option<usize>,
    closed: bool,
}

impl TableCollector {
    fn visit(
        &mut self,
        element: &BytesStart<'_>,
        open: &[Option<String>],
    ) -> Result<(), ConvertError> {
        // Entries directly under the root are not inside a table
        if open.len() < 2 || self.closed || element.local_name().as_ref() != b"Cube" {
            return Ok(());
        }
        let Some(currency) = attribute(element, "currency")? else {
            return Ok(());
        };

        match self.depth {
            None => {
                self.depth = Some(open.len());
                self.table.date = open
                    .last()
                    .and_then(|time| time.as_deref())
                    .and_then(parse_date);
            }
            Some(depth) if depth != open.len() => return Ok(()),
            Some(_) => {}
        }

        if currency == USD || currency == RUB {
            let rate = parse_rate(&currency, attribute(element, "rate")?)?;
            self.table.rates.insert(currency, rate);
        }
        Ok(())
    }

    fn leave(&mut self, open: &[Option<String>]) {
        if self.depth.is_some_and(|depth| open.len() < depth) {
            self.closed = true;
        }
    }
}

/// Extracts the USD and RUB rates from the first table of the document.
pub fn parse_rates(document: &[u8]) -> Result<RateTable, ConvertError> {
    let mut reader = Reader::from_reader(document);
    reader.config_mut().trim_text(true);

    // `time` attribute of every currently open element
    let mut open: Vec<Option<String>> = Vec::new();
    let mut seen_root = false;
    let mut collector = TableCollector::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format_args!("{} at position {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if open.is_empty() && seen_root {
                    return Err(malformed("multiple root elements"));
                }
                seen_root = true;
                collector.visit(e, &open)?;
                if matches!(event, Event::Start(_)) {
                    open.push(attribute(e, "time")?);
                }
            }
            Event::End(_) => {
                open.pop();
                collector.leave(&open);
            }
            Event::Text(_) | Event::CData(_) if open.is_empty() => {
                return Err(malformed("content outside of the root element"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed("document has no root element"));
    }
    if !open.is_empty() {
        return Err(malformed("unexpected end of document"));
    }
    if collector.depth.is_none() {
        return Err(ConvertError::MalformedDocument(
            "No currency rate table found in document".to_string(),
        ));
    }

    debug!(date = ?collector.table.date, rates = ?collector.table.rates, "Parsed rate table");
    Ok(collector.table)
}

/// Parses the document and derives the RUB per USD cross rate.
pub fn parse(document: &[u8]) -> Result<Decimal, ConvertError> {
    parse_rates(document)?.cross_rate()
}
