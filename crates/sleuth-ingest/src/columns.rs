//! Header normalization.

use csv::StringRecord;

use crate::error::IngestError;

/// Logical column and the header spellings accepted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    From,
    To,
    Value,
    Time,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::From, Field::To, Field::Value, Field::Time];

    pub fn name(self) -> &'static str {
        match self {
            Field::From => "from",
            Field::To => "to",
            Field::Value => "value",
            Field::Time => "timestamp",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::From => &["from", "sender"],
            Field::To => &["to", "receiver"],
            Field::Value => &["value", "amount"],
            Field::Time => &["timestamp", "time"],
        }
    }

    fn matches(self, header: &str) -> bool {
        let header = header.trim();
        self.aliases().iter().any(|a| header.eq_ignore_ascii_case(a))
    }
}

/// Positions of the required fields within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub from: usize,
    pub to: usize,
    pub value: usize,
    pub time: usize,
}

impl Columns {
    /// Locate every required field; the first matching header wins.
    pub fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |field: Field| {
            headers
                .iter()
                .position(|h| field.matches(h))
                .ok_or(IngestError::MissingColumn(field.name()))
        };
        Ok(Self {
            from: find(Field::From)?,
            to: find(Field::To)?,
            value: find(Field::Value)?,
            time: find(Field::Time)?,
        })
    }

    pub fn get(&self, field: Field) -> usize {
        match field {
            Field::From => self.from,
            Field::To => self.to,
            Field::Value => self.value,
            Field::Time => self.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_raw_export_headers() {
        let headers = StringRecord::from(vec!["Unnamed: 0", "sender", "receiver", "amount", "timestamp"]);
        let cols = Columns::resolve(&headers).unwrap();
        assert_eq!(cols, Columns { from: 1, to: 2, value: 3, time: 4 });
    }

    #[test]
    fn resolves_normalized_headers_case_insensitive() {
        let headers = StringRecord::from(vec!["TimeStamp", "Value", "To", " From "]);
        let cols = Columns::resolve(&headers).unwrap();
        assert_eq!(cols, Columns { from: 3, to: 2, value: 1, time: 0 });
        for field in Field::ALL {
            assert!(cols.get(field) < 4);
        }
    }

    #[test]
    fn missing_column_reported() {
        let headers = StringRecord::from(vec!["sender", "receiver", "timestamp"]);
        match Columns::resolve(&headers) {
            Err(IngestError::MissingColumn(name)) => assert_eq!(name, "value"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }
}
