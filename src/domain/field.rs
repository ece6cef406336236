use std::cmp::Ordering;
use std::fmt;

use super::publisher::Publisher;

/// Publisher attributes that can be filtered and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Name,
}

/// Borrowed view of a single attribute of a stored publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Long(Option<u64>),
    Text(Option<&'a str>),
}

impl FieldValue<'_> {
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Long(value) => value.is_some(),
            FieldValue::Text(value) => value.is_some(),
        }
    }
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Id, Field::Name];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
        }
    }

    pub fn read<'a>(&self, publisher: &'a Publisher) -> FieldValue<'a> {
        match self {
            Field::Id => FieldValue::Long(publisher.id),
            Field::Name => FieldValue::Text(Some(publisher.name.as_str())),
        }
    }

    /// Orders two publishers by this attribute, unset values first.
    pub fn compare(&self, a: &Publisher, b: &Publisher) -> Ordering {
        match self {
            Field::Id => a.id.cmp(&b.id),
            Field::Name => a.name.cmp(&b.name),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_fields() {
        assert_eq!(Field::parse("id"), Some(Field::Id));
        assert_eq!(Field::parse("name"), Some(Field::Name));
        assert_eq!(Field::parse("Name"), None);
        assert_eq!(Field::parse("page"), None);
    }

    #[test]
    fn read_unsaved_publisher() {
        let publisher = Publisher::new("Penguin");
        assert!(!Field::Id.read(&publisher).is_present());
        assert_eq!(Field::Name.read(&publisher), FieldValue::Text(Some("Penguin")));
    }
}
