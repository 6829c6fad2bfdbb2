use serde::Serialize;

/// Values one parallel unit of work completed with
///
/// A single value is stored as is, several as a list. A unit that completed
/// with no values leaves `Empty`, which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Aggregate<V> {
    Empty,
    One(V),
    Many(Vec<V>),
}

impl<V> Aggregate<V> {
    pub fn from_values(mut values: Vec<V>) -> Self {
        match values.len() {
            0 => Aggregate::Empty,
            1 => match values.pop() {
                Some(value) => Aggregate::One(value),
                None => Aggregate::Empty,
            },
            _ => Aggregate::Many(values),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Aggregate::Empty)
    }

    pub fn as_one(&self) -> Option<&V> {
        match self {
            Aggregate::One(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_values(self) -> Vec<V> {
        match self {
            Aggregate::Empty => Vec::new(),
            Aggregate::One(value) => vec![value],
            Aggregate::Many(values) => values,
        }
    }
}

impl<V> From<Vec<V>> for Aggregate<V> {
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}
