//! Positional parameter consumption.

use crate::value::SqlValue;

/// The caller's parameter list, consumed one placeholder at a time.
///
/// Each `?` takes the next value in order. When the list runs out the
/// placeholder binds NULL and the shortfall is counted, so callers can
/// report it.
#[derive(Debug, Clone, Default)]
pub struct ParamQueue {
    values: Vec<SqlValue>,
    next: usize,
    missing: usize,
}

impl ParamQueue {
    /// Wraps the caller's values.
    #[must_use]
    pub const fn new(values: Vec<SqlValue>) -> Self {
        Self {
            values,
            next: 0,
            missing: 0,
        }
    }

    /// Takes the next value, or NULL if none are left.
    pub fn next_value(&mut self) -> SqlValue {
        if let Some(value) = self.values.get(self.next) {
            self.next += 1;
            value.clone()
        } else {
            self.missing += 1;
            SqlValue::Null
        }
    }

    /// Values handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.next
    }

    /// Values never asked for.
    #[must_use]
    pub fn leftover(&self) -> usize {
        self.values.len() - self.next
    }

    /// Placeholders that found no value and bound NULL.
    #[must_use]
    pub const fn missing(&self) -> usize {
        self.missing
    }
}

impl From<Vec<SqlValue>> for ParamQueue {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}
