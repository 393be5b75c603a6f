//! Host values exposed to scripts.
//!
//! Values are a closed set of variants. What a script may do with a value is
//! decided by its [`Capabilities`], and every operation checks the table before
//! dispatching on the variant.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("{type_name} does not support {operation}")]
    Unsupported { operation: &'static str, type_name: &'static str },

    #[error("invalid operator for {lhs} and {rhs}")]
    InvalidOperator { lhs: &'static str, rhs: &'static str },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("invalid index type {0}")]
    InvalidIndexType(&'static str),

    #[error("invalid index value type {0}")]
    InvalidIndexValueType(&'static str),

    #[error("wrong number of arguments: expected {expected}, found {found}")]
    WrongNumArguments { expected: usize, found: usize },

    #[error("invalid type for argument '{name}': expected {expected}, found {found}")]
    InvalidArgumentType { name: &'static str, expected: &'static str, found: &'static str },
}

/// What a value supports inside the script runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub arithmetic: bool,
    pub index: bool,
    pub iterate: bool,
    pub call: bool,
}

impl Capabilities {
    pub const NONE: Capabilities =
        Capabilities { arithmetic: false, index: false, iterate: false, call: false };
    pub const ALL: Capabilities =
        Capabilities { arithmetic: true, index: true, iterate: true, call: true };
}

/// Ordered list of strings shared with scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostList {
    items: Vec<String>,
}

impl HostList {
    pub const TYPE_NAME: &'static str = "HostList";
    pub const CAPABILITIES: Capabilities = Capabilities::ALL;

    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Left operand's items followed by the right operand's.
    pub fn concat(&self, rhs: &HostList) -> HostList {
        if rhs.is_empty() {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.extend(rhs.items.iter().cloned());
        HostList { items }
    }

    fn slot(&self, index: i64) -> Result<usize, ValueError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.items.len())
            .ok_or(ValueError::IndexOutOfBounds { index, len: self.items.len() })
    }

    pub fn get(&self, index: i64) -> Result<&str, ValueError> {
        let slot = self.slot(index)?;
        Ok(&self.items[slot])
    }

    pub fn set(&mut self, index: i64, value: String) -> Result<(), ValueError> {
        let slot = self.slot(index)?;
        self.items[slot] = value;
        Ok(())
    }

    /// Position of the first item equal to `value`.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    /// `(position, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.items.iter().map(String::as_str).enumerate()
    }
}

impl From<Vec<String>> for HostList {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for HostList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.join(", "))
    }
}

/// A value crossing the host/script boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostValue {
    /// Declared but not bound.
    #[default]
    Unset,
    Int(i64),
    Str(String),
    List(HostList),
}

impl HostValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Unset => "unset",
            HostValue::Int(_) => "int",
            HostValue::Str(_) => "string",
            HostValue::List(_) => HostList::TYPE_NAME,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            HostValue::List(_) => HostList::CAPABILITIES,
            _ => Capabilities::NONE,
        }
    }

    fn require(&self, supported: bool, operation: &'static str) -> Result<(), ValueError> {
        if supported {
            Ok(())
        } else {
            Err(ValueError::Unsupported { operation, type_name: self.type_name() })
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            HostValue::Unset => false,
            HostValue::Int(i) => *i != 0,
            HostValue::Str(s) => !s.is_empty(),
            HostValue::List(list) => !list.is_empty(),
        }
    }

    /// Value as a string, when it has a natural string form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            HostValue::Int(i) => Some(i.to_string()),
            HostValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// The `+` operator.
    pub fn add(&self, rhs: &HostValue) -> Result<HostValue, ValueError> {
        self.require(self.capabilities().arithmetic, "arithmetic")?;
        match (self, rhs) {
            (HostValue::List(lhs), HostValue::List(rhs)) => Ok(HostValue::List(lhs.concat(rhs))),
            _ => Err(ValueError::InvalidOperator { lhs: self.type_name(), rhs: rhs.type_name() }),
        }
    }

    /// Reads by position, or looks up the position of a value.
    ///
    /// A value lookup that finds nothing yields [`HostValue::Unset`].
    pub fn index_get(&self, key: &HostValue) -> Result<HostValue, ValueError> {
        self.require(self.capabilities().index, "indexing")?;
        let HostValue::List(list) = self else {
            return Err(ValueError::Unsupported { operation: "indexing", type_name: self.type_name() });
        };
        match key {
            HostValue::Int(i) => Ok(HostValue::Str(list.get(*i)?.to_string())),
            HostValue::Str(s) => Ok(list.position(s).map_or(HostValue::Unset, |p| HostValue::Int(p as i64))),
            other => Err(ValueError::InvalidIndexType(other.type_name())),
        }
    }

    /// Writes by position. The stored value is the string form of `value`.
    pub fn index_set(&mut self, key: &HostValue, value: &HostValue) -> Result<(), ValueError> {
        self.require(self.capabilities().index, "indexing")?;
        let text = value.to_text().ok_or(ValueError::InvalidIndexValueType(value.type_name()))?;
        let type_name = self.type_name();
        let HostValue::List(list) = self else {
            return Err(ValueError::Unsupported { operation: "indexing", type_name });
        };
        match key {
            HostValue::Int(i) => list.set(*i, text),
            other => Err(ValueError::InvalidIndexType(other.type_name())),
        }
    }

    /// Calling a list with one value returns that value's position, or unset.
    pub fn call(&self, args: &[HostValue]) -> Result<HostValue, ValueError> {
        self.require(self.capabilities().call, "calls")?;
        let HostValue::List(list) = self else {
            return Err(ValueError::Unsupported { operation: "calls", type_name: self.type_name() });
        };
        let [arg] = args else {
            return Err(ValueError::WrongNumArguments { expected: 1, found: args.len() });
        };
        let needle = arg.to_text().ok_or(ValueError::InvalidArgumentType {
            name: "first",
            expected: "string",
            found: arg.type_name(),
        })?;
        Ok(list.position(&needle).map_or(HostValue::Unset, |p| HostValue::Int(p as i64)))
    }

    /// `(position, value)` pairs in order.
    pub fn iterate(&self) -> Result<Vec<(i64, HostValue)>, ValueError> {
        self.require(self.capabilities().iterate, "iteration")?;
        match self {
            HostValue::List(list) => Ok(list
                .iter()
                .map(|(i, v)| (i as i64, HostValue::Str(v.to_string())))
                .collect()),
            _ => Err(ValueError::Unsupported { operation: "iteration", type_name: self.type_name() }),
        }
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Str(value)
    }
}

impl From<HostList> for HostValue {
    fn from(value: HostList) -> Self {
        HostValue::List(value)
    }
}
