//! The variant tree stored in YAML files.

use std::fmt;
use std::ops::Index;

use derive_more::derive::Display;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Ordered map of named children, in insertion order
pub type Hash = IndexMap<String, Node>;

/// Type tag stored in front of every node
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum NodeType {
    /// No value
    Invalid = 0,
    /// Signed 32 bit integer
    Int = 1,
    /// 32 bit float
    Float = 2,
    /// Boolean stored in 4 bytes
    Bool = 3,
    /// Offset to a HAL string
    String = 4,
    /// Map of named children
    Hash = 5,
    /// List of children
    Array = 6,
}

impl NodeType {
    /// The tag written to disk
    pub fn tag(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for NodeType {
    type Error = i32;

    fn try_from(tag: i32) -> core::result::Result<Self, Self::Error> {
        Ok(match tag {
            0 => NodeType::Invalid,
            1 => NodeType::Int,
            2 => NodeType::Float,
            3 => NodeType::Bool,
            4 => NodeType::String,
            5 => NodeType::Hash,
            6 => NodeType::Array,
            _ => return Err(tag),
        })
    }
}

/// A single value in a YAML tree
///
/// Getters named `as_*` never fail and fall back to a default value when the type does not
/// match; use the [`TryFrom`] conversions when a mismatch should be reported.
///
/// ```
/// use hal_yaml::node::Node;
///
/// let mut root = Node::hash();
/// root.insert("Name", "Kirby").unwrap();
/// root.insert("Health", 6).unwrap();
///
/// assert_eq!(root["Name"].as_str(), "Kirby");
/// assert_eq!(root["Health"].as_int(), 6);
/// assert_eq!(root["Missing"].as_int(), 0);
/// assert_eq!(i32::try_from(&root["Health"]).unwrap(), 6);
/// assert!(bool::try_from(&root["Name"]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    /// No value
    #[default]
    Invalid,
    /// Signed 32 bit integer
    Int(i32),
    /// 32 bit float
    Float(f32),
    /// Boolean
    Bool(bool),
    /// Text
    String(String),
    /// Named children in insertion order
    Hash(Hash),
    /// Positional children
    Array(Vec<Node>),
}

static INVALID: Node = Node::Invalid;

impl Node {
    /// Create an empty hash
    pub fn hash() -> Node {
        Node::Hash(Hash::new())
    }

    /// Create an empty array
    pub fn array() -> Node {
        Node::Array(Vec::new())
    }

    /// The type tag of this node
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Invalid => NodeType::Invalid,
            Node::Int(_) => NodeType::Int,
            Node::Float(_) => NodeType::Float,
            Node::Bool(_) => NodeType::Bool,
            Node::String(_) => NodeType::String,
            Node::Hash(_) => NodeType::Hash,
            Node::Array(_) => NodeType::Array,
        }
    }

    /// Whether this node has no value
    pub fn is_invalid(&self) -> bool {
        matches!(self, Node::Invalid)
    }

    /// Number of children, 0 for scalars
    pub fn len(&self) -> usize {
        match self {
            Node::Hash(hash) => hash.len(),
            Node::Array(array) => array.len(),
            _ => 0,
        }
    }

    /// Whether this node has no children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer value, or 0
    pub fn as_int(&self) -> i32 {
        match self {
            Node::Int(value) => *value,
            _ => 0,
        }
    }

    /// Float value, or 0.0
    pub fn as_float(&self) -> f32 {
        match self {
            Node::Float(value) => *value,
            _ => 0.0,
        }
    }

    /// Boolean value, or false
    pub fn as_bool(&self) -> bool {
        match self {
            Node::Bool(value) => *value,
            _ => false,
        }
    }

    /// String value, or an empty string
    pub fn as_str(&self) -> &str {
        match self {
            Node::String(value) => value,
            _ => "",
        }
    }

    /// Children of a hash
    pub fn as_hash(&self) -> Option<&Hash> {
        match self {
            Node::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Mutable children of a hash
    pub fn as_hash_mut(&mut self) -> Option<&mut Hash> {
        match self {
            Node::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Children of an array
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Mutable children of an array
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Child of a hash by name
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_hash().and_then(|hash| hash.get(key))
    }

    /// Mutable child of a hash by name
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.as_hash_mut().and_then(|hash| hash.get_mut(key))
    }

    /// Child by position. Hash children are counted in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Hash(hash) => hash.get_index(index).map(|(_, value)| value),
            Node::Array(array) => array.get(index),
            _ => None,
        }
    }

    /// Mutable child by position
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Node> {
        match self {
            Node::Hash(hash) => hash.get_index_mut(index).map(|(_, value)| value),
            Node::Array(array) => array.get_mut(index),
            _ => None,
        }
    }

    /// Child of a hash by name, failing when it does not exist
    pub fn lookup(&self, key: &str) -> Result<&Node> {
        let hash = self.as_hash().ok_or(Error::TypeMismatch {
            expected: NodeType::Hash,
            found: self.node_type(),
        })?;

        hash.get(key)
            .ok_or_else(|| Error::MissingKey(key.to_owned()))
    }

    /// Child by position, failing when it does not exist
    pub fn lookup_index(&self, index: usize) -> Result<&Node> {
        self.get_index(index).ok_or(Error::MissingIndex {
            index,
            length: self.len(),
        })
    }

    /// Name of the hash child at `index`
    pub fn key(&self, index: usize) -> Option<&str> {
        self.as_hash()
            .and_then(|hash| hash.get_index(index))
            .map(|(key, _)| key.as_str())
    }

    /// Names of all hash children in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_hash()
            .into_iter()
            .flat_map(|hash| hash.keys().map(String::as_str))
    }

    /// Whether a hash has a child named `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_hash().is_some_and(|hash| hash.contains_key(key))
    }

    /// All children in order, without their names
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let hash = self.as_hash().into_iter().flat_map(|hash| hash.values());
        let array = self.as_array().into_iter().flatten();
        hash.chain(array)
    }

    /// Named children of a hash in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.as_hash()
            .into_iter()
            .flat_map(|hash| hash.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// Add or replace a hash child.
    ///
    /// A replaced child keeps its position and is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Result<Option<Node>> {
        let found = self.node_type();
        let hash = self.as_hash_mut().ok_or(Error::TypeMismatch {
            expected: NodeType::Hash,
            found,
        })?;

        Ok(hash.insert(key.into(), value.into()))
    }

    /// Append an array child
    pub fn push(&mut self, value: impl Into<Node>) -> Result<()> {
        let found = self.node_type();
        let array = self.as_array_mut().ok_or(Error::TypeMismatch {
            expected: NodeType::Array,
            found,
        })?;

        array.push(value.into());
        Ok(())
    }

    /// Remove a hash child by name, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.as_hash_mut().and_then(|hash| hash.shift_remove(key))
    }

    /// Remove a child by position, keeping the order of the others
    pub fn remove_index(&mut self, index: usize) -> Option<Node> {
        match self {
            Node::Hash(hash) => hash.shift_remove_index(index).map(|(_, value)| value),
            Node::Array(array) if index < array.len() => Some(array.remove(index)),
            _ => None,
        }
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_index(index).unwrap_or(&INVALID)
    }
}

impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&INVALID)
    }
}

fn fmt_child(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::String(value) => write!(f, "\"{value}\""),
        _ => write!(f, "{node}"),
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Invalid => f.write_str("invalid"),
            Node::Int(value) => write!(f, "{value}"),
            Node::Float(value) => write!(f, "{value}"),
            Node::Bool(value) => write!(f, "{value}"),
            Node::String(value) => f.write_str(value),
            Node::Hash(hash) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in hash.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\": ")?;
                    fmt_child(f, value)?;
                }
                f.write_str(" }")
            }
            Node::Array(array) => {
                f.write_str("[ ")?;
                for (i, value) in array.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_child(f, value)?;
                }
                f.write_str(" ]")
            }
        }
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(value)
    }
}

impl From<f32> for Node {
    fn from(value: f32) -> Self {
        Node::Float(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_owned())
    }
}

impl From<Hash> for Node {
    fn from(value: Hash) -> Self {
        Node::Hash(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<T: IntoIterator<Item = (K, Node)>>(iter: T) -> Self {
        Node::Hash(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Node::Array(iter.into_iter().collect())
    }
}

macro_rules! try_from_node {
    ($ty:ty, $variant:ident, |$value:ident| $convert:expr) => {
        impl<'a> TryFrom<&'a Node> for $ty {
            type Error = Error;

            fn try_from(node: &'a Node) -> Result<Self> {
                match node {
                    Node::$variant($value) => Ok($convert),
                    _ => Err(Error::TypeMismatch {
                        expected: NodeType::$variant,
                        found: node.node_type(),
                    }),
                }
            }
        }
    };
}

try_from_node!(i32, Int, |value| *value);
try_from_node!(f32, Float, |value| *value);
try_from_node!(bool, Bool, |value| *value);
try_from_node!(&'a str, String, |value| value.as_str());
try_from_node!(&'a Hash, Hash, |value| value);
try_from_node!(&'a [Node], Array, |value| value.as_slice());
