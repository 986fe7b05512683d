use std::fmt;

use serde::{
    de::{Error, MapAccess, SeqAccess, Unexpected, Visitor},
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Serialize,
};

use crate::node::{Hash, Node};

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Node::Invalid => serializer.serialize_unit(),
            Node::Int(value) => serializer.serialize_i32(*value),
            Node::Float(value) => serializer.serialize_f32(*value),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::String(value) => serializer.serialize_str(value),
            Node::Hash(hash) => {
                let mut map = serializer.serialize_map(Some(hash.len()))?;
                for (k, v) in hash {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Node::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for v in array {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
        }
    }
}

struct NodeVisitor {}

impl NodeVisitor {
    fn new() -> Self {
        NodeVisitor {}
    }
}

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 32 bit number, bool, string, map or list")
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Node::Invalid)
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Node::Invalid)
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(Node::Int)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(Node::Int)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Node::Float(v as f32))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Node::String(v.to_owned()))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Node::String(v))
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut array = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element::<Node>()? {
            array.push(value);
        }

        Ok(Node::Array(array))
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut hash = Hash::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Node>()? {
            if hash.contains_key(&key) {
                return Err(M::Error::custom(format!("duplicate key {key:?}")));
            }
            hash.insert(key, value);
        }

        Ok(Node::Hash(hash))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor::new())
    }
}
