
use std::collections::HashMap;
use std::fmt;
use serde::{Serialize, Deserialize, Serializer, Deserializer, ser::SerializeMap, de::{self, Visitor, MapAccess}};


/// Token to index assignment, built in first-seen order.
///
/// Indices are handed out by `get_or_insert` only, so they always form the
/// contiguous range `0..len()` and are never reassigned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocab {
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
}

impl Vocab {

    pub fn new() -> Vocab {
        Self::default()
    }

    /// Returns the index of `token`, giving it the next free index if unseen.
    pub fn get_or_insert(&mut self, token: &str) -> usize {

        if let Some(i) = self.t2i.get(token) {
            return *i
        }
        let i = self.i2t.len();
        self.t2i.insert(token.to_owned(), i);
        self.i2t.push(token.to_owned());
        i
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.t2i.get(token).copied()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.i2t.get(index).map(|t| t.as_str())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.t2i.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    /// (token, index) pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.i2t.iter().enumerate().map(|(i, t)| (t.as_str(), i))
    }

    /// index -> token lookup table
    pub fn inverse(&self) -> Vec<String> {
        self.i2t.clone()
    }

    pub fn to_hashmap(&self) -> HashMap<String, usize> {
        self.t2i.clone()
    }

    pub fn into_hashmap(self) -> HashMap<String, usize> {
        self.t2i
    }
}


// a vocabulary is saved as a plain {token: index} object, written in index order
impl Serialize for Vocab {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {

            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (token, index) in self.iter() {
                map.serialize_entry(token, &index)?;
            }
            map.end()
    }
}

struct VocabVisitor;
impl<'de> Visitor<'de> for VocabVisitor {

    type Value = Vocab;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of tokens to contiguous indices")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>, {

                let mut pairs: Vec<(String, usize)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((token, index)) = access.next_entry::<String, usize>()? {
                    pairs.push((token, index));
                }

                // the saved order is not trusted, indices are
                pairs.sort_by_key(|p| p.1);
                let mut vocab = Vocab::new();
                for (expected, (token, index)) in pairs.into_iter().enumerate() {
                    if index != expected {
                        return Err(de::Error::custom(format!("vocabulary index {} is missing or duplicated", expected)));
                    }
                    if vocab.get_or_insert(&token) != index {
                        return Err(de::Error::custom(format!("token {:?} appears twice", token)));
                    }
                }
                Ok(vocab)
    }
}

impl<'de> Deserialize<'de> for Vocab {

    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de> {
            deserializer.deserialize_map(VocabVisitor)
    }
}
