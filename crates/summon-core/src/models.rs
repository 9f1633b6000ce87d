use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Lowest rarity tier the catalog may assign.
pub const MIN_RARITY: u8 = 2;

/// Top rarity tier; a hit resets the pity counter.
pub const SIX_STAR: u8 = 6;

/// Every rarity tier in ascending order.
pub const RARITIES: [u8; 5] = [2, 3, 4, 5, 6];

/// `summonType` value of a ten-item bulk pull.
pub const BULK_SUMMON_TYPE: i64 = 10;

/// Number of items a bulk pull must carry to be expanded.
pub const BULK_SIZE: usize = 10;

/// An identifier that may appear as a JSON number or string.
///
/// Re-serializes in the form it was read so exports round-trip the import.
/// Numbers outside the `i64` range or with a fractional part are kept as
/// [`Ident::Decimal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
    Number(i64),
    Decimal(serde_json::Number),
    Text(String),
}

impl Ident {
    /// `true` for an empty string identifier.
    pub fn is_empty(&self) -> bool {
        matches!(self, Ident::Text(s) if s.is_empty())
    }

    /// Identifier for an arbitrary JSON value. `null` is the empty id; other
    /// non-scalar values keep their compact JSON text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Ident::Number)
                .unwrap_or_else(|| Ident::Decimal(n.clone())),
            Value::String(s) => Ident::Text(s.clone()),
            Value::Null => Ident::default(),
            other => Ident::Text(other.to_string()),
        }
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Ident::Number(n) => {
                0u8.hash(state);
                n.hash(state);
            }
            Ident::Decimal(n) => {
                1u8.hash(state);
                n.to_string().hash(state);
            }
            Ident::Text(s) => {
                2u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl Default for Ident {
    fn default() -> Self {
        Ident::Text(String::new())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Number(n) => write!(f, "{}", n),
            Ident::Decimal(n) => write!(f, "{}", n),
            Ident::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::Text(s.to_string())
    }
}

impl From<i64> for Ident {
    fn from(n: i64) -> Self {
        Ident::Number(n)
    }
}

/// One draw event as imported or stored.
///
/// Decoding never fails on a field's type: missing or `null` fields become
/// empty defaults and mistyped ones are coerced (see [`lenient`]). Fields this
/// type does not model are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRecord {
    /// Draw timestamp, e.g. `"2024-01-15 08:30:00"`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub create_time: String,
    /// Banner identifier.
    #[serde(default, deserialize_with = "lenient::ident")]
    pub pool_id: Ident,
    /// Banner display name as exported by the game.
    #[serde(default, deserialize_with = "lenient::string")]
    pub pool_name: String,
    /// `10` for a bulk pull, anything else for a single pull.
    #[serde(default, deserialize_with = "lenient::summon_type")]
    pub summon_type: i64,
    /// Items obtained, in draw order.
    #[serde(default, deserialize_with = "lenient::idents")]
    pub gain_ids: Vec<Ident>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PullRecord {
    /// The item this draw is attributed to: the first element of `gain_ids`.
    pub fn item(&self) -> Option<&Ident> {
        self.gain_ids.first()
    }

    /// Calendar month key (`"YYYY-MM"`): the first seven characters of
    /// `create_time`, or all of it when shorter.
    pub fn month_key(&self) -> &str {
        match self.create_time.char_indices().nth(7) {
            Some((idx, _)) => &self.create_time[..idx],
            None => &self.create_time,
        }
    }
}

/// Field decoders for [`PullRecord`] that accept whatever JSON the game or an
/// older database put there.
pub mod lenient {
    use super::*;

    /// Strings as-is, `null` as empty, any other scalar as its JSON text.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn ident<'de, D: Deserializer<'de>>(d: D) -> Result<Ident, D::Error> {
        Ok(Ident::from_value(&Value::deserialize(d)?))
    }

    /// An array of ids; anything that is not an array yields no items.
    pub fn idents<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Ident>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.iter().map(Ident::from_value).collect(),
            _ => Vec::new(),
        })
    }

    /// Integer value of a `summonType` given as a number, numeric string or
    /// boolean. Anything else, including non-integral numbers, is `0`.
    pub fn summon_type<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(summon_type_of(&Value::deserialize(d)?))
    }

    pub(crate) fn summon_type_of(value: &Value) -> i64 {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
        .unwrap_or(0)
    }

    fn integral(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    }
}

/// A single-pull record produced by [`crate::normalizer::normalize`].
///
/// `summon_type` is always `1`. Regular inputs yield exactly one element in
/// `gain_ids`; irregular inputs are passed through with their items intact.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord(PullRecord);

impl NormalizedRecord {
    pub(crate) fn from_raw(mut record: PullRecord) -> Self {
        record.summon_type = 1;
        Self(record)
    }

    /// Borrow the underlying record.
    pub fn record(&self) -> &PullRecord {
        &self.0
    }

    pub fn into_inner(self) -> PullRecord {
        self.0
    }
}

impl Deref for NormalizedRecord {
    type Target = PullRecord;

    fn deref(&self) -> &PullRecord {
        &self.0
    }
}

/// Display name and rarity tier of one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub name: String,
    pub rarity: u8,
}

impl CharacterInfo {
    pub fn is_six_star(&self) -> bool {
        self.rarity == SIX_STAR
    }
}
