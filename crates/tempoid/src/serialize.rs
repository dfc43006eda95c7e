use crate::{TbslId, Ulid, Uuid};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::borrow::Cow;

/// (De)serializes a [`Duration`] as whole milliseconds.
///
/// [`Duration`]: core::time::Duration
pub(crate) mod duration_millis {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(crate::time::as_millis(*d))
    }

    pub(crate) fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Identifiers whose canonical form is a string serialize as that string and
/// deserialize through [`FromStr`], so malformed input is rejected.
///
/// [`FromStr`]: core::str::FromStr
macro_rules! serde_as_string {
    ($($ty:ty),* $(,)?) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = Cow::<'de, str>::deserialize(d)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    )*};
}

serde_as_string!(Ulid, Uuid, TbslId);
