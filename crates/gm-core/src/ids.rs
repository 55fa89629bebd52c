//! Strongly typed object identifiers and the kind-tagged [`ObjectId`].
//!
//! Every stored object is addressed by an [`ObjectId`]: an enum whose variant
//! is the object kind and whose payload is a per-kind sequence number.  The
//! textual form is `<PREFIX>_<seq>` (e.g. `POINT_17`, `COMPLEX-AREA-PART_3`),
//! which is also the key used in the persisted `{"db": {...}}` document.
//!
//! The kind lives in the variant, so recovering the type of an untyped entry
//! is a `match`, never a string-prefix scan.

use std::fmt;
use std::str::FromStr;

use crate::MapError;

// ── ObjectKind ────────────────────────────────────────────────────────────────

/// The six kinds of object a store can hold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ObjectKind {
    Point,
    Path,
    Area,
    ComplexAreaPart,
    ComplexArea,
    Tile,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Point,
        ObjectKind::Path,
        ObjectKind::Area,
        ObjectKind::ComplexAreaPart,
        ObjectKind::ComplexArea,
        ObjectKind::Tile,
    ];

    /// The ID prefix for this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            ObjectKind::Point           => "POINT",
            ObjectKind::Path            => "PATH",
            ObjectKind::Area            => "AREA",
            ObjectKind::ComplexAreaPart => "COMPLEX-AREA-PART",
            ObjectKind::ComplexArea     => "COMPLEX-AREA",
            ObjectKind::Tile            => "TILE",
        }
    }

    /// Slot of this kind in per-kind tables (sequence counters).
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }

    fn from_prefix(prefix: &str) -> Option<ObjectKind> {
        ObjectKind::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// ── Typed IDs ─────────────────────────────────────────────────────────────────

/// Generate a typed ID wrapper around a per-kind `u32` sequence number.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $kind:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub u32);

        impl $name {
            pub const KIND: ObjectKind = ObjectKind::$kind;

            /// Cast the sequence number to `usize`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", Self::KIND.prefix(), self.0)
            }
        }

        impl FromStr for $name {
            type Err = MapError;
            fn from_str(s: &str) -> Result<$name, MapError> {
                match s.parse::<ObjectId>()? {
                    ObjectId::$kind(id) => Ok(id),
                    other => Err(MapError::KindMismatch { id: other, expected: Self::KIND }),
                }
            }
        }

        impl From<$name> for ObjectId {
            #[inline(always)]
            fn from(id: $name) -> ObjectId {
                ObjectId::$kind(id)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<$name, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

typed_id! {
    /// Identifier of a [`Point`](crate::Point).
    pub struct PointId => Point;
}

typed_id! {
    /// Identifier of a [`Path`](crate::Path).
    pub struct PathId => Path;
}

typed_id! {
    /// Identifier of a plain [`Area`](crate::Area).
    pub struct AreaId => Area;
}

typed_id! {
    /// Identifier of a [`ComplexAreaPart`](crate::ComplexAreaPart).
    pub struct ComplexAreaPartId => ComplexAreaPart;
}

typed_id! {
    /// Identifier of a [`ComplexArea`](crate::ComplexArea).
    pub struct ComplexAreaId => ComplexArea;
}

typed_id! {
    /// Identifier of a [`Tile`](crate::Tile) catalog entry.
    pub struct TileId => Tile;
}

// ── ObjectId ──────────────────────────────────────────────────────────────────

/// Kind-tagged identifier of any stored object.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ObjectId {
    Point(PointId),
    Path(PathId),
    Area(AreaId),
    ComplexAreaPart(ComplexAreaPartId),
    ComplexArea(ComplexAreaId),
    Tile(TileId),
}

impl ObjectId {
    /// Build an ID from its kind and sequence number.
    pub fn new(kind: ObjectKind, seq: u32) -> ObjectId {
        match kind {
            ObjectKind::Point           => ObjectId::Point(PointId(seq)),
            ObjectKind::Path            => ObjectId::Path(PathId(seq)),
            ObjectKind::Area            => ObjectId::Area(AreaId(seq)),
            ObjectKind::ComplexAreaPart => ObjectId::ComplexAreaPart(ComplexAreaPartId(seq)),
            ObjectKind::ComplexArea     => ObjectId::ComplexArea(ComplexAreaId(seq)),
            ObjectKind::Tile            => ObjectId::Tile(TileId(seq)),
        }
    }

    pub fn kind(self) -> ObjectKind {
        match self {
            ObjectId::Point(_)           => ObjectKind::Point,
            ObjectId::Path(_)            => ObjectKind::Path,
            ObjectId::Area(_)            => ObjectKind::Area,
            ObjectId::ComplexAreaPart(_) => ObjectKind::ComplexAreaPart,
            ObjectId::ComplexArea(_)     => ObjectKind::ComplexArea,
            ObjectId::Tile(_)            => ObjectKind::Tile,
        }
    }

    /// Per-kind sequence number.
    pub fn seq(self) -> u32 {
        match self {
            ObjectId::Point(id)           => id.0,
            ObjectId::Path(id)            => id.0,
            ObjectId::Area(id)            => id.0,
            ObjectId::ComplexAreaPart(id) => id.0,
            ObjectId::ComplexArea(id)     => id.0,
            ObjectId::Tile(id)            => id.0,
        }
    }

    pub fn as_point(self) -> Option<PointId> {
        match self {
            ObjectId::Point(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_path(self) -> Option<PathId> {
        match self {
            ObjectId::Path(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind().prefix(), self.seq())
    }
}

impl FromStr for ObjectId {
    type Err = MapError;

    /// Parse `<PREFIX>_<seq>`.  The prefix may itself contain `-` but never
    /// `_`, so the split happens at the last underscore.
    fn from_str(s: &str) -> Result<ObjectId, MapError> {
        let invalid = || MapError::InvalidId(s.to_string());
        let (prefix, seq) = s.rsplit_once('_').ok_or_else(invalid)?;
        let kind = ObjectKind::from_prefix(prefix).ok_or_else(invalid)?;
        let seq = seq.parse::<u32>().map_err(|_| invalid())?;
        Ok(ObjectId::new(kind, seq))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
