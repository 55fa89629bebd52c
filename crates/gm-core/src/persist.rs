//! Persisted store format.
//!
//! ```json
//! {"db": {"POINT_0": {"x": 1.0, "y": 2.0},
//!         "PATH_0": {"parts": [{"point": "POINT_0"}], "pathType": {...}}}}
//! ```
//!
//! The ID prefix is the only type tag: entity bodies carry no kind field, and
//! each body is decoded as the kind its key names.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::ser::{Serialize, Serializer};

use crate::{GeoObject, MapResult, ObjectId, ObjectKind, ObjectStore};

impl Serialize for GeoObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GeoObject::Point(v)           => v.serialize(serializer),
            GeoObject::Path(v)            => v.serialize(serializer),
            GeoObject::Area(v)            => v.serialize(serializer),
            GeoObject::ComplexAreaPart(v) => v.serialize(serializer),
            GeoObject::ComplexArea(v)     => v.serialize(serializer),
            GeoObject::Tile(v)            => v.serialize(serializer),
        }
    }
}

#[derive(serde::Serialize)]
struct DocumentRef<'a> {
    db: BTreeMap<ObjectId, &'a GeoObject>,
}

#[derive(serde::Deserialize)]
struct Document {
    db: serde_json::Map<String, serde_json::Value>,
}

impl ObjectStore {
    fn document(&self) -> DocumentRef<'_> {
        DocumentRef { db: self.iter().collect() }
    }

    /// Serialise to the `{"db": {...}}` document, keys in ID order.
    pub fn to_json(&self) -> MapResult<String> {
        Ok(serde_json::to_string(&self.document())?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> MapResult<()> {
        serde_json::to_writer(writer, &self.document())?;
        Ok(())
    }

    /// Rebuild a store from its persisted document.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidId`](crate::MapError::InvalidId) for a key without
    /// a known prefix, [`MapError::Json`](crate::MapError::Json) for a body
    /// whose shape does not match its key's kind.
    pub fn from_json(s: &str) -> MapResult<ObjectStore> {
        Self::from_document(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> MapResult<ObjectStore> {
        Self::from_document(serde_json::from_reader(reader)?)
    }

    fn from_document(doc: Document) -> MapResult<ObjectStore> {
        let mut store = ObjectStore::new();
        for (key, body) in doc.db {
            let id: ObjectId = key.parse()?;
            let object = match id.kind() {
                ObjectKind::Point           => GeoObject::Point(serde_json::from_value(body)?),
                ObjectKind::Path            => GeoObject::Path(serde_json::from_value(body)?),
                ObjectKind::Area            => GeoObject::Area(serde_json::from_value(body)?),
                ObjectKind::ComplexAreaPart => {
                    GeoObject::ComplexAreaPart(serde_json::from_value(body)?)
                }
                ObjectKind::ComplexArea     => GeoObject::ComplexArea(serde_json::from_value(body)?),
                ObjectKind::Tile            => GeoObject::Tile(serde_json::from_value(body)?),
            };
            store.insert(id, object)?;
        }
        Ok(store)
    }
}
