//! The keyed object store.
//!
//! `ObjectStore` maps [`ObjectId`] → [`GeoObject`].  Sequence numbers are
//! assigned per kind on [`add`](ObjectStore::add); objects inserted under an
//! existing ID (copies, deserialisation) push the kind's counter past that ID
//! so later adds never collide.  A counter never wraps: once it reaches
//! `u32::MAX` (for example after loading `POINT_4294967295`), further adds of
//! that kind fail with [`MapError::IdsExhausted`].
//!
//! Iteration order is unspecified.

use rustc_hash::FxHashMap;

use crate::{
    Area, AreaId, ComplexArea, ComplexAreaId, ComplexAreaPart, ComplexAreaPartId, GeoObject,
    MapError, MapResult, ObjectId, ObjectKind, Path, PathId, Point, PointId, Tile, TileId,
};

/// Generate the typed getter, iterator and adder for one object kind.
macro_rules! typed_access {
    ($ty:ident, $id:ident, $get:ident, $iter:ident, $add:ident) => {
        /// Typed lookup; `None` if absent.
        pub fn $get(&self, id: $id) -> Option<&$ty> {
            match self.objects.get(&ObjectId::$ty(id)) {
                Some(GeoObject::$ty(value)) => Some(value),
                _ => None,
            }
        }

        /// All stored objects of this kind, in unspecified order.
        pub fn $iter(&self) -> impl Iterator<Item = ($id, &$ty)> + '_ {
            self.objects.iter().filter_map(|(id, object)| match (id, object) {
                (ObjectId::$ty(id), GeoObject::$ty(value)) => Some((*id, value)),
                _ => None,
            })
        }

        /// Insert under a freshly assigned ID.
        ///
        /// # Errors
        ///
        /// [`MapError::IdsExhausted`] once the kind's sequence space is used up.
        pub fn $add(&mut self, value: $ty) -> MapResult<$id> {
            let id = $id(self.next_seq($id::KIND)?);
            self.objects.insert(ObjectId::$ty(id), GeoObject::$ty(value));
            Ok(id)
        }
    };
}

#[derive(Clone, Debug, Default)]
pub struct ObjectStore {
    objects:  FxHashMap<ObjectId, GeoObject>,
    /// Next unassigned sequence number, indexed by `ObjectKind::slot()`.
    next_seq: [u32; ObjectKind::ALL.len()],
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand out the kind's next sequence number.  `u32::MAX` is never
    /// handed out: the counter cannot advance past it.
    fn next_seq(&mut self, kind: ObjectKind) -> MapResult<u32> {
        let slot = &mut self.next_seq[kind.slot()];
        let seq = *slot;
        *slot = seq.checked_add(1).ok_or(MapError::IdsExhausted(kind))?;
        Ok(seq)
    }

    fn reserve_seq(&mut self, id: ObjectId) {
        let slot = &mut self.next_seq[id.kind().slot()];
        *slot = (*slot).max(id.seq().saturating_add(1));
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Insert `object` under a freshly assigned ID of its kind.
    ///
    /// # Errors
    ///
    /// [`MapError::IdsExhausted`] when no sequence number is left, which
    /// happens after loading an object whose ID is `u32::MAX`.
    pub fn add(&mut self, object: impl Into<GeoObject>) -> MapResult<ObjectId> {
        let object = object.into();
        let id = ObjectId::new(object.kind(), self.next_seq(object.kind())?);
        self.objects.insert(id, object);
        Ok(id)
    }

    /// Insert `object` under an existing `id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// [`MapError::KindMismatch`] if the ID prefix does not match the
    /// object's kind.
    pub fn insert(&mut self, id: ObjectId, object: GeoObject) -> MapResult<Option<GeoObject>> {
        if id.kind() != object.kind() {
            return Err(MapError::KindMismatch { id, expected: object.kind() });
        }
        Ok(self.insert_unchecked(id, object))
    }

    pub(crate) fn insert_point(&mut self, id: PointId, point: Point) {
        self.insert_unchecked(ObjectId::Point(id), GeoObject::Point(point));
    }

    fn insert_unchecked(&mut self, id: ObjectId, object: GeoObject) -> Option<GeoObject> {
        self.reserve_seq(id);
        self.objects.insert(id, object)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: ObjectId) -> Option<&GeoObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Like [`point`](Self::point) but reports a missing point as an error.
    pub fn require_point(&self, id: PointId) -> MapResult<&Point> {
        self.point(id).ok_or(MapError::ObjectNotFound(id.into()))
    }

    typed_access!(Point, PointId, point, points, add_point);
    typed_access!(Path, PathId, path, paths, add_path);
    typed_access!(Area, AreaId, area, areas, add_area);
    typed_access!(
        ComplexAreaPart,
        ComplexAreaPartId,
        complex_area_part,
        complex_area_parts,
        add_complex_area_part
    );
    typed_access!(ComplexArea, ComplexAreaId, complex_area, complex_areas, add_complex_area);
    typed_access!(Tile, TileId, tile, tiles, add_tile);

    // ── Collections ───────────────────────────────────────────────────────

    /// Every stored ID.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GeoObject)> + '_ {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Objects whose kind is any of `kinds`.
    pub fn by_kind<'a>(
        &'a self,
        kinds: &'a [ObjectKind],
    ) -> impl Iterator<Item = (ObjectId, &'a GeoObject)> + 'a {
        self.iter().filter(move |(id, _)| kinds.contains(&id.kind()))
    }

    /// Copy every entry of `other` into `self`.  Entries sharing an ID are
    /// overwritten by `other`'s, so nothing is dropped or duplicated.
    pub fn merge(&mut self, other: &ObjectStore) {
        self.objects.reserve(other.len());
        for (id, object) in other.iter() {
            self.insert_unchecked(id, object.clone());
        }
    }

    /// A new store holding copies of the listed objects that exist here.
    pub fn subset(&self, ids: impl IntoIterator<Item = ObjectId>) -> ObjectStore {
        let mut out = ObjectStore::new();
        for id in ids {
            if let Some(object) = self.get(id) {
                out.insert_unchecked(id, object.clone());
            }
        }
        out
    }
}

impl PartialEq for ObjectStore {
    /// Stores are equal when they hold the same objects under the same IDs;
    /// sequence counters are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
    }
}
