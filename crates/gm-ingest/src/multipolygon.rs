//! Multipolygon relations: membership index and final assembly.
//!
//! A relation qualifies when it is tagged `type=multipolygon` and has at
//! least one `outer` way member and at least one `inner` way member.  The
//! first `outer` way is the ring the [`ComplexArea`] is anchored on; any
//! further outer ways still become `outer` parts.
//!
//! A way may be claimed by several relations, and not always in the same
//! role: a lake's shoreline is often the inner ring of a surrounding wood and
//! the outer ring of the lake itself.  Such a way yields one part per role it
//! holds, so every relation gets a part of the role it asked for.
//!
//! Assembly happens after every way has been committed.  A relation whose
//! anchor way produced no part is reported and skipped, never stored half
//! built.

use std::collections::HashMap;

use log::{debug, warn};

use gm_core::{ComplexArea, ComplexAreaPartId, MapResult, ObjectStore, PartRole, Tags};

use crate::osm::OsmRelation;

/// One qualifying multipolygon relation.
#[derive(Clone, Debug, PartialEq)]
pub struct Multipolygon {
    pub relation: i64,
    /// Outer way IDs in member order; the first is the anchor.
    pub outer:    Vec<i64>,
    pub inner:    Vec<i64>,
    pub tags:     Tags,
}

/// The relations claiming one way, as indices into `relations`.
#[derive(Clone, Copy, Debug)]
struct Claim {
    /// Role of the first claim; decides the way's classification.
    first: PartRole,
    /// First relation using the way as an outer ring.
    outer: Option<usize>,
    /// First relation using the way as an inner ring.
    inner: Option<usize>,
}

impl Claim {
    fn new(role: PartRole, slot: usize) -> Claim {
        let mut claim = Claim { first: role, outer: None, inner: None };
        claim.add(role, slot);
        claim
    }

    fn add(&mut self, role: PartRole, slot: usize) {
        let entry = match role {
            PartRole::Outer => &mut self.outer,
            PartRole::Inner => &mut self.inner,
        };
        entry.get_or_insert(slot);
    }

    fn slot(&self, role: PartRole) -> Option<usize> {
        match role {
            PartRole::Outer => self.outer,
            PartRole::Inner => self.inner,
        }
    }
}

/// Way ID → role lookup over every qualifying relation.
#[derive(Debug, Default)]
pub struct MultipolygonIndex {
    relations: Vec<Multipolygon>,
    members:   HashMap<i64, Claim>,
}

impl MultipolygonIndex {
    pub fn build<'a>(relations: impl IntoIterator<Item = &'a OsmRelation>) -> Self {
        let mut index = MultipolygonIndex::default();
        for relation in relations {
            if relation.tags.get("type").map(String::as_str) != Some("multipolygon") {
                continue;
            }
            let outer: Vec<i64> = relation.ways_with_role("outer").collect();
            let inner: Vec<i64> = relation.ways_with_role("inner").collect();
            if outer.is_empty() || inner.is_empty() {
                continue;
            }

            let slot = index.relations.len();
            let claims = outer
                .iter()
                .map(|&way| (way, PartRole::Outer))
                .chain(inner.iter().map(|&way| (way, PartRole::Inner)));
            for (way, role) in claims {
                index
                    .members
                    .entry(way)
                    .and_modify(|claim| claim.add(role, slot))
                    .or_insert_with(|| Claim::new(role, slot));
            }
            index.relations.push(Multipolygon {
                relation: relation.id,
                outer,
                inner,
                tags: relation.tags.clone(),
            });
        }
        index
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn relations(&self) -> &[Multipolygon] {
        &self.relations
    }

    /// Role of `way` in the first multipolygon that lists it.
    pub fn role_of(&self, way: i64) -> Option<PartRole> {
        self.members.get(&way).map(|claim| claim.first)
    }

    /// Every role `way` holds, the first claim's role first.
    pub fn roles_of(&self, way: i64) -> Vec<PartRole> {
        let Some(claim) = self.members.get(&way) else {
            return Vec::new();
        };
        let mut roles = vec![claim.first];
        let other = match claim.first {
            PartRole::Outer => PartRole::Inner,
            PartRole::Inner => PartRole::Outer,
        };
        if claim.slot(other).is_some() {
            debug!("way {way} is both an outer and an inner multipolygon ring");
            roles.push(other);
        }
        roles
    }

    /// The multipolygon that decided `way`'s role.
    pub fn owner_of(&self, way: i64) -> Option<&Multipolygon> {
        self.members.get(&way).and_then(|claim| self.owner_in_role(way, claim.first))
    }

    /// The first multipolygon using `way` in `role`.
    pub fn owner_in_role(&self, way: i64, role: PartRole) -> Option<&Multipolygon> {
        let slot = self.members.get(&way)?.slot(role)?;
        self.relations.get(slot)
    }

    /// Add one [`ComplexArea`] per relation whose anchor way produced a part.
    ///
    /// `parts` maps `(source way, role)` to the part built from that way in
    /// that role.  Returns `(assembled, incomplete)`.
    ///
    /// # Errors
    ///
    /// [`MapError::IdsExhausted`](gm_core::MapError::IdsExhausted) if the
    /// store has no ComplexArea IDs left.
    pub fn assemble(
        &self,
        parts: &HashMap<(i64, PartRole), ComplexAreaPartId>,
        store: &mut ObjectStore,
    ) -> MapResult<(usize, usize)> {
        let mut assembled = 0;
        let mut incomplete = 0;
        for mp in &self.relations {
            let anchor = mp.outer[0];
            let Some(&outer) = parts.get(&(anchor, PartRole::Outer)) else {
                warn!(
                    "multipolygon relation {}: outer way {} produced no area, relation skipped",
                    mp.relation, anchor
                );
                incomplete += 1;
                continue;
            };
            let inner = mp
                .inner
                .iter()
                .filter_map(|&way| parts.get(&(way, PartRole::Inner)).copied())
                .collect();
            store.add_complex_area(ComplexArea { outer, inner, tags: mp.tags.clone() })?;
            assembled += 1;
        }
        Ok((assembled, incomplete))
    }
}
