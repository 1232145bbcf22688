//! Farm/field relational container.
//!
//! `FarmDb` is the sole owner of every `Customer`, `Farm`, and `Field`;
//! the parent references inside `Farm`/`Field` are non-owning stable
//! indices into `FarmDb`'s vectors, a weak back-reference into a
//! single owning container.

use crate::error::Result;
use crate::geometry::{boundary_swaths, GeoMultiPath, GeoMultiPolygon};
use crate::units::Length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FarmId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub usize);

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Unknown attributes preserved verbatim for round-trip fidelity.
    pub extra_attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Farm {
    pub id: FarmId,
    pub name: String,
    pub customer: Option<CustomerId>,
    pub extra_attrs: Vec<(String, String)>,
}

/// One part of a field's swath collection: a named group of polylines
/// produced by an inset operation.
#[derive(Debug, Clone)]
pub struct SwathGroup {
    pub name: String,
    pub paths: GeoMultiPath,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub farm: Option<FarmId>,
    pub customer: Option<CustomerId>,
    pub area: Option<i64>,
    pub boundary: GeoMultiPolygon,
    pub swaths: Vec<SwathGroup>,
    pub extra_attrs: Vec<(String, String)>,
}

/// Owning container for every customer, farm, and field in a dataset.
/// Mutated only by a codec on load and by [`FarmDb::inset`] afterward.
#[derive(Debug, Clone, Default)]
pub struct FarmDb {
    pub customers: Vec<Customer>,
    pub farms: Vec<Farm>,
    pub fields: Vec<Field>,
}

impl FarmDb {
    pub fn new() -> Self {
        FarmDb::default()
    }

    pub fn add_customer(&mut self, name: impl Into<String>) -> CustomerId {
        let id = CustomerId(self.customers.len());
        self.customers.push(Customer {
            id,
            name: name.into(),
            extra_attrs: vec![],
        });
        id
    }

    pub fn add_farm(
        &mut self,
        name: impl Into<String>,
        customer: Option<CustomerId>,
    ) -> FarmId {
        let id = FarmId(self.farms.len());
        self.farms.push(Farm {
            id,
            name: name.into(),
            customer,
            extra_attrs: vec![],
        });
        id
    }

    pub fn find_customer_by_name(&self, name: &str) -> Option<CustomerId> {
        self.customers.iter().find(|c| c.name == name).map(|c| c.id)
    }

    pub fn find_farm_by_name(&self, customer: CustomerId, name: &str) -> Option<FarmId> {
        self.farms
            .iter()
            .find(|f| f.customer == Some(customer) && f.name == name)
            .map(|f| f.id)
    }

    pub fn find_field_by_name(&self, farm: FarmId, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .find(|f| f.farm == Some(farm) && f.name == name)
            .map(|f| f.id)
    }

    /// Assigns `field` the next sequential [`FieldId`] and takes
    /// ownership of it, the same pattern [`add_customer`]/[`add_farm`]
    /// use for their own ids.
    ///
    /// [`add_customer`]: FarmDb::add_customer
    /// [`add_farm`]: FarmDb::add_farm
    pub fn add_field(&mut self, mut field: Field) -> FieldId {
        let id = FieldId(self.fields.len());
        field.id = id;
        self.fields.push(field);
        id
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.0]
    }

    /// Replaces every field's swath collection with a fresh inset at
    /// `distance`: part `f=1` keeps `name` bare, later
    /// parts get `"{name} F{f}"`; a part whose buffer splits into
    /// several polygons suffixes each with `_<n>`; hole swaths are
    /// named `"{part name} I{i}"` with `i` increasing across the whole
    /// field, not restarting per part.
    pub fn inset(&mut self, name: &str, distance: Length, tolerance: Length) -> Result<()> {
        for field in &mut self.fields {
            let mut groups = vec![];
            let mut hole_index = 1usize;

            for (part_idx, part) in field.boundary.polygons.iter().enumerate() {
                let f = part_idx + 1;
                let base_name = if f == 1 {
                    name.to_string()
                } else {
                    format!("{name} F{f}")
                };

                let polygon_swaths = boundary_swaths(part, distance, tolerance)?;

                let multi = polygon_swaths.len() > 1;
                for (n, ps) in polygon_swaths.into_iter().enumerate() {
                    let part_name = if multi {
                        format!("{base_name}_{}", n + 1)
                    } else {
                        base_name.clone()
                    };

                    groups.push(SwathGroup {
                        name: part_name.clone(),
                        paths: ps.outer,
                    });
                    for hole in ps.holes {
                        groups.push(SwathGroup {
                            name: format!("{name} I{hole_index}"),
                            paths: hole,
                        });
                        hole_index += 1;
                    }
                }
            }

            field.swaths = groups;
        }
        Ok(())
    }
}
