use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::material::{
        Material as DomainMaterial, MaterialListQuery, NewMaterial as DomainNewMaterial,
        UpdateMaterial as DomainUpdateMaterial,
    },
    models::material::{
        Material as DbMaterial, NewMaterial as DbNewMaterial, UpdateMaterial as DbUpdateMaterial,
    },
    repository::{DieselRepository, MaterialReader, MaterialWriter, page_bounds},
    schema::materials,
};

fn filtered_materials(query: &MaterialListQuery) -> materials::BoxedQuery<'static, Sqlite> {
    let mut items = materials::table
        .filter(materials::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            materials::name
                .like(pattern.clone())
                .or(materials::supplier.like(pattern).assume_not_null()),
        );
    }

    items
}

impl MaterialReader for DieselRepository {
    fn get_material_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainMaterial>> {
        let mut conn = self.conn()?;
        let material = materials::table
            .filter(materials::id.eq(id))
            .filter(materials::hub_id.eq(hub_id))
            .first::<DbMaterial>(&mut conn)
            .optional()?;

        Ok(material.map(Into::into))
    }

    fn list_materials(
        &self,
        query: MaterialListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainMaterial>)> {
        let mut conn = self.conn()?;

        let total = filtered_materials(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_materials(&query).order((materials::name.asc(), materials::id.asc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_materials = items.load::<DbMaterial>(&mut conn)?;

        Ok((total, db_materials.into_iter().map(Into::into).collect()))
    }
}

impl MaterialWriter for DieselRepository {
    fn create_material(
        &self,
        new_material: &DomainNewMaterial,
    ) -> RepositoryResult<DomainMaterial> {
        let mut conn = self.conn()?;
        let db_new = DbNewMaterial::from(new_material);

        let created = diesel::insert_into(materials::table)
            .values(&db_new)
            .get_result::<DbMaterial>(&mut conn)?;

        Ok(created.into())
    }

    fn update_material(
        &self,
        material_id: i32,
        hub_id: i32,
        updates: &DomainUpdateMaterial,
    ) -> RepositoryResult<DomainMaterial> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateMaterial::from(updates);

        let target = materials::table
            .filter(materials::id.eq(material_id))
            .filter(materials::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbMaterial>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_material(&self, material_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = materials::table
            .filter(materials::id.eq(material_id))
            .filter(materials::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
