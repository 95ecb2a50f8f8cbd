//! Repository for published entities.

use diesel::{dsl::max, prelude::*};

use super::SortDirection;
use crate::{
    models::{Entity, EntityId, NewEntity},
    schema::entities,
};

/// Repository for entity operations.
pub struct EntityRepository;

impl EntityRepository {
    /// Lists the identity of every entity sharing the base identity
    /// `(owner, name)`, regardless of series and revision.
    ///
    /// Returns an empty list, not an error, when nothing matches.
    pub fn expand_url(
        conn: &mut SqliteConnection,
        owner: &str,
        name: &str,
    ) -> QueryResult<Vec<EntityId>> {
        entities::table
            .filter(entities::owner.eq(owner))
            .filter(entities::name.eq(name))
            .order((entities::series.asc(), entities::revision.asc()))
            .select(EntityId::as_select())
            .load(conn)
    }

    /// Finds the entity with exactly this identity.
    pub fn find(
        conn: &mut SqliteConnection,
        owner: &str,
        name: &str,
        series: &str,
        revision: i32,
    ) -> QueryResult<Option<Entity>> {
        entities::table
            .filter(entities::owner.eq(owner))
            .filter(entities::name.eq(name))
            .filter(entities::series.eq(series))
            .filter(entities::revision.eq(revision))
            .select(Entity::as_select())
            .first(conn)
            .optional()
    }

    /// Finds an entity by its row ID.
    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Entity>> {
        entities::table
            .filter(entities::id.eq(id))
            .select(Entity::as_select())
            .first(conn)
            .optional()
    }

    /// Highest revision published under the base identity, across all series.
    pub fn max_revision(
        conn: &mut SqliteConnection,
        owner: &str,
        name: &str,
    ) -> QueryResult<Option<i32>> {
        entities::table
            .filter(entities::owner.eq(owner))
            .filter(entities::name.eq(name))
            .select(max(entities::revision))
            .first(conn)
    }

    /// Lists entities with optional filters, newest uploads first by default.
    pub fn list_filtered(
        conn: &mut SqliteConnection,
        name: Option<&str>,
        owner: Option<&str>,
        series: Option<&str>,
        limit: Option<i64>,
        sort_by_id: Option<SortDirection>,
    ) -> QueryResult<Vec<Entity>> {
        let mut query = entities::table.into_boxed();

        if let Some(name) = name {
            query = query.filter(entities::name.eq(name));
        }
        if let Some(owner) = owner {
            query = query.filter(entities::owner.eq(owner));
        }
        if let Some(series) = series {
            query = query.filter(entities::series.eq(series));
        }

        query = match sort_by_id.unwrap_or(SortDirection::Desc) {
            SortDirection::Asc => query.order(entities::id.asc()),
            SortDirection::Desc => query.order(entities::id.desc()),
        };

        if let Some(lim) = limit {
            query = query.limit(lim);
        }

        query.select(Entity::as_select()).load(conn)
    }

    /// Counts stored entities.
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        entities::table.count().get_result(conn)
    }

    /// Inserts a new entity and returns the inserted ID.
    pub fn insert(conn: &mut SqliteConnection, entity: &NewEntity) -> QueryResult<i32> {
        diesel::insert_into(entities::table)
            .values(entity)
            .returning(entities::id)
            .get_result(conn)
    }

    /// Bumps the archive download counter and returns the new count.
    pub fn increment_downloads(conn: &mut SqliteConnection, id: i32) -> QueryResult<i64> {
        diesel::update(entities::table.filter(entities::id.eq(id)))
            .set(entities::downloads.eq(entities::downloads + 1))
            .returning(entities::downloads)
            .get_result(conn)
    }
}
