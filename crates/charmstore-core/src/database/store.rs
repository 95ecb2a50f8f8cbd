//! The catalog store: candidate expansion, entity lookup and publishing over
//! the SQLite catalog.

use std::path::Path;

use charmstore_db::{
    models::{NewBaseEntity, NewEntity},
    repository::{base_entity::BaseEntityRepository, entity::EntityRepository},
};
use charmstore_utils::hash::ArchiveDigest;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{
    connection::DieselDatabase,
    models::{BaseEntity, Entity},
};
use crate::{error::CatalogError, reference::Reference, resolve::CandidateProvider, CatalogResult};

/// Exact lookup of stored entities.
pub trait EntityLookup {
    /// Fetches the entity a fully-qualified reference names.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::NotFound`] if no such entity is stored.
    /// * [`CatalogError::InvalidReference`] if `reference` lacks a series or revision.
    fn find_entity(&self, reference: &Reference) -> CatalogResult<Entity>;
}

/// Filters for [`CatalogStore::list`].
#[derive(Debug, Default, Clone)]
pub struct ListFilter<'a> {
    pub name: Option<&'a str>,
    pub user: Option<&'a str>,
    pub series: Option<&'a str>,
    pub limit: Option<usize>,
}

#[derive(Clone)]
pub struct CatalogStore {
    db: DieselDatabase,
}

impl CatalogStore {
    pub fn new(db: DieselDatabase) -> Self {
        Self { db }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        Ok(Self::new(DieselDatabase::open(path)?))
    }

    pub fn open_in_memory() -> CatalogResult<Self> {
        Ok(Self::new(DieselDatabase::open_in_memory()?))
    }

    /// Fetches the base entity (and its read ACL) for `reference`.
    pub fn base_entity(&self, reference: &Reference) -> CatalogResult<BaseEntity> {
        let base = reference.base();
        self.db
            .with_conn(|conn| BaseEntityRepository::find(conn, base.owner(), &base.name))?
            .map(BaseEntity::from)
            .ok_or_else(|| {
                CatalogError::not_found(
                    reference.to_string(),
                    format!("no entities found for {:?}", base.to_string()),
                )
            })
    }

    /// Stores a new revision of `reference`.
    ///
    /// The reference must name a series. Without a revision, the next one
    /// after the highest published for the base identity in any series is
    /// used, starting at 0. The base entity is created with `default_acl` the
    /// first time anything is published under it.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::InvalidReference`] if the series is missing.
    /// * [`CatalogError::AlreadyExists`] if the explicit revision is taken.
    pub fn publish(
        &self,
        reference: &Reference,
        digest: &ArchiveDigest,
        extra_info: Map<String, Value>,
        default_acl: &[String],
    ) -> CatalogResult<Entity> {
        let series = reference.series.as_deref().ok_or_else(|| {
            CatalogError::invalid_reference(reference.to_string(), "a series is required to publish")
        })?;
        let owner = reference.owner();
        let name = reference.name.as_str();
        let now = chrono::Utc::now().to_rfc3339();
        let blob_size = i64::try_from(digest.size).map_err(|_| {
            CatalogError::invalid_argument("archive", format!("{} bytes is too large", digest.size))
        })?;

        let entity = self.db.transaction(|conn| {
            let base_id = match BaseEntityRepository::find(conn, owner, name)? {
                Some(base) => base.id,
                None => {
                    debug!(owner = owner, name = name, "creating base entity");
                    BaseEntityRepository::insert(
                        conn,
                        &NewBaseEntity {
                            owner,
                            name,
                            read_acl: serde_json::to_value(default_acl)?,
                            created_at: &now,
                        },
                    )?
                }
            };

            let revision = match reference.revision {
                Some(revision) => {
                    let revision = i32::try_from(revision).map_err(|_| {
                        CatalogError::invalid_reference(
                            reference.to_string(),
                            "revision out of range",
                        )
                    })?;
                    if EntityRepository::find(conn, owner, name, series, revision)?.is_some() {
                        return Err(CatalogError::AlreadyExists(reference.to_string()));
                    }
                    revision
                }
                None => {
                    match EntityRepository::max_revision(conn, owner, name)? {
                        None => 0,
                        Some(max) => {
                            max.checked_add(1).ok_or_else(|| {
                                CatalogError::invalid_reference(
                                    reference.to_string(),
                                    "revision out of range",
                                )
                            })?
                        }
                    }
                }
            };

            let id = EntityRepository::insert(
                conn,
                &NewEntity {
                    base_id,
                    owner,
                    name,
                    series,
                    revision,
                    blob_hash: &digest.sum,
                    blob_size,
                    upload_time: &now,
                    extra_info: (!extra_info.is_empty()).then(|| Value::Object(extra_info)),
                },
            )?;

            EntityRepository::find_by_id(conn, id)?.ok_or_else(|| {
                CatalogError::Database(format!("entity {id} vanished after insert"))
            })
        })?;

        let entity = Entity::from(entity);
        info!(reference = %entity.reference, size = entity.blob_size, "published entity");
        Ok(entity)
    }

    /// Replaces the read ACL shared by every revision of `reference`.
    pub fn set_read_acl(&self, reference: &Reference, acl: &[String]) -> CatalogResult<()> {
        let base = self.base_entity(reference)?;
        let acl = serde_json::to_value(acl)?;
        self.db
            .with_conn(|conn| BaseEntityRepository::set_read_acl(conn, base.id as i32, acl))?;
        debug!(reference = %base.reference, "updated read ACL");
        Ok(())
    }

    /// Bumps the archive download counter, returning the new count.
    pub fn increment_downloads(&self, entity: &Entity) -> CatalogResult<u64> {
        let count = self
            .db
            .with_conn(|conn| EntityRepository::increment_downloads(conn, entity.id as i32))?;
        Ok(count as u64)
    }

    /// Lists stored entities, most recently published first.
    pub fn list(&self, filter: &ListFilter) -> CatalogResult<Vec<Entity>> {
        let rows = self.db.with_conn(|conn| {
            EntityRepository::list_filtered(
                conn,
                filter.name,
                filter.user,
                filter.series,
                filter.limit.map(|limit| limit as i64),
                None,
            )
        })?;
        Ok(rows.into_iter().map(Entity::from).collect())
    }

    pub fn count(&self) -> CatalogResult<u64> {
        let count = self.db.with_conn(EntityRepository::count)?;
        Ok(count as u64)
    }
}

impl CandidateProvider for CatalogStore {
    fn expand_url(&self, base: &Reference) -> CatalogResult<Vec<Reference>> {
        let ids = self
            .db
            .with_conn(|conn| EntityRepository::expand_url(conn, base.owner(), &base.name))?;
        Ok(ids.into_iter().map(Reference::from).collect())
    }
}

impl EntityLookup for CatalogStore {
    fn find_entity(&self, reference: &Reference) -> CatalogResult<Entity> {
        let (Some(series), Some(revision)) = (reference.series.as_deref(), reference.revision)
        else {
            return Err(CatalogError::invalid_reference(
                reference.to_string(),
                "series and revision are required",
            ));
        };

        let revision = i32::try_from(revision).map_err(|_| {
            CatalogError::not_found(
                reference.to_string(),
                format!("entity {reference} not found"),
            )
        })?;

        self.db
            .with_conn(|conn| {
                EntityRepository::find(conn, reference.owner(), &reference.name, series, revision)
            })?
            .map(Entity::from)
            .ok_or_else(|| {
                CatalogError::not_found(
                    reference.to_string(),
                    format!("entity {reference} not found"),
                )
            })
    }
}
