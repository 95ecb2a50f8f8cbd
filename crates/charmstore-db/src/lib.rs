pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        connection::DbConnection,
        error::DbError,
        models::{NewBaseEntity, NewEntity},
        repository::{base_entity::BaseEntityRepository, entity::EntityRepository, SortDirection},
    };

    fn setup_db() -> DbConnection {
        DbConnection::open_in_memory().unwrap()
    }

    fn insert_base(db: &mut DbConnection, owner: &str, name: &str) -> i32 {
        BaseEntityRepository::insert(
            db.conn(),
            &NewBaseEntity {
                owner,
                name,
                read_acl: json!(["everyone"]),
                created_at: "2025-01-20T00:00:00Z",
            },
        )
        .unwrap()
    }

    fn insert_entity(
        db: &mut DbConnection,
        base_id: i32,
        owner: &str,
        name: &str,
        series: &str,
        revision: i32,
    ) -> Result<i32, DbError> {
        EntityRepository::insert(
            db.conn(),
            &NewEntity {
                base_id,
                owner,
                name,
                series,
                revision,
                blob_hash: "abc123",
                blob_size: 1024,
                upload_time: "2025-01-20T00:00:00Z",
                extra_info: None,
            },
        )
        .map_err(DbError::from)
    }

    #[test]
    fn test_expand_url_groups_by_base_identity() {
        let mut db = setup_db();
        let wordpress = insert_base(&mut db, "", "wordpress");
        let mysql = insert_base(&mut db, "", "mysql");
        let owned = insert_base(&mut db, "bob", "wordpress");

        insert_entity(&mut db, wordpress, "", "wordpress", "trusty", 25).unwrap();
        insert_entity(&mut db, wordpress, "", "wordpress", "precise", 24).unwrap();
        insert_entity(&mut db, mysql, "", "mysql", "trusty", 1).unwrap();
        insert_entity(&mut db, owned, "bob", "wordpress", "trusty", 3).unwrap();

        let ids = EntityRepository::expand_url(db.conn(), "", "wordpress").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| id.name == "wordpress" && id.owner.is_empty()));
        assert_eq!(ids[0].series, "precise");
        assert_eq!(ids[1].series, "trusty");

        let none = EntityRepository::expand_url(db.conn(), "", "nonexistent").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_exact_entity() {
        let mut db = setup_db();
        let base = insert_base(&mut db, "", "wordpress");
        insert_entity(&mut db, base, "", "wordpress", "trusty", 25).unwrap();

        let found = EntityRepository::find(db.conn(), "", "wordpress", "trusty", 25)
            .unwrap()
            .unwrap();
        assert_eq!(found.blob_size, 1024);
        assert_eq!(found.downloads, 0);

        let missing = EntityRepository::find(db.conn(), "", "wordpress", "trusty", 26).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_max_revision() {
        let mut db = setup_db();
        let base = insert_base(&mut db, "", "wordpress");

        assert_eq!(
            EntityRepository::max_revision(db.conn(), "", "wordpress").unwrap(),
            None
        );

        insert_entity(&mut db, base, "", "wordpress", "trusty", 25).unwrap();
        insert_entity(&mut db, base, "", "wordpress", "utopic", 10).unwrap();

        assert_eq!(
            EntityRepository::max_revision(db.conn(), "", "wordpress").unwrap(),
            Some(25)
        );
    }

    #[test]
    fn test_duplicate_revision_is_rejected() {
        let mut db = setup_db();
        let base = insert_base(&mut db, "", "wordpress");
        insert_entity(&mut db, base, "", "wordpress", "trusty", 25).unwrap();

        let err = insert_entity(&mut db, base, "", "wordpress", "trusty", 25).unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists(_)));
    }

    #[test]
    fn test_entity_requires_base() {
        let mut db = setup_db();
        let err = insert_entity(&mut db, 999, "", "orphan", "trusty", 1).unwrap_err();
        assert!(matches!(err, DbError::IntegrityError(_)));
    }

    #[test]
    fn test_increment_downloads() {
        let mut db = setup_db();
        let base = insert_base(&mut db, "", "wordpress");
        let id = insert_entity(&mut db, base, "", "wordpress", "trusty", 25).unwrap();

        assert_eq!(EntityRepository::increment_downloads(db.conn(), id).unwrap(), 1);
        assert_eq!(EntityRepository::increment_downloads(db.conn(), id).unwrap(), 2);

        let entity = EntityRepository::find_by_id(db.conn(), id).unwrap().unwrap();
        assert_eq!(entity.downloads, 2);
    }

    #[test]
    fn test_list_filtered_and_count() {
        let mut db = setup_db();
        let wordpress = insert_base(&mut db, "", "wordpress");
        let mysql = insert_base(&mut db, "", "mysql");
        insert_entity(&mut db, wordpress, "", "wordpress", "trusty", 1).unwrap();
        insert_entity(&mut db, wordpress, "", "wordpress", "precise", 2).unwrap();
        insert_entity(&mut db, mysql, "", "mysql", "trusty", 1).unwrap();

        assert_eq!(EntityRepository::count(db.conn()).unwrap(), 3);

        let trusty = EntityRepository::list_filtered(
            db.conn(),
            None,
            None,
            Some("trusty"),
            None,
            Some(SortDirection::Asc),
        )
        .unwrap();
        assert_eq!(trusty.len(), 2);
        assert_eq!(trusty[0].name, "wordpress");

        let limited =
            EntityRepository::list_filtered(db.conn(), Some("wordpress"), None, None, Some(1), None)
                .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].series, "precise");
    }

    #[test]
    fn test_read_acl_roundtrip() {
        let mut db = setup_db();
        let id = insert_base(&mut db, "bob", "secret");

        let base = BaseEntityRepository::find(db.conn(), "bob", "secret")
            .unwrap()
            .unwrap();
        assert_eq!(base.read_acl(), vec!["everyone".to_string()]);

        BaseEntityRepository::set_read_acl(db.conn(), id, json!(["bob", "alice"])).unwrap();
        let base = BaseEntityRepository::find(db.conn(), "bob", "secret")
            .unwrap()
            .unwrap();
        assert_eq!(base.read_acl(), vec!["bob".to_string(), "alice".to_string()]);
    }

    #[test]
    fn test_open_on_disk_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let mut db = DbConnection::open(&path).unwrap();
            insert_base(&mut db, "", "wordpress");
        }

        let mut reopened = DbConnection::open(&path).unwrap();
        assert!(BaseEntityRepository::find(reopened.conn(), "", "wordpress")
            .unwrap()
            .is_some());
    }
}
