//! Category tree repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and traverse the self-referential category hierarchy.
//! - Keep ordering rules for flat and per-parent listings inside SQL.
//!
//! # Invariants
//! - `create`/`update` reject a `parent_id` that does not resolve.
//! - Child listing is deterministic: `name` (case-insensitive) then `id`.
//! - Ordered listing puts top-level rows first regardless of direction.
//! - No product or asset coordination happens here.

use crate::db::{with_immediate_transaction, DbError};
use crate::model::asset::AssetRef;
use crate::model::category::{Category, CategoryId, NewCategory};
use crate::model::page::{PageRequest, SortDirection};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, RepoError, RepoResult, UnitOfWork,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    image,
    enabled,
    parent_id,
    created_at,
    updated_at
FROM categories";

/// Repository interface for category tree operations.
pub trait CategoryRepository {
    /// Inserts one category and returns the stored row.
    fn create_category(&self, category: &NewCategory) -> RepoResult<Category>;
    /// Overwrites mutable columns of an existing category.
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    /// Loads one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Hard-deletes one category row.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
    /// Lists direct children of `parent_id`, or top-level rows for `None`.
    fn list_children(&self, parent_id: Option<CategoryId>) -> RepoResult<Vec<Category>>;
    /// Lists one page ordered top-level first, then by name in `direction`.
    fn list_ordered(
        &self,
        request: PageRequest,
        direction: SortDirection,
    ) -> RepoResult<Vec<Category>>;
    /// Counts all categories.
    fn count_categories(&self) -> RepoResult<u64>;
    /// Finds the lowest-id category with exactly this name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Returns whether any category has `id` as parent.
    fn has_children(&self, id: CategoryId) -> RepoResult<bool>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories"])?;
        Ok(Self { conn })
    }

    fn ensure_parent_exists(&self, parent_id: Option<CategoryId>) -> RepoResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [parent_id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::ParentNotFound(parent_id));
        }
        Ok(())
    }
}

impl UnitOfWork for SqliteCategoryRepository<'_> {
    fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>,
    {
        with_immediate_transaction(self.conn, work)
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<Category> {
        self.ensure_parent_exists(category.parent_id)?;

        self.conn.execute(
            "INSERT INTO categories (
                name,
                description,
                image,
                enabled,
                parent_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                category.name.as_str(),
                category.description.as_deref(),
                category.image.as_ref().map(AssetRef::as_str),
                bool_to_int(category.enabled),
                category.parent_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_category(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("category {id} missing after insert")))
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.ensure_parent_exists(category.parent_id)?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?2,
                description = ?3,
                image = ?4,
                enabled = ?5,
                parent_id = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                category.id,
                category.name.as_str(),
                category.description.as_deref(),
                category.image.as_ref().map(AssetRef::as_str),
                bool_to_int(category.enabled),
                category.parent_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.id));
        }
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }

    fn list_children(&self, parent_id: Option<CategoryId>) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE parent_id IS ?1
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([parent_id])?;
        collect_categories(&mut rows)
    }

    fn list_ordered(
        &self,
        request: PageRequest,
        direction: SortDirection,
    ) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             ORDER BY
                CASE WHEN parent_id IS NULL THEN 0 ELSE 1 END ASC,
                name COLLATE NOCASE {direction},
                id ASC
             LIMIT ?1 OFFSET ?2;",
            direction = direction.as_sql()
        ))?;
        let offset = i64::try_from(request.offset()).map_err(|_| {
            RepoError::InvalidData(format!("page offset {} out of range", request.offset()))
        })?;
        let mut rows = stmt.query(params![i64::from(request.size), offset])?;
        collect_categories(&mut rows)
    }

    fn count_categories(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative category count {count}")))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let id: Option<CategoryId> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?1 ORDER BY id ASC LIMIT 1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.get_category(id),
            None => Ok(None),
        }
    }

    fn has_children(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn collect_categories(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Category>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_category_row(row)?);
    }
    Ok(items)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "blank name in categories.name".to_string(),
        ));
    }

    Ok(Category {
        id: row.get("id")?,
        name,
        description: row.get("description")?,
        image: row.get::<_, Option<String>>("image")?.map(AssetRef::new),
        enabled: parse_bool(row.get("enabled")?, "categories.enabled")?,
        parent_id: row.get("parent_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
