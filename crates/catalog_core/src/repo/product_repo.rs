//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist products together with their owned dimension, detail and
//!   additional-image rows.
//! - Answer by-name lookups over the denormalized `category` column.
//!
//! # Invariants
//! - Owned rows are removed with the product (`ON DELETE CASCADE`).
//! - Detail and image order is preserved via a `position` column.
//! - `category` matching is exact and case-sensitive.

use crate::db::{with_immediate_transaction, DbError};
use crate::model::asset::AssetRef;
use crate::model::page::PageRequest;
use crate::model::product::{
    BoxDimension, Product, ProductDetail, ProductFields, ProductId, ProductImage, ProductImageId,
};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, RepoError, RepoResult, UnitOfWork,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    short_description,
    full_description,
    brand,
    category,
    main_image,
    list_price,
    discount,
    cost,
    enabled,
    in_stock,
    created_at,
    updated_at
FROM products";

/// Repository interface for product persistence.
pub trait ProductRepository {
    /// Inserts one product with its dimension and details.
    fn create_product(&self, fields: &ProductFields) -> RepoResult<ProductId>;
    /// Overwrites scalar columns, dimension and details of one product.
    fn update_product(&self, id: ProductId, fields: &ProductFields) -> RepoResult<()>;
    /// Loads one fully hydrated product.
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// Deletes one product and, by cascade, everything it owns.
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
    /// Lists one page ordered by id.
    fn list_products(&self, request: PageRequest) -> RepoResult<Vec<Product>>;
    /// Counts all products.
    fn count_products(&self) -> RepoResult<u64>;
    /// Loads every product whose `category` equals `name`.
    fn find_by_category_name(&self, name: &str) -> RepoResult<Vec<Product>>;
    /// Returns whether any product has `category == name`.
    fn exists_by_category_name(&self, name: &str) -> RepoResult<bool>;
    /// Rewrites the denormalized category of one product.
    fn set_category(&self, id: ProductId, category: &str) -> RepoResult<()>;
    /// Appends one additional image row.
    fn add_image(&self, id: ProductId, file_name: &AssetRef) -> RepoResult<ProductImage>;
    /// Removes one additional image row and returns it.
    fn remove_image(&self, id: ProductId, image_id: ProductImageId) -> RepoResult<ProductImage>;
    /// Lists additional images of one product in insertion order.
    fn list_images(&self, id: ProductId) -> RepoResult<Vec<ProductImage>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                "products",
                "product_dimensions",
                "product_details",
                "product_images",
            ],
        )?;
        Ok(Self { conn })
    }

    fn hydrate(&self, row: &Row<'_>) -> RepoResult<Product> {
        let mut product = parse_product_row(row)?;
        product.dimension = load_dimension(self.conn, product.id)?;
        product.details = load_details(self.conn, product.id)?;
        product.additional_images = load_images(self.conn, product.id)?;
        Ok(product)
    }

    fn query_products(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(self.hydrate(row)?);
        }
        Ok(items)
    }
}

impl UnitOfWork for SqliteProductRepository<'_> {
    fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>,
    {
        with_immediate_transaction(self.conn, work)
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, fields: &ProductFields) -> RepoResult<ProductId> {
        with_immediate_transaction(self.conn, || {
            self.conn.execute(
                "INSERT INTO products (
                    name,
                    short_description,
                    full_description,
                    brand,
                    category,
                    main_image,
                    list_price,
                    discount,
                    cost,
                    enabled,
                    in_stock
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    fields.name.as_str(),
                    fields.short_description.as_deref(),
                    fields.full_description.as_deref(),
                    fields.brand.as_deref(),
                    fields.category.as_deref(),
                    fields.main_image.as_ref().map(AssetRef::as_str),
                    decimal_to_db(fields.list_price),
                    decimal_to_db(fields.discount),
                    decimal_to_db(fields.cost),
                    bool_to_int(fields.enabled),
                    bool_to_int(fields.in_stock),
                ],
            )?;
            let id = self.conn.last_insert_rowid();
            write_owned_rows(self.conn, id, fields)?;
            Ok(id)
        })
    }

    fn update_product(&self, id: ProductId, fields: &ProductFields) -> RepoResult<()> {
        with_immediate_transaction(self.conn, || {
            let changed = self.conn.execute(
                "UPDATE products
                 SET
                    name = ?2,
                    short_description = ?3,
                    full_description = ?4,
                    brand = ?5,
                    category = ?6,
                    main_image = ?7,
                    list_price = ?8,
                    discount = ?9,
                    cost = ?10,
                    enabled = ?11,
                    in_stock = ?12,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    fields.name.as_str(),
                    fields.short_description.as_deref(),
                    fields.full_description.as_deref(),
                    fields.brand.as_deref(),
                    fields.category.as_deref(),
                    fields.main_image.as_ref().map(AssetRef::as_str),
                    decimal_to_db(fields.list_price),
                    decimal_to_db(fields.discount),
                    decimal_to_db(fields.cost),
                    bool_to_int(fields.enabled),
                    bool_to_int(fields.in_stock),
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::ProductNotFound(id));
            }

            self.conn.execute(
                "DELETE FROM product_dimensions WHERE product_id = ?1;",
                [id],
            )?;
            self.conn
                .execute("DELETE FROM product_details WHERE product_id = ?1;", [id])?;
            write_owned_rows(self.conn, id, fields)
        })
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut items =
            self.query_products(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(items.pop())
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }
        Ok(())
    }

    fn list_products(&self, request: PageRequest) -> RepoResult<Vec<Product>> {
        let offset = i64::try_from(request.offset()).map_err(|_| {
            RepoError::InvalidData(format!("page offset {} out of range", request.offset()))
        })?;
        self.query_products(
            &format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"),
            params![i64::from(request.size), offset],
        )
    }

    fn count_products(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative product count {count}")))
    }

    fn find_by_category_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.query_products(
            &format!("{PRODUCT_SELECT_SQL} WHERE category = ?1 ORDER BY id ASC;"),
            [name],
        )
    }

    fn exists_by_category_name(&self, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE category = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn set_category(&self, id: ProductId, category: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET category = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, category],
        )?;
        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }
        Ok(())
    }

    fn add_image(&self, id: ProductId, file_name: &AssetRef) -> RepoResult<ProductImage> {
        with_immediate_transaction(self.conn, || {
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
                [id],
                |row| row.get(0),
            )?;
            if exists != 1 {
                return Err(RepoError::ProductNotFound(id));
            }

            self.conn.execute(
                "INSERT INTO product_images (product_id, position, file_name)
                 VALUES (
                    ?1,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM product_images WHERE product_id = ?1),
                    ?2
                 );",
                params![id, file_name.as_str()],
            )?;
            Ok(ProductImage {
                id: self.conn.last_insert_rowid(),
                file_name: file_name.clone(),
            })
        })
    }

    fn remove_image(&self, id: ProductId, image_id: ProductImageId) -> RepoResult<ProductImage> {
        with_immediate_transaction(self.conn, || {
            let file_name: Option<String> = self
                .conn
                .query_row(
                    "SELECT file_name FROM product_images WHERE id = ?1 AND product_id = ?2;",
                    params![image_id, id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(file_name) = file_name else {
                return Err(RepoError::ProductImageNotFound {
                    product_id: id,
                    image_id,
                });
            };

            self.conn
                .execute("DELETE FROM product_images WHERE id = ?1;", [image_id])?;
            Ok(ProductImage {
                id: image_id,
                file_name: AssetRef::new(file_name),
            })
        })
    }

    fn list_images(&self, id: ProductId) -> RepoResult<Vec<ProductImage>> {
        load_images(self.conn, id)
    }
}

fn write_owned_rows(conn: &Connection, id: ProductId, fields: &ProductFields) -> RepoResult<()> {
    if let Some(dimension) = fields.dimension.as_ref() {
        conn.execute(
            "INSERT INTO product_dimensions (product_id, width, height, length, weight)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id,
                decimal_to_db(dimension.width),
                decimal_to_db(dimension.height),
                decimal_to_db(dimension.length),
                decimal_to_db(dimension.weight),
            ],
        )?;
    }

    for (position, detail) in fields.details.iter().enumerate() {
        conn.execute(
            "INSERT INTO product_details (product_id, position, name, value)
             VALUES (?1, ?2, ?3, ?4);",
            params![id, position as i64, detail.name.as_str(), detail.value.as_str()],
        )?;
    }
    Ok(())
}

fn load_dimension(conn: &Connection, id: ProductId) -> RepoResult<Option<BoxDimension>> {
    let raw = conn
        .query_row(
            "SELECT width, height, length, weight
             FROM product_dimensions
             WHERE product_id = ?1;",
            [id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;

    raw.map(|(width, height, length, weight)| {
        Ok::<_, RepoError>(BoxDimension {
            width: parse_decimal(width, "product_dimensions.width")?,
            height: parse_decimal(height, "product_dimensions.height")?,
            length: parse_decimal(length, "product_dimensions.length")?,
            weight: parse_decimal(weight, "product_dimensions.weight")?,
        })
    })
    .transpose()
}

fn load_details(conn: &Connection, id: ProductId) -> RepoResult<Vec<ProductDetail>> {
    let mut stmt = conn.prepare(
        "SELECT name, value
         FROM product_details
         WHERE product_id = ?1
         ORDER BY position ASC, id ASC;",
    )?;
    let mut rows = stmt.query([id])?;
    let mut details = Vec::new();
    while let Some(row) = rows.next()? {
        details.push(ProductDetail {
            name: row.get(0)?,
            value: row.get(1)?,
        });
    }
    Ok(details)
}

fn load_images(conn: &Connection, id: ProductId) -> RepoResult<Vec<ProductImage>> {
    let mut stmt = conn.prepare(
        "SELECT id, file_name
         FROM product_images
         WHERE product_id = ?1
         ORDER BY position ASC, id ASC;",
    )?;
    let mut rows = stmt.query([id])?;
    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        images.push(ProductImage {
            id: row.get(0)?,
            file_name: AssetRef::new(row.get::<_, String>(1)?),
        });
    }
    Ok(images)
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        short_description: row.get("short_description")?,
        full_description: row.get("full_description")?,
        brand: row.get("brand")?,
        category: row.get("category")?,
        main_image: row.get::<_, Option<String>>("main_image")?.map(AssetRef::new),
        additional_images: Vec::new(),
        list_price: parse_decimal(row.get("list_price")?, "products.list_price")?,
        discount: parse_decimal(row.get("discount")?, "products.discount")?,
        cost: parse_decimal(row.get("cost")?, "products.cost")?,
        enabled: parse_bool(row.get("enabled")?, "products.enabled")?,
        in_stock: parse_bool(row.get("in_stock")?, "products.in_stock")?,
        dimension: None,
        details: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn decimal_to_db(value: Option<Decimal>) -> Option<String> {
    value.map(|decimal| decimal.to_string())
}

fn parse_decimal(value: Option<String>, column: &'static str) -> RepoResult<Option<Decimal>> {
    value
        .map(|text| {
            Decimal::from_str(&text).map_err(|_| {
                RepoError::InvalidData(format!("invalid decimal `{text}` in {column}"))
            })
        })
        .transpose()
}
