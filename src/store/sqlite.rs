use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use super::Store;
use super::code::{DEFAULT_PREFIX, next_code};
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Looks up the company's code prefix, falling back to the default when
/// the company is missing or has an empty template.
fn company_prefix(conn: &Connection, company_id: &str) -> Result<String> {
    let prefix: Option<String> = conn
        .query_row(
            "SELECT product_code FROM company WHERE companyid = ?1",
            params![company_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(prefix
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string()))
}

/// Finds the highest code in the company's active sequence and derives the
/// next one. Runs against either a plain connection or an open transaction.
fn next_code_for(conn: &Connection, company_id: &str) -> Result<String> {
    let prefix = company_prefix(conn, company_id)?;

    let last: Option<String> = conn
        .query_row(
            "SELECT produkkode FROM produk
             WHERE companyid = ?1 AND status = 1 AND produkkode LIKE ?2 ESCAPE '\\'
             ORDER BY produkkode DESC LIMIT 1",
            params![company_id, format!("{}-%", escape_like(&prefix))],
            |row| row.get(0),
        )
        .optional()?;

    Ok(next_code(&prefix, last.as_deref()))
}

/// Escapes LIKE wildcards so a prefix containing `%` or `_` matches
/// literally in the code scan.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Company operations

    fn create_company(&self, company: &Company) -> Result<()> {
        self.conn().execute(
            "INSERT INTO company (companyid, company_name, product_code, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                company.id,
                company.name,
                company.code_prefix,
                format_datetime(&company.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_company(&self, id: &str) -> Result<Option<Company>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT companyid, company_name, product_code, created_at
             FROM company WHERE companyid = ?1",
            params![id],
            |row| {
                Ok(Company {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    code_prefix: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_companies(&self) -> Result<Vec<Company>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT companyid, company_name, product_code, created_at
             FROM company ORDER BY company_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Company {
                id: row.get(0)?,
                name: row.get(1)?,
                code_prefix: row.get(2)?,
                created_at: parse_datetime(&row.get::<_, String>(3)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Category operations

    fn create_category(&self, category: &Category) -> Result<()> {
        self.conn().execute(
            "INSERT INTO kategori (kategoriid, kategorinama, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                category.id,
                category.name,
                format_datetime(&category.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT kategoriid, kategorinama, created_at FROM kategori WHERE kategoriid = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT kategoriid, kategorinama, created_at FROM kategori
             WHERE LOWER(kategorinama) = LOWER(?1) LIMIT 1",
            params![name],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT kategoriid, kategorinama, created_at FROM kategori ORDER BY kategorinama",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_datetime(&row.get::<_, String>(2)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Product operations

    fn next_product_code(&self, company_id: &str) -> Result<String> {
        next_code_for(&self.conn(), company_id)
    }

    fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // The code scan runs inside the transaction so two concurrent
        // creates cannot observe the same "last" code; the partial unique
        // index on (companyid, produkkode) backstops it.
        let code = next_code_for(&tx, &draft.company_id)?;
        let now = format_datetime(&Utc::now());

        let product_id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO produk (produkid, produkkode, companyid, namaproduk, kategoriid,
                                 jenis, deskripsi_produk, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
            params![
                product_id,
                code,
                draft.company_id,
                draft.name,
                draft.category_id,
                draft.kind.as_i64(),
                draft.description,
                now,
            ],
        )?;

        let variant_id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO varian (varianid, produkid, sku, stok, status, deskripsi, produkfoto, created_at)
             VALUES (?1, ?2, ?3, 0, 1, ?4, ?5, ?6)",
            params![
                variant_id,
                product_id,
                format!("{code}-SKU"),
                draft.description,
                draft.photo_path,
                now,
            ],
        )?;

        tx.execute(
            "INSERT INTO varianharga (varianid, harga_beli, harga_jual) VALUES (?1, ?2, ?3)",
            params![variant_id, draft.buy_price, draft.sell_price],
        )?;

        tx.commit()?;

        Ok(CreatedProduct {
            product_id,
            variant_id,
            code,
        })
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT produkid, produkkode, companyid, namaproduk, kategoriid, jenis,
                    deskripsi_produk, status, created_at
             FROM produk WHERE produkid = ?1",
            params![id],
            |row| {
                Ok(Product {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    company_id: row.get(2)?,
                    name: row.get(3)?,
                    category_id: row.get(4)?,
                    kind: row.get(5)?,
                    description: row.get(6)?,
                    status: row.get(7)?,
                    created_at: parse_datetime(&row.get::<_, String>(8)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_products(&self) -> Result<Vec<ProductListing>> {
        let conn = self.conn();
        // Single query instead of four table scans merged in memory. The
        // correlated subquery pins the "first variant" to insertion order.
        let mut stmt = conn.prepare(
            "SELECT p.produkid, p.produkkode, p.namaproduk,
                    COALESCE(k.kategorinama, '-'),
                    p.jenis, p.status,
                    COALESCE(vh.harga_beli, 0), COALESCE(vh.harga_jual, 0),
                    COALESCE(v.produkfoto, '')
             FROM produk p
             LEFT JOIN kategori k ON k.kategoriid = p.kategoriid
             LEFT JOIN varian v ON v.varianid = (
                 SELECT varianid FROM varian WHERE produkid = p.produkid
                 ORDER BY rowid LIMIT 1
             )
             LEFT JOIN varianharga vh ON vh.varianid = v.varianid
             ORDER BY p.produkkode",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ProductListing {
                id: row.get(0)?,
                code: row.get(1)?,
                name: row.get(2)?,
                category: row.get(3)?,
                kind: row.get(4)?,
                active: row.get::<_, i64>(5)? == 1,
                buy_price: row.get(6)?,
                sell_price: row.get(7)?,
                photo: row.get(8)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn soft_delete_product(&self, id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE produk SET status = 0 WHERE produkid = ?1",
            params![id],
        )?;
        Ok(rows > 0)
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (userid, name, email, password_hash, avatar, role_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.avatar,
                user.role_id,
                user.status,
                format_datetime(&user.created_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(Error::EmailTaken)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT userid, name, email, password_hash, avatar, role_id, status, created_at
             FROM users WHERE userid = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    password_hash: row.get(3)?,
                    avatar: row.get(4)?,
                    role_id: row.get(5)?,
                    status: row.get(6)?,
                    created_at: parse_datetime(&row.get::<_, String>(7)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT userid, name, email, password_hash, avatar, role_id, status, created_at
             FROM users WHERE LOWER(email) = LOWER(?1) LIMIT 1",
            params![email],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    password_hash: row.get(3)?,
                    avatar: row.get(4)?,
                    role_id: row.get(5)?,
                    status: row.get(6)?,
                    created_at: parse_datetime(&row.get::<_, String>(7)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT userid, name, email, password_hash, avatar, role_id, status, created_at
             FROM users ORDER BY created_at",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                avatar: row.get(4)?,
                role_id: row.get(5)?,
                status: row.get(6)?,
                created_at: parse_datetime(&row.get::<_, String>(7)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Session token operations

    fn create_token(&self, token: &SessionToken) -> Result<()> {
        self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        )?;
        Ok(())
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<SessionToken>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(SessionToken {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    user_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                    expires_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
                    last_used_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn draft(company_id: &str, name: &str) -> ProductDraft {
        ProductDraft {
            company_id: company_id.to_string(),
            name: name.to_string(),
            kind: ProductKind::Physical,
            description: String::new(),
            category_id: Uuid::new_v4().to_string(),
            buy_price: 100.0,
            sell_price: 150.0,
            photo_path: String::new(),
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open_store();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"company".to_string()));
        assert!(tables.contains(&"kategori".to_string()));
        assert!(tables.contains(&"produk".to_string()));
        assert!(tables.contains(&"varian".to_string()));
        assert!(tables.contains(&"varianharga".to_string()));
        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"tokens".to_string()));
    }

    #[test]
    fn test_first_code_uses_default_prefix() {
        let (_temp, store) = open_store();

        // No company row exists; the generator falls back to "P".
        assert_eq!(store.next_product_code("C1").unwrap(), "P-00001");
    }

    #[test]
    fn test_company_prefix_is_honored() {
        let (_temp, store) = open_store();

        store
            .create_company(&Company {
                id: "C1".to_string(),
                name: "Warehouse Inc".to_string(),
                code_prefix: "WRH".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(store.next_product_code("C1").unwrap(), "WRH-00001");
    }

    #[test]
    fn test_code_sequence_increments() {
        let (_temp, store) = open_store();

        let first = store.create_product(&draft("C1", "Widget")).unwrap();
        let second = store.create_product(&draft("C1", "Gadget")).unwrap();

        assert_eq!(first.code, "P-00001");
        assert_eq!(second.code, "P-00002");
        assert_eq!(store.next_product_code("C1").unwrap(), "P-00003");
    }

    #[test]
    fn test_sequences_are_per_company() {
        let (_temp, store) = open_store();

        store.create_product(&draft("C1", "Widget")).unwrap();
        let other = store.create_product(&draft("C2", "Widget")).unwrap();

        assert_eq!(other.code, "P-00001");
    }

    #[test]
    fn test_soft_deleted_products_excluded_from_scan() {
        let (_temp, store) = open_store();

        store.create_product(&draft("C1", "Widget")).unwrap();
        let second = store.create_product(&draft("C1", "Gadget")).unwrap();
        assert_eq!(second.code, "P-00002");

        assert!(store.soft_delete_product(&second.product_id).unwrap());

        // Only active rows count; P-00002 is reissued.
        assert_eq!(store.next_product_code("C1").unwrap(), "P-00002");
    }

    #[test]
    fn test_prefix_wildcards_match_literally() {
        let (_temp, store) = open_store();

        store
            .create_company(&Company {
                id: "C1".to_string(),
                name: "Wildcard Inc".to_string(),
                code_prefix: "%".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        // A code left over from before the prefix changed must not be
        // picked up by a wildcard-shaped prefix.
        store
            .connection()
            .execute(
                "INSERT INTO produk (produkid, produkkode, companyid, namaproduk, jenis, status)
                 VALUES ('p0', 'Z-00099', 'C1', 'Old', 1, 1)",
                [],
            )
            .unwrap();

        assert_eq!(store.next_product_code("C1").unwrap(), "%-00001");
    }

    #[test]
    fn test_get_product_returns_persisted_row() {
        let (_temp, store) = open_store();

        let mut d = draft("C1", "Widget");
        d.description = "a widget".to_string();
        let created = store.create_product(&d).unwrap();

        let product = store.get_product(&created.product_id).unwrap().unwrap();
        assert_eq!(product.code, "P-00001");
        assert_eq!(product.name, "Widget");
        assert_eq!(product.kind, ProductKind::Physical.as_i64());
        assert_eq!(product.status, 1);
        assert_eq!(product.description, "a widget");

        assert!(store.get_product("missing").unwrap().is_none());
    }

    #[test]
    fn test_create_product_writes_variant_and_price() {
        let (_temp, store) = open_store();

        let created = store.create_product(&draft("C1", "Widget")).unwrap();

        let conn = store.connection();
        let (sku, stock, photo): (String, i64, String) = conn
            .query_row(
                "SELECT sku, stok, produkfoto FROM varian WHERE produkid = ?1",
                params![created.product_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(sku, "P-00001-SKU");
        assert_eq!(stock, 0);
        assert_eq!(photo, "");

        let (buy, sell): (f64, f64) = conn
            .query_row(
                "SELECT harga_beli, harga_jual FROM varianharga WHERE varianid = ?1",
                params![created.variant_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(buy, 100.0);
        assert_eq!(sell, 150.0);
    }

    #[test]
    fn test_listing_joins_category_and_first_variant() {
        let (_temp, store) = open_store();

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: "electronics".to_string(),
            created_at: Utc::now(),
        };
        store.create_category(&category).unwrap();

        let mut d = draft("C1", "Widget");
        d.category_id = category.id.clone();
        store.create_product(&d).unwrap();

        let listing = store.list_products().unwrap();
        assert_eq!(listing.len(), 1);
        let entry = &listing[0];
        assert_eq!(entry.code, "P-00001");
        assert_eq!(entry.category, "electronics");
        assert_eq!(entry.buy_price, 100.0);
        assert_eq!(entry.sell_price, 150.0);
        assert!(entry.active);
    }

    #[test]
    fn test_listing_defaults_without_variants() {
        let (_temp, store) = open_store();

        // Insert a bare product row so the listing has no variant to join.
        store
            .connection()
            .execute(
                "INSERT INTO produk (produkid, produkkode, companyid, namaproduk, jenis, status)
                 VALUES ('p1', 'P-00001', 'C1', 'Orphan', 1, 1)",
                [],
            )
            .unwrap();

        let listing = store.list_products().unwrap();
        assert_eq!(listing.len(), 1);
        let entry = &listing[0];
        assert_eq!(entry.buy_price, 0.0);
        assert_eq!(entry.sell_price, 0.0);
        assert_eq!(entry.photo, "");
        assert_eq!(entry.category, "-");
    }

    #[test]
    fn test_category_lookup_is_case_insensitive() {
        let (_temp, store) = open_store();

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: "electronics".to_string(),
            created_at: Utc::now(),
        };
        store.create_category(&category).unwrap();

        let found = store.find_category_by_name("Electronics").unwrap().unwrap();
        assert_eq!(found.id, category.id);

        assert!(store.find_category_by_name("furniture").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_temp, store) = open_store();

        let user = User {
            id: "u1".to_string(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            avatar: String::new(),
            role_id: 1,
            status: 1,
            created_at: Utc::now(),
        };
        store.create_user(&user).unwrap();

        let duplicate = User {
            id: "u2".to_string(),
            ..user
        };
        let result = store.create_user(&duplicate);
        assert!(matches!(result, Err(Error::EmailTaken)));
    }

    #[test]
    fn test_token_for_missing_user_is_database_error() {
        let (_temp, store) = open_store();

        // Only unique violations map to a domain error; the FK failure
        // here must surface as a plain database error.
        let token = SessionToken {
            id: "t1".to_string(),
            token_hash: "hash".to_string(),
            token_lookup: "lookup".to_string(),
            user_id: "ghost".to_string(),
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        };
        let result = store.create_token(&token);
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
