//! SQLite marketplace store.
//!
//! Units of work are sqlx transactions opened with `BEGIN IMMEDIATE`, so
//! concurrent units queue on the database write lock for up to the busy
//! timeout. Product rows are written back with a compare-and-set on the
//! stock value the unit read; a unit that still races another writer fails
//! with [`StoreError::Conflict`] instead of silently overwriting the other
//! unit's decrement. Callers re-run the whole unit.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite, Transaction};

use crate::application::ports::{
    CatalogStore, OrderRepository, StoreError, TransactionalStore, UnitOfWork, UserRepository,
};
use crate::domain::catalog::{NewProduct, NewShop, Product, ProductRecord, Shop};
use crate::domain::identity::{NewUser, OrderScope, Role, User};
use crate::domain::ordering::{Order, OrderDraft, OrderLine, OrderRecord, OrderStatus};
use crate::domain::shared::{
    Money, OrderId, OrderLineId, ProductId, Quantity, ShopId, Timestamp, UserId,
};

/// SQLite primary result codes that mean another connection holds the lock.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL CHECK (role IN ('customer', 'shop', 'admin')),
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS shops (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        address TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL DEFAULT '',
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        shop_id INTEGER NOT NULL REFERENCES shops(id),
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price TEXT NOT NULL,
        stock INTEGER NOT NULL CHECK (stock >= 0),
        is_active INTEGER NOT NULL DEFAULT 1,
        image_url TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_products_shop ON products(shop_id)",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        shop_id INTEGER NOT NULL REFERENCES shops(id),
        total_amount TEXT NOT NULL,
        status TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_shop ON orders(shop_id)",
    "CREATE TABLE IF NOT EXISTS order_lines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(id),
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        price TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_order_lines_order ON order_lines(order_id)",
];

const PRODUCT_COLUMNS: &str = "id, shop_id, name, description, price, stock, is_active, \
                               image_url, created_at, updated_at, deleted_at";
const SHOP_COLUMNS: &str =
    "id, owner_id, name, description, address, phone, is_active, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, name, phone, role, password_hash, created_at, updated_at";
const ORDER_COLUMNS: &str =
    "id, user_id, shop_id, total_amount, status, note, created_at, updated_at";

/// SQLite implementation of every storage port.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the database cannot be opened or the
    /// schema cannot be applied.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| store_error("connect", e))?;

        let store = Self { pool };
        store.apply_schema().await?;
        tracing::info!(url, max_connections, "SQLite store ready");
        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| store_error("apply schema", e))?;
        }
        Ok(())
    }

    async fn load_lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity, price FROM order_lines \
             WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("load order lines", e))?;

        rows.iter().map(line_from_row).collect()
    }

    async fn hydrate(&self, row: &SqliteRow) -> Result<Order, StoreError> {
        let id = OrderId::new(get(row, "id")?);
        let lines = self.load_lines(id).await?;
        order_from_row(row, lines)
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Timestamp::now();
        let result = sqlx::query(
            "INSERT INTO users (email, name, phone, role, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(now.as_datetime())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("insert user", e))?;

        Ok(user.into_user(UserId::new(result.last_insert_rowid()), now))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find user", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find user by email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("get shop", e))?;
        row.as_ref().map(shop_from_row).transpose()
    }

    async fn find_shop_by_owner(&self, owner: UserId) -> Result<Option<Shop>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE owner_id = ?"))
            .bind(owner.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find shop by owner", e))?;
        row.as_ref().map(shop_from_row).transpose()
    }

    async fn list_active_shops(&self) -> Result<Vec<Shop>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE is_active = 1 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list shops", e))?;
        rows.iter().map(shop_from_row).collect()
    }

    async fn insert_shop(&self, shop: NewShop) -> Result<Shop, StoreError> {
        let now = Timestamp::now();
        let result = sqlx::query(
            "INSERT INTO shops \
             (owner_id, name, description, address, phone, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(shop.owner_id.value())
        .bind(&shop.name)
        .bind(&shop.description)
        .bind(&shop.address)
        .bind(&shop.phone)
        .bind(now.as_datetime())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("insert shop", e))?;

        Ok(shop.into_shop(ShopId::new(result.last_insert_rowid()), now))
    }

    async fn update_shop(&self, shop: &Shop) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE shops SET name = ?, description = ?, address = ?, phone = ?, \
             is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&shop.name)
        .bind(&shop.description)
        .bind(&shop.address)
        .bind(&shop.phone)
        .bind(shop.is_active)
        .bind(shop.updated_at.as_datetime())
        .bind(shop.id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("update shop", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("shop {} vanished", shop.id)));
        }
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("get product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn get_product_including_deleted(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("get product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_active_products(
        &self,
        shop: Option<ShopId>,
    ) -> Result<Vec<Product>, StoreError> {
        let shop_id = shop.map(ShopId::value);
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND deleted_at IS NULL AND (? IS NULL OR shop_id = ?) \
             ORDER BY id"
        ))
        .bind(shop_id)
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let now = Timestamp::now();
        let result = sqlx::query(
            "INSERT INTO products \
             (shop_id, name, description, price, stock, is_active, image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?)",
        )
        .bind(product.shop_id.value())
        .bind(&product.name)
        .bind(&product.description)
        .bind(money_text(product.price))
        .bind(i64::from(product.stock))
        .bind(&product.image_url)
        .bind(now.as_datetime())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("insert product", e))?;

        Ok(product.into_product(ProductId::new(result.last_insert_rowid()), now))
    }
}

#[async_trait]
impl OrderRepository for SqliteStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find order", e))?;
        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>, StoreError> {
        let (filter, key) = match scope {
            OrderScope::Customer(user_id) => ("WHERE user_id = ?", Some(user_id.value())),
            OrderScope::Shop(shop_id) => ("WHERE shop_id = ?", Some(shop_id.value())),
            OrderScope::All => ("", None),
        };
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders {filter} ORDER BY created_at DESC, id DESC"
        );
        let mut query = sqlx::query(&sql);
        if let Some(key) = key {
            query = query.bind(key);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("list orders", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn update_order_status(&self, order: &Order) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(order.status().as_str())
            .bind(order.updated_at().as_datetime())
            .bind(order.id().value())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("update order status", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("order {} vanished", order.id())));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionalStore for SqliteStore {
    type Unit = SqliteUnit;

    /// Units take the write lock up front, so a competing writer waits out
    /// the busy timeout at `BEGIN` instead of failing on its first write.
    async fn begin(&self) -> Result<SqliteUnit, StoreError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| store_error("begin", e))?;
        Ok(SqliteUnit {
            tx,
            read_stock: HashMap::new(),
        })
    }
}

/// Unit of work over [`SqliteStore`]: one sqlx transaction. Dropping it
/// rolls the transaction back.
pub struct SqliteUnit {
    tx: Transaction<'static, Sqlite>,
    /// Stock each product row held when this unit last read or wrote it.
    read_stock: HashMap<ProductId, u32>,
}

#[async_trait]
impl UnitOfWork for SqliteUnit {
    async fn get_product(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| store_error("get product", e))?;

        let product = row.as_ref().map(product_from_row).transpose()?;
        if let Some(product) = &product {
            self.read_stock.insert(product.id(), product.stock());
        }
        Ok(product)
    }

    async fn save_product(&mut self, product: &Product) -> Result<(), StoreError> {
        let expected = self.read_stock.get(&product.id()).copied().ok_or_else(|| {
            StoreError::Conflict(format!("product {} was not read in this unit", product.id()))
        })?;

        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ?, stock = ?, \
             is_active = ?, image_url = ?, updated_at = ?, deleted_at = ? \
             WHERE id = ? AND stock = ?",
        )
        .bind(product.name())
        .bind(product.description())
        .bind(money_text(product.price()))
        .bind(i64::from(product.stock()))
        .bind(product.is_active())
        .bind(product.image_url())
        .bind(product.updated_at().as_datetime())
        .bind(product.deleted_at().map(|at| at.as_datetime()))
        .bind(product.id().value())
        .bind(i64::from(expected))
        .execute(&mut *self.tx)
        .await
        .map_err(|e| store_error("save product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "stock of product {} changed concurrently",
                product.id()
            )));
        }
        self.read_stock.insert(product.id(), product.stock());
        Ok(())
    }

    async fn insert_order(&mut self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let now = Timestamp::now();
        let result = sqlx::query(
            "INSERT INTO orders (user_id, shop_id, total_amount, status, note, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(draft.user_id().value())
        .bind(draft.shop_id().value())
        .bind(money_text(draft.total()))
        .bind(OrderStatus::Pending.as_str())
        .bind(draft.note())
        .bind(now.as_datetime())
        .bind(now.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| store_error("insert order", e))?;
        let order_id = OrderId::new(result.last_insert_rowid());

        let mut lines = Vec::with_capacity(draft.lines().len());
        for line in draft.lines() {
            let inserted = sqlx::query(
                "INSERT INTO order_lines (order_id, product_id, quantity, price) VALUES (?, ?, ?, ?)",
            )
            .bind(order_id.value())
            .bind(line.product_id.value())
            .bind(i64::from(line.quantity.value()))
            .bind(money_text(line.price))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| store_error("insert order line", e))?;
            lines.push(OrderLine {
                id: OrderLineId::new(inserted.last_insert_rowid()),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            });
        }

        Ok(Order::reconstitute(OrderRecord {
            id: order_id,
            user_id: draft.user_id(),
            shop_id: draft.shop_id(),
            total_amount: draft.total(),
            status: OrderStatus::Pending,
            note: draft.note().to_string(),
            lines,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(|e| store_error("commit", e))
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(|e| store_error("rollback", e))
    }
}

/// Map a driver error onto the port's error kinds.
fn store_error(action: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Duplicate(format!("{action}: {}", db.message()));
        }
        let primary = db
            .code()
            .and_then(|code| code.parse::<i64>().ok())
            .map(|code| code & 0xff);
        if matches!(primary, Some(SQLITE_BUSY | SQLITE_LOCKED)) {
            return StoreError::Conflict(format!("{action}: {}", db.message()));
        }
    }
    StoreError::Backend(format!("{action}: {err}"))
}

fn money_text(money: Money) -> String {
    money.amount().to_string()
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

fn get_money(row: &SqliteRow, column: &str) -> Result<Money, StoreError> {
    let text: String = get(row, column)?;
    Decimal::from_str(&text)
        .map(Money::new)
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

fn get_timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, StoreError> {
    get::<DateTime<Utc>>(row, column).map(Timestamp::new)
}

fn get_u32(row: &SqliteRow, column: &str) -> Result<u32, StoreError> {
    let value: i64 = get(row, column)?;
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column}: {value} out of range")))
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let role: String = get(row, "role")?;
    Ok(User {
        id: UserId::new(get(row, "id")?),
        email: get(row, "email")?,
        name: get(row, "name")?,
        phone: get(row, "phone")?,
        role: Role::from_str(&role).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        password_hash: get(row, "password_hash")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn shop_from_row(row: &SqliteRow) -> Result<Shop, StoreError> {
    Ok(Shop {
        id: ShopId::new(get(row, "id")?),
        owner_id: UserId::new(get(row, "owner_id")?),
        name: get(row, "name")?,
        description: get(row, "description")?,
        address: get(row, "address")?,
        phone: get(row, "phone")?,
        is_active: get(row, "is_active")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    Ok(Product::reconstitute(ProductRecord {
        id: ProductId::new(get(row, "id")?),
        shop_id: ShopId::new(get(row, "shop_id")?),
        name: get(row, "name")?,
        description: get(row, "description")?,
        price: get_money(row, "price")?,
        stock: get_u32(row, "stock")?,
        is_active: get(row, "is_active")?,
        image_url: get(row, "image_url")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        deleted_at: get::<Option<DateTime<Utc>>>(row, "deleted_at")?.map(Timestamp::new),
    }))
}

fn line_from_row(row: &SqliteRow) -> Result<OrderLine, StoreError> {
    let quantity = get_u32(row, "quantity")?;
    Ok(OrderLine {
        id: OrderLineId::new(get(row, "id")?),
        order_id: OrderId::new(get(row, "order_id")?),
        product_id: ProductId::new(get(row, "product_id")?),
        quantity: Quantity::new(quantity).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        price: get_money(row, "price")?,
    })
}

fn order_from_row(row: &SqliteRow, lines: Vec<OrderLine>) -> Result<Order, StoreError> {
    let status: String = get(row, "status")?;
    Ok(Order::reconstitute(OrderRecord {
        id: OrderId::new(get(row, "id")?),
        user_id: UserId::new(get(row, "user_id")?),
        shop_id: ShopId::new(get(row, "shop_id")?),
        total_amount: get_money(row, "total_amount")?,
        status: OrderStatus::from_str(&status).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        note: get(row, "note")?,
        lines,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    }))
}
