pub const SCHEMA: &str = r#"
-- Tenants; product_code is the prefix for generated product codes
CREATE TABLE IF NOT EXISTS company (
    companyid TEXT PRIMARY KEY,
    company_name TEXT NOT NULL,
    product_code TEXT NOT NULL DEFAULT 'P',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS kategori (
    kategoriid TEXT PRIMARY KEY,
    kategorinama TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Products; status 1 = active, anything else soft-deleted
CREATE TABLE IF NOT EXISTS produk (
    produkid TEXT PRIMARY KEY,
    produkkode TEXT NOT NULL,
    companyid TEXT NOT NULL,
    namaproduk TEXT NOT NULL,
    kategoriid TEXT,
    jenis INTEGER NOT NULL DEFAULT 1,     -- 1 = physical, 2 = digital
    deskripsi_produk TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Variants; every product gets one default variant at creation
CREATE TABLE IF NOT EXISTS varian (
    varianid TEXT PRIMARY KEY,
    produkid TEXT NOT NULL REFERENCES produk(produkid) ON DELETE CASCADE,
    sku TEXT NOT NULL,
    stok INTEGER NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 1,
    deskripsi TEXT NOT NULL DEFAULT '',
    produkfoto TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS varianharga (
    varianid TEXT PRIMARY KEY REFERENCES varian(varianid) ON DELETE CASCADE,
    harga_beli REAL NOT NULL,
    harga_jual REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    userid TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    avatar TEXT NOT NULL DEFAULT '',
    role_id INTEGER NOT NULL DEFAULT 1,
    status INTEGER NOT NULL DEFAULT 1,    -- 1 = active
    created_at TEXT DEFAULT (datetime('now'))
);

-- Session tokens issued at login
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,             -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,           -- short key for fast lookup
    user_id TEXT NOT NULL REFERENCES users(userid) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,                      -- NULL = never
    last_used_at TEXT
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_produk_company ON produk(companyid);
CREATE INDEX IF NOT EXISTS idx_produk_kategori ON produk(kategoriid);
CREATE INDEX IF NOT EXISTS idx_varian_produk ON varian(produkid);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_user ON tokens(user_id);

-- Codes are unique per company among active products only; a soft-deleted
-- code may be reissued by the generator
CREATE UNIQUE INDEX IF NOT EXISTS idx_produk_code_active
    ON produk(companyid, produkkode) WHERE status = 1;
"#;
