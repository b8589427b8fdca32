//! SQL schema for the Verbum SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS books (
    name       TEXT PRIMARY KEY,
    code       TEXT NOT NULL,
    book_order INTEGER NOT NULL UNIQUE,
    testament  TEXT NOT NULL      -- 'OT' | 'NT'
);

CREATE TABLE IF NOT EXISTS translations (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    language         TEXT NOT NULL,
    is_public_domain INTEGER NOT NULL DEFAULT 1,
    license_info     TEXT
);

CREATE TABLE IF NOT EXISTS verses (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    translation_id TEXT NOT NULL,
    book           TEXT NOT NULL,
    book_order     INTEGER NOT NULL,
    chapter        INTEGER NOT NULL,
    verse          INTEGER NOT NULL,
    text           TEXT NOT NULL,
    UNIQUE (translation_id, book, chapter, verse)
);

CREATE INDEX IF NOT EXISTS verses_order_idx ON verses(translation_id, book_order, chapter, verse);

CREATE VIRTUAL TABLE IF NOT EXISTS verses_fts USING fts5(
    text,
    content = 'verses',
    content_rowid = 'id'
);

CREATE TRIGGER IF NOT EXISTS verses_ai AFTER INSERT ON verses BEGIN
    INSERT INTO verses_fts(rowid, text) VALUES (new.id, new.text);
END;
CREATE TRIGGER IF NOT EXISTS verses_ad AFTER DELETE ON verses BEGIN
    INSERT INTO verses_fts(verses_fts, rowid, text) VALUES ('delete', old.id, old.text);
END;
CREATE TRIGGER IF NOT EXISTS verses_au AFTER UPDATE ON verses BEGIN
    INSERT INTO verses_fts(verses_fts, rowid, text) VALUES ('delete', old.id, old.text);
    INSERT INTO verses_fts(rowid, text) VALUES (new.id, new.text);
END;

-- Tagged Hebrew/Greek words. Replaced wholesale per book on re-import.
CREATE TABLE IF NOT EXISTS source_words (
    book            TEXT NOT NULL,
    book_order      INTEGER NOT NULL,
    chapter         INTEGER NOT NULL,
    verse           INTEGER NOT NULL,
    position        INTEGER NOT NULL,
    original_text   TEXT,
    transliteration TEXT,
    gloss           TEXT,
    strong_number   TEXT,     -- canonical, e.g. 'H430'
    grammar_code    TEXT,
    PRIMARY KEY (book, chapter, verse, position)
);

CREATE INDEX IF NOT EXISTS source_words_strong_idx ON source_words(strong_number);

CREATE TABLE IF NOT EXISTS lexicon (
    strong_number       TEXT PRIMARY KEY,
    language            TEXT NOT NULL,   -- 'hebrew' | 'greek'
    original            TEXT NOT NULL,
    transliteration     TEXT,
    pronunciation       TEXT,
    definition          TEXT NOT NULL,
    extended_definition TEXT,
    derivation          TEXT
);

-- Upserted on the natural key; rebuilding never adds rows.
CREATE TABLE IF NOT EXISTS alignments (
    translation_id  TEXT NOT NULL,
    book            TEXT NOT NULL,
    chapter         INTEGER NOT NULL,
    verse           INTEGER NOT NULL,
    target_position INTEGER NOT NULL,
    target_word     TEXT NOT NULL,
    source_position INTEGER NOT NULL,
    confidence      REAL NOT NULL,
    PRIMARY KEY (translation_id, book, chapter, verse, target_position)
);

-- No uniqueness: several datasets may contribute the same link.
CREATE TABLE IF NOT EXISTS cross_references (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    source_book       TEXT NOT NULL,
    source_chapter    INTEGER NOT NULL,
    source_verse      INTEGER NOT NULL,
    target_book       TEXT NOT NULL,
    target_chapter    INTEGER NOT NULL,
    target_verse      INTEGER NOT NULL,
    target_book_order INTEGER NOT NULL,
    relationship_type TEXT,
    votes             INTEGER
);

CREATE INDEX IF NOT EXISTS cross_references_source_idx
    ON cross_references(source_book, source_chapter, source_verse);

CREATE TABLE IF NOT EXISTS commentary (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    source          TEXT NOT NULL,
    book            TEXT NOT NULL,
    chapter         INTEGER NOT NULL,
    reference_start INTEGER NOT NULL,
    reference_end   INTEGER NOT NULL,
    content         TEXT NOT NULL,
    CHECK (reference_end >= reference_start)
);

CREATE INDEX IF NOT EXISTS commentary_chapter_idx ON commentary(book, chapter);

CREATE VIRTUAL TABLE IF NOT EXISTS commentary_fts USING fts5(
    content,
    content = 'commentary',
    content_rowid = 'id'
);

CREATE TRIGGER IF NOT EXISTS commentary_ai AFTER INSERT ON commentary BEGIN
    INSERT INTO commentary_fts(rowid, content) VALUES (new.id, new.content);
END;
CREATE TRIGGER IF NOT EXISTS commentary_ad AFTER DELETE ON commentary BEGIN
    INSERT INTO commentary_fts(commentary_fts, rowid, content) VALUES ('delete', old.id, old.content);
END;
CREATE TRIGGER IF NOT EXISTS commentary_au AFTER UPDATE ON commentary BEGIN
    INSERT INTO commentary_fts(commentary_fts, rowid, content) VALUES ('delete', old.id, old.content);
    INSERT INTO commentary_fts(rowid, content) VALUES (new.id, new.content);
END;

PRAGMA user_version = 1;
";

/// Seeds the `books` table from the canon; run after [`SCHEMA`].
pub const SEED_BOOK: &str =
  "INSERT OR IGNORE INTO books (name, code, book_order, testament) VALUES (?1, ?2, ?3, ?4)";
