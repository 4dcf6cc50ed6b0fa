//! Seeding helpers for tests against the migrated in-memory store.

use crate::db::create_test_pool;
use crate::models::{Annotation, EntityKind};
use sqlx::SqlitePool;

pub(crate) async fn pool() -> SqlitePool {
    create_test_pool().await.unwrap()
}

pub(crate) async fn insert_artist(pool: &SqlitePool, id: &str, name: &str) {
    sqlx::query(
        "INSERT INTO artists (id, name, order_artist_name, created_at, updated_at) \
         VALUES (?, ?, ?, 0, 0)",
    )
    .bind(id)
    .bind(name)
    .bind(name.to_lowercase())
    .execute(pool)
    .await
    .unwrap();
}

pub(crate) struct AlbumSeed {
    pub id: &'static str,
    pub name: &'static str,
    pub artist_id: Option<&'static str>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl AlbumSeed {
    pub fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            artist_id: None,
            min_year: None,
            max_year: None,
        }
    }

    pub fn artist(mut self, artist_id: &'static str) -> Self {
        self.artist_id = Some(artist_id);
        self
    }

    pub fn years(mut self, min: i32, max: i32) -> Self {
        self.min_year = Some(min);
        self.max_year = Some(max);
        self
    }
}

pub(crate) async fn insert_album(pool: &SqlitePool, seed: AlbumSeed) {
    sqlx::query(
        "INSERT INTO albums (id, name, order_album_name, artist_id, min_year, max_year, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, 0, 0)",
    )
    .bind(seed.id)
    .bind(seed.name)
    .bind(seed.name.to_lowercase())
    .bind(seed.artist_id)
    .bind(seed.min_year)
    .bind(seed.max_year)
    .execute(pool)
    .await
    .unwrap();
}

pub(crate) struct TrackSeed {
    pub id: &'static str,
    pub title: &'static str,
    pub file_name: String,
    pub album_id: Option<&'static str>,
    pub artist_id: Option<&'static str>,
    pub artist: Option<&'static str>,
    pub year: Option<i32>,
}

impl TrackSeed {
    pub fn new(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            file_name: format!("{id}.flac"),
            album_id: None,
            artist_id: None,
            artist: None,
            year: None,
        }
    }

    pub fn file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn album(mut self, album_id: &'static str) -> Self {
        self.album_id = Some(album_id);
        self
    }

    pub fn artist(mut self, artist_id: &'static str, name: &'static str) -> Self {
        self.artist_id = Some(artist_id);
        self.artist = Some(name);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

pub(crate) async fn insert_track(pool: &SqlitePool, seed: TrackSeed) {
    sqlx::query(
        "INSERT INTO media_files (id, title, order_title, file_name, album_id, artist_id, artist, year, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0)",
    )
    .bind(seed.id)
    .bind(seed.title)
    .bind(seed.title.to_lowercase())
    .bind(&seed.file_name)
    .bind(seed.album_id)
    .bind(seed.artist_id)
    .bind(seed.artist)
    .bind(seed.year)
    .execute(pool)
    .await
    .unwrap();
}

pub(crate) async fn annotate(
    pool: &SqlitePool,
    kind: EntityKind,
    item_id: &str,
    annotation: Annotation,
) {
    sqlx::query(
        "INSERT INTO annotations (item_id, item_type, play_count, play_date, rating, starred, starred_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item_id)
    .bind(kind.item_type())
    .bind(annotation.play_count)
    .bind(annotation.play_date)
    .bind(annotation.rating)
    .bind(annotation.starred)
    .bind(annotation.starred_at)
    .execute(pool)
    .await
    .unwrap();
}

pub(crate) fn starred() -> Annotation {
    Annotation {
        starred: true,
        starred_at: Some(1_700_000_000),
        ..Annotation::default()
    }
}

pub(crate) fn played(play_count: i64, play_date: Option<i64>) -> Annotation {
    Annotation {
        play_count,
        play_date,
        ..Annotation::default()
    }
}

pub(crate) async fn link_artist(pool: &SqlitePool, kind: EntityKind, item_id: &str, artist_id: &str) {
    sqlx::query("INSERT INTO item_artists (item_id, item_type, artist_id) VALUES (?, ?, ?)")
        .bind(item_id)
        .bind(kind.item_type())
        .bind(artist_id)
        .execute(pool)
        .await
        .unwrap();
}
