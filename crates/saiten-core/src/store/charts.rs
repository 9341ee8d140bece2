use super::{Store, decode, encode};
use crate::error::{Error, Result};
use crate::model::{Chart, Folder, Song, User};

// Reference data. Read-only from the core's perspective; the upsert
// methods exist for the external seeding collaborator (and tests).
impl Store {
    pub async fn upsert_chart(&self, chart: &Chart) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO charts (chart_id, song_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&chart.chart_id)
        .bind(chart.song_id)
        .bind(chart.game.to_string())
        .bind(chart.playtype.to_string())
        .bind(encode(chart)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_chart(&self, chart_id: &str) -> Result<Option<Chart>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM charts WHERE chart_id = ?1")
            .bind(chart_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    /// Like [`get_chart`](Store::get_chart), but a missing chart is the
    /// fatal consistency error it represents.
    pub async fn require_chart(&self, chart_id: &str) -> Result<Chart> {
        self.get_chart(chart_id)
            .await?
            .ok_or_else(|| Error::ChartNotFound(chart_id.to_string()))
    }

    pub async fn upsert_song(&self, song: &Song) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO songs (song_id, game, data) VALUES (?1, ?2, ?3)")
            .bind(song.song_id)
            .bind(song.game.to_string())
            .bind(encode(song)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_song(&self, song_id: i64) -> Result<Option<Song>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM songs WHERE song_id = ?1")
            .bind(song_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn require_song(&self, song_id: i64) -> Result<Song> {
        self.get_song(song_id)
            .await?
            .ok_or(Error::SongNotFound(song_id))
    }

    pub async fn upsert_folder(&self, folder: &Folder) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO folders (folder_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&folder.folder_id)
        .bind(folder.game.to_string())
        .bind(folder.playtype.to_string())
        .bind(encode(folder)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT data FROM folders WHERE folder_id = ?1")
                .bind(folder_id)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn upsert_user(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO users (user_id, data) VALUES (?1, ?2)")
            .bind(user.user_id)
            .bind(encode(user)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM users WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn require_user(&self, user_id: i64) -> Result<User> {
        self.get_user(user_id)
            .await?
            .ok_or(Error::UserNotFound(user_id))
    }
}
