use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use vidtube_core::AppError;
use vidtube_core::validation::non_blank;
use vidtube_models::videos::VIDEO_COLUMNS;
use vidtube_models::{
    CreatePlaylistDto, Playlist, PlaylistId, PlaylistWithVideos, UpdatePlaylistDto, UserId,
    Video, VideoId, authorize_owner,
};

const PLAYLIST_COLUMNS: &str =
    "id, owner_id, name, description, is_private, created_at, updated_at";

pub struct PlaylistService;

impl PlaylistService {
    async fn find(db: &PgPool, playlist_id: PlaylistId) -> Result<Option<Playlist>, AppError> {
        let sql = format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1");
        let playlist = sqlx::query_as::<_, Playlist>(&sql)
            .bind(playlist_id)
            .fetch_optional(db)
            .await?;
        Ok(playlist)
    }

    async fn find_owned(
        db: &PgPool,
        playlist_id: PlaylistId,
        caller: UserId,
    ) -> Result<Playlist, AppError> {
        authorize_owner(Self::find(db, playlist_id).await?, caller)
    }

    #[instrument(skip(db))]
    pub async fn create(
        db: &PgPool,
        owner_id: UserId,
        dto: CreatePlaylistDto,
    ) -> Result<Playlist, AppError> {
        let sql = format!(
            "INSERT INTO playlists (owner_id, name, description, is_private)
             VALUES ($1, $2, $3, $4)
             RETURNING {PLAYLIST_COLUMNS}"
        );
        let playlist = sqlx::query_as::<_, Playlist>(&sql)
            .bind(owner_id)
            .bind(dto.name.trim())
            .bind(dto.description.as_deref().map(str::trim).unwrap_or_default())
            .bind(dto.is_private.unwrap_or(false))
            .fetch_one(db)
            .await?;

        tracing::info!(playlist_id = %playlist.id, "Playlist created");
        Ok(playlist)
    }

    /// A private playlist is only visible to its owner. Videos the viewer
    /// cannot watch (unpublished, not theirs) are left out.
    #[instrument(skip(db))]
    pub async fn get(
        db: &PgPool,
        playlist_id: PlaylistId,
        viewer: Option<UserId>,
    ) -> Result<PlaylistWithVideos, AppError> {
        let playlist = Self::find(db, playlist_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Playlist not found")))?;

        if playlist.is_private && viewer != Some(playlist.owner_id) {
            return Err(AppError::forbidden(anyhow!("This playlist is private")));
        }

        let columns = VIDEO_COLUMNS
            .split(", ")
            .map(|c| format!("v.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {columns} FROM playlist_videos pv
             JOIN videos v ON v.id = pv.video_id
             WHERE pv.playlist_id = $1 AND (v.is_published OR v.owner_id = $2)
             ORDER BY pv.added_at"
        );
        let videos = sqlx::query_as::<_, Video>(&sql)
            .bind(playlist_id)
            .bind(viewer)
            .fetch_all(db)
            .await?;

        Ok(PlaylistWithVideos { playlist, videos })
    }

    /// Public playlists of the user with the given username.
    #[instrument(skip(db))]
    pub async fn list_public_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Vec<Playlist>, AppError> {
        let owner_id = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE username = $1")
            .bind(username.trim().to_lowercase())
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        let sql = format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists
             WHERE owner_id = $1 AND NOT is_private
             ORDER BY created_at DESC"
        );
        let playlists = sqlx::query_as::<_, Playlist>(&sql)
            .bind(owner_id)
            .fetch_all(db)
            .await?;
        Ok(playlists)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        playlist_id: PlaylistId,
        caller: UserId,
        dto: UpdatePlaylistDto,
    ) -> Result<Playlist, AppError> {
        Self::find_owned(db, playlist_id, caller).await?;

        let sql = format!(
            "UPDATE playlists
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAYLIST_COLUMNS}"
        );
        let playlist = sqlx::query_as::<_, Playlist>(&sql)
            .bind(playlist_id)
            .bind(non_blank(dto.name))
            .bind(non_blank(dto.description))
            .fetch_one(db)
            .await?;
        Ok(playlist)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, playlist_id: PlaylistId, caller: UserId) -> Result<(), AppError> {
        Self::find_owned(db, playlist_id, caller).await?;

        sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(playlist_id)
            .execute(db)
            .await?;

        tracing::info!(%playlist_id, "Playlist deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn toggle_privacy(
        db: &PgPool,
        playlist_id: PlaylistId,
        caller: UserId,
    ) -> Result<Playlist, AppError> {
        Self::find_owned(db, playlist_id, caller).await?;

        let sql = format!(
            "UPDATE playlists SET is_private = NOT is_private, updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAYLIST_COLUMNS}"
        );
        let playlist = sqlx::query_as::<_, Playlist>(&sql)
            .bind(playlist_id)
            .fetch_one(db)
            .await?;
        Ok(playlist)
    }

    #[instrument(skip(db))]
    pub async fn add_video(
        db: &PgPool,
        playlist_id: PlaylistId,
        video_id: VideoId,
        caller: UserId,
    ) -> Result<PlaylistWithVideos, AppError> {
        Self::find_owned(db, playlist_id, caller).await?;

        let video_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
                .bind(video_id)
                .fetch_one(db)
                .await?;
        if !video_exists {
            return Err(AppError::not_found(anyhow!("Video not found")));
        }

        let inserted = sqlx::query(
            "INSERT INTO playlist_videos (playlist_id, video_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(db)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::conflict(anyhow!(
                "Video is already in this playlist"
            )));
        }

        Self::touch(db, playlist_id).await?;
        Self::get(db, playlist_id, Some(caller)).await
    }

    #[instrument(skip(db))]
    pub async fn remove_video(
        db: &PgPool,
        playlist_id: PlaylistId,
        video_id: VideoId,
        caller: UserId,
    ) -> Result<PlaylistWithVideos, AppError> {
        Self::find_owned(db, playlist_id, caller).await?;

        let removed =
            sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
                .bind(playlist_id)
                .bind(video_id)
                .execute(db)
                .await?
                .rows_affected();

        if removed == 0 {
            return Err(AppError::not_found(anyhow!("Video is not in this playlist")));
        }

        Self::touch(db, playlist_id).await?;
        Self::get(db, playlist_id, Some(caller)).await
    }

    async fn touch(db: &PgPool, playlist_id: PlaylistId) -> Result<(), AppError> {
        sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
            .bind(playlist_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
