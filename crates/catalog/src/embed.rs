//! Streaming-player embed markup.

use metalagent_config::EmbedConfig;

/// Player URL for an album id.
pub fn embed_url(album_id: &str, config: &EmbedConfig) -> String {
    format!("{}{}", config.url_prefix, album_id)
}

/// An `<iframe>` embedding the player for `album_id`.
pub fn album_embed(album_id: &str, config: &EmbedConfig) -> String {
    format!(
        r#"<iframe src="{}" width="{}" height="{}" frameborder="0" allowtransparency="true" allow="encrypted-media"></iframe>"#,
        embed_url(album_id, config),
        config.width,
        config.height
    )
}
