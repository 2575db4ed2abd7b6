//! Resolves queries to tracks with yt-dlp.

use std::time::Duration;

use itertools::Itertools;
use tracing::instrument;

use super::TrackInfo;
use crate::error::EngineError;

/// Fields printed by yt-dlp, one per line, in this order.
const PRINT_FIELDS: [&str; 4] = ["title", "duration", "channel", "webpage_url"];

/// What yt-dlp prints for a missing field.
const NOT_AVAILABLE: &str = "NA";

/// The yt-dlp target for `query`: links are used as-is, anything else is searched.
pub fn target(query: &str) -> String {
    match url::Url::parse(query) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => query.to_string(),
        _ => format!("ytsearch1:{query}"),
    }
}

/// Find the best match for `query`.
/// `Ok(None)` if there were no results.
#[instrument(level = "debug", err)]
pub async fn resolve(query: &str) -> Result<Option<TrackInfo>, EngineError> {
    let results = search(&target(query)).await?;
    Ok(results.into_iter().next())
}

/// Helper function that actually calls yt-dlp.
async fn search(uri: &str) -> Result<Vec<TrackInfo>, EngineError> {
    let mut ytdlp_args = vec!["--no-warnings", "--ignore-config", "--no-playlist"];
    for field in PRINT_FIELDS {
        ytdlp_args.extend(["--print", field]);
    }
    ytdlp_args.push(uri);

    let ytdlp_output = tokio::process::Command::new("yt-dlp")
        .args(ytdlp_args)
        .stdin(std::process::Stdio::null())
        .output()
        .await?;

    if !ytdlp_output.status.success() {
        let stderr = String::from_utf8_lossy(&ytdlp_output.stderr);
        return Err(EngineError::SearchFailed {
            reason: stderr.trim().to_string(),
        });
    }

    let out_string = String::from_utf8(ytdlp_output.stdout)?;
    Ok(parse_search_output(&out_string))
}

/// Parse yt-dlp output printed with [PRINT_FIELDS].
/// A trailing incomplete group is dropped.
pub fn parse_search_output(output: &str) -> Vec<TrackInfo> {
    let field = |s: &str| {
        let s = s.trim();
        (!s.is_empty() && s != NOT_AVAILABLE).then(|| s.to_string())
    };

    output
        .lines()
        .tuples()
        .map(|(title, duration, channel, url)| TrackInfo {
            title: field(title),
            duration: field(duration)
                .and_then(|d| d.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
            channel: field(channel),
            url: field(url),
        })
        .collect()
}
