//! Run configuration

use std::path::PathBuf;

/// Everything the process needs to run, assembled from the CLI arguments
/// with environment overrides for the template file locations.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity the bot signs in with.
    pub jid: String,
    pub password: String,
    /// URL shortener API endpoint and request signature.
    pub surl_api: String,
    pub surl_sig: String,
    /// Room to join and the nickname to use there.
    pub room: String,
    pub nick: String,
    pub slaps_file: PathBuf,
    pub taunts_file: PathBuf,
}

impl Config {
    pub fn new(
        jid: String,
        password: String,
        surl_api: String,
        surl_sig: String,
        room: String,
        nick: String,
    ) -> Self {
        Self {
            jid,
            password,
            surl_api,
            surl_sig,
            room,
            nick,
            slaps_file: path_from_env("MUCBOT_SLAPS_FILE", "templates/slaps.txt"),
            taunts_file: path_from_env("MUCBOT_TAUNTS_FILE", "templates/taunts.txt"),
        }
    }
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
