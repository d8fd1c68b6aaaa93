//! Template store - slap and taunt reply templates.
//!
//! Two newline-delimited files, each line carrying a `{nick}` placeholder.
//! Loaded once at startup, read-only afterwards; one template is drawn
//! uniformly at random per invocation.

use std::fs;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;
use tracing::info;

const NICK_PLACEHOLDER: &str = "{nick}";

pub struct TemplateStore {
    slaps: Vec<String>,
    taunts: Vec<String>,
}

impl TemplateStore {
    pub fn new(slaps: Vec<String>, taunts: Vec<String>) -> Self {
        Self { slaps, taunts }
    }

    pub fn load(slaps_path: &Path, taunts_path: &Path) -> io::Result<Self> {
        let slaps = read_lines(slaps_path)?;
        let taunts = read_lines(taunts_path)?;
        info!(
            slaps = slaps.len(),
            taunts = taunts.len(),
            "templates loaded"
        );
        Ok(Self::new(slaps, taunts))
    }

    /// Random slap line with the nickname substituted. `None` only when no
    /// templates were loaded.
    pub fn slap(&self, nick: &str) -> Option<String> {
        pick(&self.slaps, nick)
    }

    /// Random taunt line; the placeholder takes a possessive ("X's" or the
    /// default stand-in).
    pub fn taunt(&self, possessive: &str) -> Option<String> {
        pick(&self.taunts, possessive)
    }
}

fn pick(templates: &[String], nick: &str) -> Option<String> {
    let template = templates.choose(&mut rand::thread_rng())?;
    Some(template.replace(NICK_PLACEHOLDER, nick))
}

fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn substitutes_the_placeholder() {
        let store = TemplateStore::new(
            vec!["slaps {nick} with a trout".to_string()],
            vec!["{nick} jokes write themselves".to_string()],
        );
        assert_eq!(
            store.slap("bob").as_deref(),
            Some("slaps bob with a trout")
        );
        assert_eq!(
            store.taunt("bob's").as_deref(),
            Some("bob's jokes write themselves")
        );
    }

    #[test]
    fn empty_store_yields_nothing() {
        let store = TemplateStore::new(vec![], vec![]);
        assert!(store.slap("bob").is_none());
        assert!(store.taunt("bob's").is_none());
    }

    #[test]
    fn load_trims_and_skips_blank_lines() {
        let mut slaps = tempfile::NamedTempFile::new().unwrap();
        writeln!(slaps, "slaps {{nick}}\n\n  shoves {{nick}}  \n").unwrap();
        let mut taunts = tempfile::NamedTempFile::new().unwrap();
        writeln!(taunts, "{{nick}} code never compiles").unwrap();

        let store = TemplateStore::load(slaps.path(), taunts.path()).unwrap();
        assert_eq!(store.slaps.len(), 2);
        assert_eq!(store.slaps[1], "shoves {nick}");
        assert_eq!(store.taunts.len(), 1);
    }

    #[test]
    fn selection_always_comes_from_the_loaded_list() {
        let store = TemplateStore::new(
            vec!["a {nick}".to_string(), "b {nick}".to_string()],
            vec![],
        );
        for _ in 0..20 {
            let line = store.slap("x").unwrap();
            assert!(line == "a x" || line == "b x");
        }
    }
}
