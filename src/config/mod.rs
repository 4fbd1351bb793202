use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .rplotrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                map.extend(parse_rc(BufReader::new(file)));
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn r_binary(&self) -> String {
        self.get("R_BINARY").unwrap_or_else(|| "R".into())
    }

    pub fn curve(&self) -> String {
        self.get("RPLOT_CURVE").unwrap_or_else(|| "square".into())
    }

    pub fn display_device(&self) -> String {
        self.get("RPLOT_DISPLAY_DEVICE").unwrap_or_else(|| "x11".into())
    }
}

fn parse_rc(reader: impl BufRead) -> Vec<(String, String)> {
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &["R_BINARY", "RPLOT_CURVE", "RPLOT_DISPLAY_DEVICE"];

    KEYS.contains(&k) || k.starts_with("RPLOT_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("rplot").join(".rplotrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("R_BINARY".into(), "R".into());
    m.insert("RPLOT_CURVE".into(), "square".into());
    m.insert("RPLOT_DISPLAY_DEVICE".into(), "x11".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_lines_skip_comments_and_blanks() {
        let text = "# curve to draw\n\nRPLOT_CURVE = cubic\nR_BINARY=/opt/R/bin/R\nnot a pair\n";
        let pairs = parse_rc(text.as_bytes());
        assert_eq!(
            pairs,
            vec![
                ("RPLOT_CURVE".to_string(), "cubic".to_string()),
                ("R_BINARY".to_string(), "/opt/R/bin/R".to_string()),
            ]
        );
    }

    #[test]
    fn value_may_contain_equals() {
        let pairs = parse_rc("RPLOT_CURVE=ifelse(x==0, 1, x)".as_bytes());
        assert_eq!(pairs[0].1, "ifelse(x==0, 1, x)");
    }

    #[test]
    fn only_known_or_prefixed_keys_are_taken_from_env() {
        assert!(is_config_key("R_BINARY"));
        assert!(is_config_key("RPLOT_ANYTHING"));
        assert!(!is_config_key("HOME"));
        assert!(!is_config_key("R_HOME"));
    }

    #[test]
    fn defaults_cover_every_known_key() {
        let m = default_map();
        assert_eq!(m.get("RPLOT_CURVE").map(String::as_str), Some("square"));
        assert_eq!(m.get("RPLOT_DISPLAY_DEVICE").map(String::as_str), Some("x11"));
    }
}
