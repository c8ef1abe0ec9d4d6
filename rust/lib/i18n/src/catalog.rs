use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::{debug, warn};

use worklens_core::Lang;

/// Translation catalog — one nested JSON dictionary per language.
///
/// The catalog scans a directory for `{lang}.json` files at startup.
/// A missing or unparseable file becomes an empty dictionary for that
/// language (with a warning in [`LoadReport`]); a bad translation
/// deploy must never keep the server from starting.
///
/// Lookups are total: the fallback chain is requested language →
/// English → the literal key, so a missing translation shows up as a
/// visibly broken key instead of an empty page element.
pub struct Catalog {
    dir: PathBuf,
    tables: RwLock<HashMap<Lang, Value>>,
}

/// Structured outcome of a catalog load, for startup diagnostics.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// (language, number of leaf strings) for each loaded file.
    pub loaded: Vec<(Lang, usize)>,
    /// (language, reason) for each file that fell back to empty.
    pub errors: Vec<(Lang, String)>,
}

impl LoadReport {
    /// Total number of leaf strings across all languages.
    pub fn total_entries(&self) -> usize {
        self.loaded.iter().map(|(_, n)| n).sum()
    }
}

impl Catalog {
    /// Load `{lang}.json` for every supported language from `dir`.
    pub fn load(dir: &Path) -> (Self, LoadReport) {
        let mut tables = HashMap::new();
        let mut report = LoadReport::default();
        for lang in Lang::ALL {
            let table = load_table(dir, lang, &mut report);
            tables.insert(lang, table);
        }
        let catalog = Self {
            dir: dir.to_path_buf(),
            tables: RwLock::new(tables),
        };
        (catalog, report)
    }

    /// Re-read all translation files and atomically swap the table.
    /// Intended for development and administrative use.
    pub fn reload(&self) -> LoadReport {
        let mut report = LoadReport::default();
        let mut tables = HashMap::new();
        for lang in Lang::ALL {
            tables.insert(lang, load_table(&self.dir, lang, &mut report));
        }
        *self.tables.write().unwrap_or_else(|e| e.into_inner()) = tables;
        debug!("translation catalog reloaded: {} entries", report.total_entries());
        report
    }

    /// Look up a dotted key (`"nav.home"`) in the given language.
    ///
    /// Falls back to English, then to the literal key. Never fails.
    pub fn lookup(&self, key: &str, lang: Lang) -> String {
        // A panic mid-reload poisons the lock; lookups keep serving
        // whichever table is in place rather than failing the render.
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        if let Some(s) = tables.get(&lang).and_then(|t| resolve_key(t, key)) {
            return s.to_string();
        }
        if lang != Lang::En {
            if let Some(s) = tables.get(&Lang::En).and_then(|t| resolve_key(t, key)) {
                return s.to_string();
            }
        }
        key.to_string()
    }
}

/// Read and parse one language file; any failure yields an empty table.
fn load_table(dir: &Path, lang: Lang, report: &mut LoadReport) -> Value {
    let path = dir.join(format!("{}.json", lang.as_str()));
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            warn!("translation file {:?} unreadable: {}", path, e);
            report.errors.push((lang, e.to_string()));
            return Value::Object(serde_json::Map::new());
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(v) if v.is_object() => {
            report.loaded.push((lang, count_leaves(&v)));
            v
        }
        Ok(_) => {
            warn!("translation file {:?} is not a JSON object", path);
            report.errors.push((lang, "not a JSON object".into()));
            Value::Object(serde_json::Map::new())
        }
        Err(e) => {
            warn!("translation file {:?} invalid JSON: {}", path, e);
            report.errors.push((lang, e.to_string()));
            Value::Object(serde_json::Map::new())
        }
    }
}

/// Traverse a nested object by the dotted key; only a non-empty string
/// leaf counts as a match.
fn resolve_key<'a>(table: &'a Value, key: &str) -> Option<&'a str> {
    let mut node = table;
    for part in key.split('.') {
        node = node.as_object()?.get(part)?;
    }
    match node.as_str() {
        Some(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn count_leaves(v: &Value) -> usize {
    match v {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::String(_) => 1,
        _ => 0,
    }
}
