//! Read-through on-disk JSON cache with a TTL, keyed by resource + id.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Envelope<T> {
    written_at_unix: u64,
    value: T,
}

fn cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("fpl-transfer-planner")
}

fn path_for(key: &str) -> PathBuf {
    cache_dir().join(format!("{key}.json"))
}

fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();
    f.read_to_string(&mut s).ok()?;
    Some(s)
}

fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Read `key` from disk if present and younger than `ttl`.
pub fn read<T: DeserializeOwned>(key: &str, ttl: Duration) -> Option<T> {
    let contents = try_read_to_string(&path_for(key))?;
    let envelope: Envelope<T> = serde_json::from_str(&contents).ok()?;
    let age = now_unix().saturating_sub(envelope.written_at_unix);
    if age >= ttl.as_secs() {
        return None;
    }
    Some(envelope.value)
}

/// Best-effort write; failures are swallowed, matching `spec.md` §5
/// ("cache writes do not block the primary response path").
pub fn write<T: Serialize>(key: &str, value: &T) {
    let envelope = Envelope {
        written_at_unix: now_unix(),
        value,
    };
    if let Ok(json) = serde_json::to_string(&envelope) {
        let _ = write_string(&path_for(key), &json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn unique_key(prefix: &str) -> String {
        format!("{prefix}-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    #[test]
    fn round_trips_within_ttl() {
        let key = unique_key("roundtrip");
        write(&key, &vec![1, 2, 3]);
        let read_back: Option<Vec<i32>> = read(&key, Duration::from_secs(60));
        assert_eq!(read_back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let key = unique_key("expired");
        write(&key, &42);
        let read_back: Option<i32> = read(&key, Duration::from_secs(0));
        assert_eq!(read_back, None);
    }

    #[test]
    fn missing_key_returns_none() {
        let read_back: Option<i32> = read(&unique_key("missing"), Duration::from_secs(60));
        assert_eq!(read_back, None);
    }
}
