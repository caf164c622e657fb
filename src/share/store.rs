use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};
use std::time::Duration;

use tokio::time::Instant;

use crate::foundation::error::{BoothError, BoothResult};

/// Fixed lifetime of a shared image.
pub const SHARE_TTL: Duration = Duration::from_secs(600);
/// Maximum accepted payload size in bytes.
const MAX_PAYLOAD_BYTES: usize = 2_000_000;
/// Maximum live entries; the oldest is evicted beyond this.
const MAX_ENTRIES: usize = 200;
/// Token length in characters.
const TOKEN_LEN: usize = 22;

const ALLOWED_MIMES: [&str; 2] = ["image/jpeg", "image/png"];
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Receipt from a successful [`ShareStore::put`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareReceipt {
    /// Opaque 22-character alphanumeric token.
    pub token: String,
    /// TTL granted to the entry, in seconds.
    pub ttl_seconds: u64,
}

/// A shared image fetched from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shared {
    /// The stored image bytes.
    pub bytes: Vec<u8>,
    /// The stored media type.
    pub mime: String,
    /// Whole seconds until expiry, never negative.
    pub remaining_ttl_seconds: u64,
}

/// Why a [`ShareStore::get`] returned nothing.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareGetError {
    /// No entry under that token.
    #[error("share token not found")]
    NotFound,
    /// The entry existed but its TTL has elapsed; it is now removed.
    #[error("share token expired")]
    Expired,
}

struct Entry {
    bytes: Vec<u8>,
    mime: String,
    expires_at: Instant,
    seq: u64,
}

/// In-memory expiring token -> image map fed by the JPEG share path.
///
/// TTL is enforced here, not by callers; time comes from `tokio::time`, so
/// paused-clock tests can cross the expiry window instantly.
pub struct ShareStore {
    entries: HashMap<String, Entry>,
    hasher: RandomState,
    seq: u64,
}

impl ShareStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hasher: RandomState::new(),
            seq: 0,
        }
    }

    /// Stored entry count. Expired entries still count until the next
    /// [`put`](Self::put) sweeps them or a [`get`](Self::get) observes them.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store image bytes under a fresh token with a fixed 10-minute TTL.
    ///
    /// Rejects payloads over 2 MB and media types other than JPEG/PNG. Expired
    /// entries are swept first; past 200 live entries the oldest is dropped.
    pub fn put(&mut self, bytes: Vec<u8>, mime: &str) -> BoothResult<ShareReceipt> {
        if bytes.is_empty() {
            return Err(BoothError::share("payload is empty"));
        }
        if bytes.len() > MAX_PAYLOAD_BYTES {
            return Err(BoothError::share(format!(
                "payload of {} bytes exceeds the {MAX_PAYLOAD_BYTES} byte cap",
                bytes.len()
            )));
        }
        if !ALLOWED_MIMES.contains(&mime) {
            return Err(BoothError::share(format!(
                "unsupported media type '{mime}'"
            )));
        }

        let now = Instant::now();
        self.sweep_expired(now);
        while self.entries.len() >= MAX_ENTRIES {
            self.evict_oldest();
        }

        let token = self.mint_token();
        self.seq += 1;
        self.entries.insert(
            token.clone(),
            Entry {
                bytes,
                mime: mime.to_string(),
                expires_at: now + SHARE_TTL,
                seq: self.seq,
            },
        );
        tracing::debug!(entries = self.entries.len(), "stored shared image");
        Ok(ShareReceipt {
            token,
            ttl_seconds: SHARE_TTL.as_secs(),
        })
    }

    /// Fetch the bytes under `token` with the whole seconds left before
    /// expiry. An expired entry is removed on observation.
    pub fn get(&mut self, token: &str) -> Result<Shared, ShareGetError> {
        let now = Instant::now();
        let Some(entry) = self.entries.get(token) else {
            return Err(ShareGetError::NotFound);
        };
        if entry.expires_at <= now {
            self.entries.remove(token);
            return Err(ShareGetError::Expired);
        }
        Ok(Shared {
            bytes: entry.bytes.clone(),
            mime: entry.mime.clone(),
            remaining_ttl_seconds: (entry.expires_at - now).as_secs(),
        })
    }

    fn sweep_expired(&mut self, now: Instant) {
        self.entries.retain(|_, e| e.expires_at > now);
    }

    fn evict_oldest(&mut self) {
        if let Some(token) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.seq)
            .map(|(t, _)| t.clone())
        {
            self.entries.remove(&token);
        }
    }

    /// 22 alphanumeric characters from a per-store randomly seeded hash mix.
    fn mint_token(&mut self) -> String {
        loop {
            let mut token = String::with_capacity(TOKEN_LEN);
            let mut round = 0u64;
            while token.len() < TOKEN_LEN {
                let mut h = self.hasher.build_hasher();
                h.write_u64(self.seq);
                h.write_u64(round);
                h.write_usize(token.len());
                let mut bits = h.finish();
                for _ in 0..10 {
                    if token.len() == TOKEN_LEN {
                        break;
                    }
                    let idx = (bits % TOKEN_ALPHABET.len() as u64) as usize;
                    token.push(TOKEN_ALPHABET[idx] as char);
                    bits /= TOKEN_ALPHABET.len() as u64;
                }
                round += 1;
            }
            if !self.entries.contains_key(&token) {
                return token;
            }
            self.seq += 1;
        }
    }
}

impl Default for ShareStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/store.rs"]
mod tests;
