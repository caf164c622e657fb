use super::*;

fn jpeg_bytes(n: usize) -> Vec<u8> {
    vec![0xab; n]
}

#[tokio::test(start_paused = true)]
async fn put_then_get_returns_the_same_bytes_within_ttl() {
    let mut store = ShareStore::new();
    let receipt = store.put(jpeg_bytes(128), "image/jpeg").unwrap();
    assert_eq!(receipt.ttl_seconds, 600);
    assert_eq!(receipt.token.len(), 22);
    assert!(receipt.token.chars().all(|c| c.is_ascii_alphanumeric()));

    let shared = store.get(&receipt.token).unwrap();
    assert_eq!(shared.bytes, jpeg_bytes(128));
    assert_eq!(shared.mime, "image/jpeg");
    assert!(shared.remaining_ttl_seconds <= 600 && shared.remaining_ttl_seconds > 590);
}

#[tokio::test(start_paused = true)]
async fn remaining_ttl_counts_down() {
    let mut store = ShareStore::new();
    let receipt = store.put(jpeg_bytes(16), "image/png").unwrap();
    tokio::time::advance(Duration::from_secs(45)).await;
    let shared = store.get(&receipt.token).unwrap();
    assert_eq!(shared.remaining_ttl_seconds, 555);
}

#[tokio::test(start_paused = true)]
async fn expired_entries_report_expired_then_not_found() {
    let mut store = ShareStore::new();
    let receipt = store.put(jpeg_bytes(16), "image/jpeg").unwrap();
    tokio::time::advance(SHARE_TTL + Duration::from_secs(1)).await;
    assert_eq!(store.get(&receipt.token), Err(ShareGetError::Expired));
    // Observation removed the entry.
    assert_eq!(store.get(&receipt.token), Err(ShareGetError::NotFound));
}

#[tokio::test]
async fn unknown_tokens_are_not_found() {
    let mut store = ShareStore::new();
    assert_eq!(store.get("nope"), Err(ShareGetError::NotFound));
}

#[tokio::test]
async fn put_rejects_bad_payloads() {
    let mut store = ShareStore::new();
    assert!(store.put(Vec::new(), "image/jpeg").is_err());
    assert!(store.put(jpeg_bytes(2_000_001), "image/jpeg").is_err());
    assert!(store.put(jpeg_bytes(16), "text/html").is_err());
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn expired_entries_are_swept_on_put() {
    let mut store = ShareStore::new();
    store.put(jpeg_bytes(1), "image/jpeg").unwrap();
    store.put(jpeg_bytes(2), "image/jpeg").unwrap();
    assert_eq!(store.len(), 2);
    tokio::time::advance(SHARE_TTL + Duration::from_secs(1)).await;
    store.put(jpeg_bytes(3), "image/jpeg").unwrap();
    assert_eq!(store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn len_includes_expired_entries_until_swept() {
    let mut store = ShareStore::new();
    let receipt = store.put(jpeg_bytes(16), "image/jpeg").unwrap();
    tokio::time::advance(SHARE_TTL + Duration::from_secs(1)).await;
    // Nothing sweeps until a put or an observing get.
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&receipt.token), Err(ShareGetError::Expired));
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn store_caps_entries_by_evicting_the_oldest() {
    let mut store = ShareStore::new();
    let first = store.put(jpeg_bytes(1), "image/jpeg").unwrap();
    for _ in 0..200 {
        store.put(jpeg_bytes(8), "image/jpeg").unwrap();
    }
    assert_eq!(store.len(), 200);
    assert_eq!(store.get(&first.token), Err(ShareGetError::NotFound));
}

#[tokio::test]
async fn tokens_are_unique_across_puts() {
    let mut store = ShareStore::new();
    let a = store.put(jpeg_bytes(1), "image/jpeg").unwrap();
    let b = store.put(jpeg_bytes(1), "image/jpeg").unwrap();
    assert_ne!(a.token, b.token);
}
