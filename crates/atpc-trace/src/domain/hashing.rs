//! # Event & Merkle Hashing
//!
//! `hash(event) = SHA256(seq || "|" || ts || "|" || type || "|" ||
//! SHA256(canonical(data)) || "|" || prev)` where `prev` is the previous
//! event's hash, or [`GENESIS_PREV`] for `seq == 0`.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::entities::GENESIS_PREV;

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn hash_data(data: &Value) -> String {
    let canonical = atpc_identity::canonicalize(data).unwrap_or_default();
    sha256_hex(&canonical)
}

pub fn event_hash(seq: u64, ts: &str, event_type: &str, data: &Value, prev: Option<&str>) -> String {
    let data_hash = hash_data(data);
    let prev = prev.unwrap_or(GENESIS_PREV);
    let preimage = format!("{seq}|{ts}|{event_type}|{data_hash}|{prev}");
    sha256_hex(preimage.as_bytes())
}

/// A simple binary Merkle root over event hashes (given as hex strings). An
/// odd layer promotes its last leaf by hashing it with itself, rather than
/// padding with zero.
pub fn merkle_root(leaf_hashes: &[String]) -> String {
    if leaf_hashes.is_empty() {
        return sha256_hex(&[]);
    }
    let mut layer: Vec<Vec<u8>> = leaf_hashes
        .iter()
        .map(|h| hex::decode(h).unwrap_or_default())
        .collect();

    while layer.len() > 1 {
        if layer.len() % 2 == 1 {
            let last = layer.last().unwrap().clone();
            layer.push(last);
        }
        let mut next = Vec::with_capacity(layer.len() / 2);
        for pair in layer.chunks(2) {
            let mut hasher = Sha256::new();
            hasher.update(&pair[0]);
            hasher.update(&pair[1]);
            next.push(hasher.finalize().to_vec());
        }
        layer = next;
    }
    hex::encode(&layer[0])
}
