//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core.

use blake3::Hasher;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash canónico de un `serde_json::Value`.
pub fn hash_value(value: &serde_json::Value) -> String {
    hash_str(&super::to_canonical_json(value))
}
