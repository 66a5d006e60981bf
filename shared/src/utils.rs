/// Hex md5 of `bytes`, used to detect when a corpus changed under a persisted index.
pub fn content_fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
