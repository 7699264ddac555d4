//! Percent-encoding of absolute paths for the `Path=` key of a `.trashinfo` file.
//!
//! Each `/`-separated segment is encoded on its own, leaving only the RFC 3986
//! unreserved set (`A-Z a-z 0-9 - _ . ~`) literal. `*` always comes out as `%2A`
//! and `~` always stays literal, whatever the underlying encoder considers safe.

use std::path::Path;

/// Encode a UTF-8 path string.
pub fn encode(path: &str) -> String {
    encode_bytes(path.as_bytes())
}

/// Encode a filesystem path using its raw OS bytes (non-UTF-8 names survive).
pub fn encode_path(path: &Path) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        encode_bytes(path.as_os_str().as_bytes())
    }
    #[cfg(not(unix))]
    {
        encode(&path.to_string_lossy().replace('\\', "/"))
    }
}

fn encode_bytes(bytes: &[u8]) -> String {
    bytes
        .split(|b| *b == b'/')
        .map(urlencoding::encode_binary)
        .collect::<Vec<_>>()
        .join("/")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Inverse of [`encode`]: percent-decode back to raw bytes.
pub fn decode(encoded: &str) -> Vec<u8> {
    urlencoding::decode_binary(encoded.as_bytes()).into_owned()
}

/// [`decode`], returning `None` when the result is not valid UTF-8.
pub fn decode_str(encoded: &str) -> Option<String> {
    String::from_utf8(decode(encoded)).ok()
}
