// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 byte strings
//!
//! Device nodes, symlinks and mount points are sent as `ay` with a trailing
//! NUL instead of as D-Bus strings. Non-UTF-8 bytes are replaced.

/// Text up to the first NUL.
pub fn decode_bytestring(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode an `aay` list such as `Filesystem.MountPoints` or
/// `Block.Symlinks`. Entries that decode to nothing are skipped.
pub fn decode_bytestring_list(values: &[Vec<u8>]) -> Vec<String> {
    values
        .iter()
        .map(|v| decode_bytestring(v))
        .filter(|s| !s.is_empty())
        .collect()
}
