//! Object store implementations.

pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::{MemoryObjectStore, StoreOp, StoreOperation};
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in copy sources. Path separators stay literal.
pub(crate) const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URL-encode an object key for use in a copy source or URL path.
pub(crate) fn encode_key(key: &str) -> String {
    percent_encoding::utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_keeps_separators() {
        assert_eq!(encode_key("photos/my cat.png"), "photos/my%20cat.png");
        assert_eq!(encode_key("a+b/ü.txt"), "a%2Bb/%C3%BC.txt");
    }
}
