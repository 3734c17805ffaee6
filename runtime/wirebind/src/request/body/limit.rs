use ubyte::{ByteUnit, ToByteUnit};

/// How large a request body is allowed to get before buffering gives up.
///
/// Defaults to 2 MB. See [`BufferedBody`](super::BufferedBody).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySizeLimit {
    Enabled {
        /// Bodies strictly larger than this are rejected.
        max_size: ByteUnit,
    },
    /// Buffer bodies of any size.
    Disabled,
}

impl Default for BodySizeLimit {
    fn default() -> Self {
        Self::Enabled {
            max_size: 2.megabytes(),
        }
    }
}
