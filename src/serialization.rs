//! Byte-level persistence of fitted parameters.
//!
//! Fitted components never serialize themselves directly: each one exposes a
//! plain-data `*Params` struct through `extract_params`/`from_params`, and
//! those params go through [`SerializableParams`]. File writes go through
//! [`write_atomic`] so a reader never observes a half-written artifact.

use std::fs;
use std::io;
use std::path::Path;

/// Parameter representations that can be serialized to and from bytes.
///
/// Implementors contain only plain data (vectors, maps, scalars).
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Write `bytes` to `path` through a sibling temporary file and a rename.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
