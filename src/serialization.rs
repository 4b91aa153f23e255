//! Serialization of fitted parameters.
//!
//! Fitted transformers, classifiers and pipelines expose their learned state
//! as plain `*Params` structs. This module turns those structs into bytes and
//! back, without coupling the fitted types to a particular on-disk format.

use std::error::Error;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (`Vec<f64>`, strings, scalars),
/// never views into a live [`Table`](crate::dataset::Table).
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

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

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        means: Vec<f64>,
        names: Vec<String>,
    }

    #[test]
    fn test_blanket_impl_roundtrip() {
        let params = Dummy {
            means: vec![1.5, -2.0],
            names: vec!["age".to_string(), "hours-per-week".to_string()],
        };
        let bytes = params.to_bytes().unwrap();
        let restored = Dummy::from_bytes(&bytes).unwrap();
        assert_eq!(params, restored);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = Dummy::from_bytes(&[0xff, 0xff, 0xff]);
        assert!(result.is_err());
    }
}
