//! Module for key/value test records.
//!
//! This module provides the [`KeyValue`] struct, which pairs a key and a value
//! with an ordered collection of [`Headers`]. Tests build these to describe
//! records they send to the embedded cluster, or receive them back to assert
//! against.
//!
//! It includes the following submodules:
//! * [`headers`]: Defines [`Header`] and [`Headers`], the ordered header
//!   multi-map with "last header wins" lookup.
//! * [`charset`]: Defines [`Charset`], used to turn header text into bytes.
//! * [`error`]: Defines [`EncodingError`].
//!
//! # Example
//! ```
//! use kafka_harness::record::{Charset, KeyValue};
//!
//! let mut record = KeyValue::new("k", "v");
//! record
//!     .add_header("h", "v1", Charset::Utf8)?
//!     .add_header("h", "v2", Charset::Utf8)?;
//!
//! assert_eq!(record.headers().last_header("h").unwrap().value(), b"v2");
//! # Ok::<(), kafka_harness::record::EncodingError>(())
//! ```

pub mod charset;
pub mod error;
pub mod headers;

pub use self::charset::Charset;
pub use self::error::EncodingError;
pub use self::headers::{Header, Headers};

use serde::{Deserialize, Serialize};

/// Where a consumed record was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

impl KeyValueMetadata {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
        }
    }
}

/// A record key and value together with its headers.
///
/// Key and value are fixed at construction; headers can be appended later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
    headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<KeyValueMetadata>,
}

impl<K, V> KeyValue<K, V> {
    /// Creates a record without headers.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::record::KeyValue;
    ///
    /// let record = KeyValue::new("k", "v");
    /// assert!(record.headers().is_empty());
    /// assert!(record.headers().last_header("anything").is_none());
    /// ```
    pub fn new(key: K, value: V) -> Self {
        Self::with_headers(key, value, Headers::new())
    }

    /// Creates a record that takes ownership of `headers`.
    ///
    /// Clone the collection first if the caller still needs it.
    pub fn with_headers(key: K, value: V, headers: Headers) -> Self {
        Self {
            key,
            value,
            headers,
            metadata: None,
        }
    }

    /// Attaches the topic, partition and offset a record was consumed from.
    pub fn with_metadata(mut self, metadata: KeyValueMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Appends a header whose value is `value` encoded with `charset`.
    ///
    /// `charset` is either a [`Charset`] or a charset label such as
    /// `"ISO-8859-1"`. Only an unknown label fails; characters the charset
    /// cannot represent are replaced with `?`. Existing headers with the same
    /// name are kept; lookups by name return the one added last.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::record::{EncodingError, KeyValue};
    ///
    /// let mut record = KeyValue::new("k", "v");
    /// record.add_header("h", "é", "US-ASCII")?;
    /// assert_eq!(record.headers().last_header("h").unwrap().value(), b"?");
    ///
    /// let err = record.add_header("h", "v", "EBCDIC").unwrap_err();
    /// assert_eq!(err, EncodingError::UnsupportedCharset("EBCDIC".to_string()));
    /// # Ok::<(), EncodingError>(())
    /// ```
    pub fn add_header<C>(
        &mut self,
        name: impl Into<String>,
        value: &str,
        charset: C,
    ) -> Result<&mut Self, EncodingError>
    where
        C: TryInto<Charset>,
        EncodingError: From<C::Error>,
    {
        let charset = charset.try_into()?;
        self.headers.add(Header::new(name, charset.encode(value)));
        Ok(self)
    }

    /// Appends a header with an already encoded value.
    pub fn add_raw_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.headers.add(Header::new(name, value));
        self
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn metadata(&self) -> Option<&KeyValueMetadata> {
        self.metadata.as_ref()
    }

    pub fn into_parts(self) -> (K, V, Headers) {
        (self.key, self.value, self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_header_preserves_value() {
        let mut record = KeyValue::new("k", "v");
        record
            .add_header("headerName", "headerValue", Charset::Utf8)
            .unwrap();

        assert_eq!(
            record.headers().last_header("headerName").unwrap().value(),
            "headerValue".as_bytes()
        );
    }

    #[test]
    fn test_headers_given_on_construction() {
        let mut headers = Headers::new();
        headers.add(Header::new("headerName", "headerValue"));
        let record = KeyValue::with_headers("k", "v", headers);

        assert_eq!(
            record.headers().last_header("headerName").unwrap().value(),
            b"headerValue"
        );
    }

    #[test]
    fn test_add_header_replaces_unmappable_characters() {
        let mut record = KeyValue::new(1u32, "v".to_string());
        record.add_header("h", "naïve", Charset::UsAscii).unwrap();

        assert_eq!(record.headers().last_header("h").unwrap().value(), b"na?ve");
    }

    #[test]
    fn test_add_header_unknown_label_leaves_headers_untouched() {
        let mut record = KeyValue::new(1u32, "v".to_string());
        let result = record.add_header("h", "value", "x-mac-roman");

        assert!(matches!(
            result,
            Err(EncodingError::UnsupportedCharset(label)) if label == "x-mac-roman"
        ));
        assert!(record.headers().is_empty());
    }

    #[test]
    fn test_metadata() {
        let record =
            KeyValue::new("k", "v").with_metadata(KeyValueMetadata::new("orders", 2, 41));
        let metadata = record.metadata().unwrap();
        assert_eq!(metadata.topic, "orders");
        assert_eq!(metadata.partition, 2);
        assert_eq!(metadata.offset, 41);
    }

    #[test]
    fn test_into_parts() {
        let mut record = KeyValue::new("k", 7);
        record.add_raw_header("raw", vec![0u8, 1, 2]);
        let (key, value, headers) = record.into_parts();
        assert_eq!(key, "k");
        assert_eq!(value, 7);
        assert_eq!(headers.last_header("raw").unwrap().value(), &[0u8, 1, 2]);
    }
}
