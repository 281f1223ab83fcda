//! Participant identities
//!
//! Providers, traders and the params authority are identified by bech32
//! account addresses (`<prefix>1<data><checksum>`). The ledger never stores or
//! compares raw strings it has not pushed through an [`AddressCodec`] first.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MAX_ADDRESS_LEN: usize = 90;
const MAX_PAYLOAD_BYTES: usize = 255;

/// Address parsing failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address string is not allowed")]
    Empty,

    #[error("address exceeds {max} characters")]
    TooLong { max: usize },

    #[error("address mixes upper and lower case")]
    MixedCase,

    #[error("invalid bech32 prefix: expected {expected}, got {found}")]
    WrongPrefix { expected: String, found: String },

    #[error("malformed bech32 address: {0}")]
    Malformed(String),

    #[error("address payload must be 1..={max} bytes, got {len}")]
    InvalidLength { len: usize, max: usize },
}

/// A well-formed account address in canonical (lowercase) form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Converts between textual account addresses and their raw bytes
pub trait AddressCodec {
    /// Parse and validate a textual address, returning its raw bytes
    fn decode(&self, text: &str) -> Result<Vec<u8>, AddressError>;

    /// Render raw address bytes as a textual address
    fn encode(&self, bytes: &[u8]) -> Result<Address, AddressError>;

    /// Validate a textual address and return it in canonical form
    fn validate(&self, text: &str) -> Result<Address, AddressError> {
        let bytes = self.decode(text)?;
        self.encode(&bytes)
    }
}

/// bech32 codec bound to a single human-readable prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32Codec {
    prefix: String,
}

impl Bech32Codec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_lowercase(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl AddressCodec for Bech32Codec {
    fn decode(&self, text: &str) -> Result<Vec<u8>, AddressError> {
        if text.is_empty() {
            return Err(AddressError::Empty);
        }
        if text.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong {
                max: MAX_ADDRESS_LEN,
            });
        }
        let has_lower = text.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = text.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(AddressError::MixedCase);
        }

        let checked = CheckedHrpstring::new::<Bech32>(text)
            .map_err(|err| AddressError::Malformed(err.to_string()))?;
        let found = checked.hrp().as_str().to_ascii_lowercase();
        if found != self.prefix {
            return Err(AddressError::WrongPrefix {
                expected: self.prefix.clone(),
                found,
            });
        }

        let bytes: Vec<u8> = checked.byte_iter().collect();
        check_payload_len(bytes.len())?;
        Ok(bytes)
    }

    fn encode(&self, bytes: &[u8]) -> Result<Address, AddressError> {
        check_payload_len(bytes.len())?;
        let hrp = Hrp::parse(&self.prefix).map_err(|err| AddressError::Malformed(err.to_string()))?;
        let out = bech32::encode::<Bech32>(hrp, bytes)
            .map_err(|err| AddressError::Malformed(err.to_string()))?;
        if out.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong {
                max: MAX_ADDRESS_LEN,
            });
        }
        Ok(Address(out))
    }
}

fn check_payload_len(len: usize) -> Result<(), AddressError> {
    if len == 0 || len > MAX_PAYLOAD_BYTES {
        return Err(AddressError::InvalidLength {
            len,
            max: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors produced by the BIP-173 python implementation
    const ONES: &str = "cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du";
    const TWOS: &str = "cosmos1qgpqyqszqgpqyqszqgpqyqszqgpqyqszrh8mx2";

    #[test]
    fn test_encode_matches_reference_vectors() {
        let codec = Bech32Codec::new("cosmos");
        assert_eq!(codec.encode(&[1u8; 20]).unwrap().as_str(), ONES);
        assert_eq!(codec.encode(&[2u8; 20]).unwrap().as_str(), TWOS);
    }

    #[test]
    fn test_decode_reference_vector() {
        let codec = Bech32Codec::new("cosmos");
        assert_eq!(codec.decode(ONES).unwrap(), vec![1u8; 20]);
    }

    #[test]
    fn test_uppercase_is_canonicalized() {
        let codec = Bech32Codec::new("cosmos");
        let upper = ONES.to_ascii_uppercase();
        assert_eq!(codec.validate(&upper).unwrap().as_str(), ONES);
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        let codec = Bech32Codec::new("cosmos");

        assert_eq!(codec.validate(""), Err(AddressError::Empty));
        assert!(matches!(codec.validate("foo"), Err(AddressError::Malformed(_))));
        assert!(matches!(
            codec.validate("osmo1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du"),
            Err(AddressError::WrongPrefix { .. })
        ));
        assert_eq!(
            codec.validate("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7dU"),
            Err(AddressError::MixedCase)
        );
        // Bad checksum, then a character outside the data alphabet
        assert!(matches!(
            codec.validate("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7dv"),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            codec.validate("cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgbjnp7du"),
            Err(AddressError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_empty_payload() {
        let codec = Bech32Codec::new("cosmos");
        assert!(matches!(
            codec.encode(&[]),
            Err(AddressError::InvalidLength { len: 0, .. })
        ));
    }
}
