//! The public key of a derivation context.

use ic_bls12_381::G2Affine;

use crate::error::{Result, VetKdError};
use crate::hash::{hash_to_scalar_two_inputs, option_from_ctoption, G2AFFINE_BYTES};

/// Domain separator for offline sub-derivation of public keys.
const SUB_DERIVATION_DST: &str = "ic-vetkd-bls12-381-g2-context";

#[derive(Clone, Debug, Eq, PartialEq)]
/// A derived public key
///
/// Identifies one derivation context of the service's master key. Encrypted
/// vetKeys are verified against it, and IBE ciphertexts are encrypted to it,
/// possibly long before the matching vetKey is ever requested.
pub struct DerivedPublicKey {
    point: G2Affine,
}

impl From<DerivedPublicKey> for G2Affine {
    fn from(public_key: DerivedPublicKey) -> Self {
        public_key.point
    }
}

impl DerivedPublicKey {
    /// The length of the serialized encoding of this type
    pub const BYTES: usize = G2AFFINE_BYTES;

    /// Deserialize a derived public key
    ///
    /// Only the 96-byte compressed encoding is accepted. The bytes must
    /// decode to a point that is on the curve and torsion-free; anything
    /// else is rejected before it can reach the pairing checks.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let dpk_bytes: &[u8; Self::BYTES] = bytes
            .try_into()
            .map_err(|_| VetKdError::Deserialization("derived public key must be 96 bytes"))?;
        let point = option_from_ctoption(G2Affine::from_compressed(dpk_bytes))
            .ok_or(VetKdError::Deserialization("invalid G2 point"))?;
        Ok(Self { point })
    }

    /// Return the canonical byte encoding of this public key
    ///
    /// Deserializing and re-serializing a key always round-trips to the
    /// original bytes.
    pub fn serialize(&self) -> [u8; Self::BYTES] {
        self.point.to_compressed()
    }

    /// Derive a public key for a sub-context
    ///
    /// This is a deterministic, public-only transform: the same parent key
    /// and context bytes always produce the same child key, and no secret is
    /// required. It mirrors the derivation the service applies to the master
    /// secret, so a vetKey requested under `context` verifies against the key
    /// this returns.
    ///
    /// An empty context leaves the key unchanged, which is useful for
    /// deriving many sub-keys offline from a single fetched parent key.
    pub fn derive_sub_key(&self, context: &[u8]) -> Self {
        if context.is_empty() {
            return self.clone();
        }

        let offset = hash_to_scalar_two_inputs(&self.serialize(), context, SUB_DERIVATION_DST);

        let derived_key = G2Affine::from(self.point + G2Affine::generator() * offset);
        Self { point: derived_key }
    }

    pub(crate) fn point(&self) -> &G2Affine {
        &self.point
    }
}
