//! The ephemeral transport key pair vetKeys are encrypted to in transit.

use ic_bls12_381::{G1Affine, Scalar};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VetKdError};
use crate::hash::{scalar_from_bytes_be, scalar_to_bytes_be, G1AFFINE_BYTES, SCALAR_BYTES};

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
/// Secret key of the transport key pair
///
/// The service encrypts the requested vetKey to this key's public point, so
/// that only the holder of the secret scalar can recover it. The transport
/// layer is a replay/substitution defense as much as a confidentiality one:
/// generate a fresh key for every request and never reuse one across two
/// key-fetch operations.
pub struct TransportSecretKey {
    // Note that we Box the value here
    //
    // This is done because in Rust, even if the type does not derive Copy, any
    // object can be moved, and Rust assumes that memcpy is sufficient to move
    // any object. This move effectively creates a copy on the stack that we do
    // not know about and which will not be zeroized.
    //
    // By putting the value into a Box, the object can still be moved, but the move
    // will happen by copying the pointer value of the Box rather than the secret itself.
    //
    // See the zeroize docs (<https://docs.rs/zeroize/1.8.1/zeroize/#stackheap-zeroing-notes>)
    // for further information about this issue.
    secret_key: Box<Scalar>,
}

impl TransportSecretKey {
    /// The length of the seed accepted by [`TransportSecretKey::from_seed`]
    pub const SEED_BYTES: usize = 32;

    /// Create a fresh transport secret key
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        use pairing::group::ff::Field;
        let secret_key = Box::new(Scalar::random(rng));
        Self { secret_key }
    }

    /// Create a transport secret key from a 32-byte seed
    ///
    /// The seed must come from a cryptographically secure random number
    /// generator. Any 32-byte string is accepted; the scalar is produced by
    /// expanding the seed through a stream cipher rather than interpreting
    /// the bytes as an integer.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed_32_bytes: [u8; Self::SEED_BYTES] = seed
            .try_into()
            .map_err(|_| VetKdError::InvalidInputLength("seed must be exactly 32 bytes"))?;
        let rng = &mut ChaCha20Rng::from_seed(seed_32_bytes);
        use pairing::group::ff::Field;
        let secret_key = Box::new(Scalar::random(rng));
        Ok(Self { secret_key })
    }

    /// Return the compressed public point of this key
    ///
    /// These 48 bytes are what is sent to the service so it can encrypt the
    /// derived key to this key pair.
    pub fn public_key(&self) -> [u8; G1AFFINE_BYTES] {
        let public_key = G1Affine::from(G1Affine::generator() * self.secret());
        public_key.to_compressed()
    }

    /// Serialize this transport secret key
    ///
    /// The encoding is the secret scalar as 32 big-endian bytes.
    pub fn serialize(&self) -> [u8; SCALAR_BYTES] {
        scalar_to_bytes_be(&self.secret_key)
    }

    /// Deserialize a transport secret key previously produced by
    /// [`TransportSecretKey::serialize`]
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SCALAR_BYTES] = bytes
            .try_into()
            .map_err(|_| VetKdError::InvalidInputLength("secret key must be exactly 32 bytes"))?;

        match scalar_from_bytes_be(&bytes) {
            Some(s) => Ok(Self {
                secret_key: Box::new(s),
            }),
            None => Err(VetKdError::Deserialization("not a canonical scalar")),
        }
    }

    pub(crate) fn secret(&self) -> &Scalar {
        &self.secret_key
    }
}
