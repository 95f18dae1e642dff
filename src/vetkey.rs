//! The verified vetKey and the helpers for using it.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use ic_bls12_381::{G1Affine, Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VetKdError};
use crate::hash::{derive_symmetric_key, hash_to_scalar, G1AFFINE_BYTES};

/// AES-256-GCM parameters of the message-encryption helpers.
const MESSAGE_KEY_BYTES: usize = 32;
const NONCE_BYTES: usize = 12;
const TAG_BYTES: usize = 16;

/// A verified vetKey
///
/// A vetKey is a BLS signature, created by the service for a derivation input
/// specified by the requester. Values of this type have passed the pairing
/// verification in [`crate::EncryptedVetKey::decrypt_and_verify`]; there is
/// no way to construct one from unchecked bytes.
#[derive(Clone, Debug, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct VetKey {
    // See the comment regarding Boxing in the definition of TransportSecretKey
    vetkey: Box<(G1Affine, [u8; G1AFFINE_BYTES])>,
}

impl VetKey {
    pub(crate) fn new(pt: G1Affine) -> Self {
        let vetkey = Box::new((pt, pt.to_compressed()));
        Self { vetkey }
    }

    /// Return the vetKey bytes, aka the BLS signature
    ///
    /// Use the raw bytes only if your design makes use of the fact that
    /// vetKeys are BLS signatures (eg for randomness beacons or threshold BLS
    /// signing). If you are using vetKD for key distribution, use
    /// [`VetKey::derive_symmetric_key`] instead.
    pub fn signature_bytes(&self) -> &[u8; G1AFFINE_BYTES] {
        &self.vetkey.1
    }

    /// Serialize the vetKey to its byte string
    ///
    /// The return value is the vetKey itself, which in most uses is a secret
    /// value. Identical to [`VetKey::signature_bytes`].
    pub fn serialize(&self) -> &[u8; G1AFFINE_BYTES] {
        &self.vetkey.1
    }

    /// Derive a symmetric key of the requested length from the vetKey
    ///
    /// The `domain_sep` parameter should be a string unique to your
    /// application and to your usage of the resulting key. For example an
    /// application "my-app" deriving keys for usages "foo" and "bar" might
    /// use "my-app-foo" and "my-app-bar".
    pub fn derive_symmetric_key(&self, domain_sep: &str, output_len: usize) -> Vec<u8> {
        derive_symmetric_key(self.serialize(), domain_sep, output_len)
    }

    /// Derive a BLS12-381 secret scalar from the vetKey
    ///
    /// For asymmetric use cases where the derived key must itself be usable
    /// as a BLS12-381 secret key. The same domain separation rules as for
    /// [`VetKey::derive_symmetric_key`] apply.
    pub fn derive_bls12381_secret_key(&self, domain_sep: &str) -> Scalar {
        hash_to_scalar(self.serialize(), domain_sep)
    }

    /// Encrypt a message under a key derived from this vetKey
    ///
    /// Derives a message-encryption key bound to `domain_sep`, draws a fresh
    /// random nonce and returns `nonce ‖ ciphertext ‖ tag` (AES-256-GCM).
    /// The output is only decryptable via [`VetKey::decrypt_message`] with
    /// the same vetKey and domain separator.
    pub fn encrypt_message<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        domain_sep: &str,
    ) -> Result<Vec<u8>> {
        let key_bytes = self.derive_symmetric_key(domain_sep, MESSAGE_KEY_BYTES);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

        let mut nonce = [0u8; NONCE_BYTES];
        rng.fill_bytes(&mut nonce);

        let ctext_and_tag = cipher
            .encrypt(Nonce::from_slice(&nonce), message)
            .map_err(|_| VetKdError::InvalidInputLength("message too long for AES-GCM"))?;

        let mut output = Vec::with_capacity(NONCE_BYTES + ctext_and_tag.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ctext_and_tag);
        Ok(output)
    }

    /// Decrypt a message produced by [`VetKey::encrypt_message`]
    ///
    /// Fails if the input is shorter than a nonce plus a tag, or if the tag
    /// does not authenticate the ciphertext under the derived key. Any
    /// modification of the ciphertext, and any mismatch of vetKey or domain
    /// separator, makes authentication fail.
    pub fn decrypt_message(&self, ciphertext: &[u8], domain_sep: &str) -> Result<Vec<u8>> {
        if ciphertext.len() < NONCE_BYTES + TAG_BYTES {
            return Err(VetKdError::InvalidInputLength("too short"));
        }

        let key_bytes = self.derive_symmetric_key(domain_sep, MESSAGE_KEY_BYTES);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

        let (nonce, ctext_and_tag) = ciphertext.split_at(NONCE_BYTES);

        cipher
            .decrypt(Nonce::from_slice(nonce), ctext_and_tag)
            .map_err(|_| VetKdError::DecryptionFailed)
    }

    pub(crate) fn point(&self) -> &G1Affine {
        &self.vetkey.0
    }
}
