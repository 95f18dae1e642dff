//! Identity based encryption to a derivation input.
//!
//! Encryption needs only the derived public key and the derivation id the
//! recipient will eventually request a vetKey for; the vetKey itself need not
//! exist yet. The scheme is the pairing-based masking construction with a
//! Fujisaki-Okamoto style consistency check: decryption re-derives the
//! encryption randomness and rejects the ciphertext unless it matches, so any
//! modification of the ciphertext (or use of the wrong vetKey) fails cleanly
//! instead of yielding garbage plaintext.

use ic_bls12_381::{G2Affine, Gt, Scalar};

use crate::derived::DerivedPublicKey;
use crate::error::{Result, VetKdError};
use crate::hash::{
    augmented_hash_to_g1, derive_symmetric_key, hash_to_scalar, option_from_ctoption, xor_buf,
    G2AFFINE_BYTES, MAX_XMD_OUTPUT_BYTES,
};
use crate::vetkey::VetKey;

/// Amount of randomness consumed by one IBE encryption.
pub const IBE_SEED_BYTES: usize = 32;

/// Tag for deriving the masking scalar from the seed and message, and for
/// masking the seed with the pairing output. Fixed wire contract.
const IBE_MASK_SEED_DST: &str = "ic-crypto-vetkd-bls12-381-ibe-mask-seed";

/// Tag for expanding the seed into the message mask. Fixed wire contract.
const IBE_MASK_MSG_DST: &str = "ic-crypto-vetkd-bls12-381-ibe-mask-msg";

const IBE_OVERHEAD: usize = G2AFFINE_BYTES + IBE_SEED_BYTES;

#[derive(Clone, Debug, Eq, PartialEq)]
/// An IBE (identity based encryption) ciphertext
pub struct IbeCiphertext {
    c1: G2Affine,
    c2: [u8; IBE_SEED_BYTES],
    c3: Vec<u8>,
}

impl IbeCiphertext {
    /// Encrypt a message to a derivation input
    ///
    /// The ciphertext can be decrypted only with the vetKey for
    /// `derivation_id` under `dpk` (same service key and same context).
    ///
    /// The seed must be exactly 32 bytes drawn from a cryptographically
    /// secure random number generator, and must never be reused for another
    /// message or any other purpose.
    ///
    /// The message is masked with a single expanding-hash call, which bounds
    /// its length at 8160 bytes. To encrypt more, encrypt a symmetric key
    /// here and the bulk data with [`crate::VetKey::encrypt_message`] or a
    /// cipher of your choice.
    pub fn encrypt(
        dpk: &DerivedPublicKey,
        derivation_id: &[u8],
        msg: &[u8],
        seed: &[u8],
    ) -> Result<Self> {
        let seed: &[u8; IBE_SEED_BYTES] = seed
            .try_into()
            .map_err(|_| VetKdError::InvalidInputLength("seed must be exactly 32 bytes"))?;

        if msg.len() > MAX_XMD_OUTPUT_BYTES {
            return Err(VetKdError::InvalidInputLength(
                "message too long for the masking hash",
            ));
        }

        let t = Self::hash_to_mask(seed, msg);

        let pt = augmented_hash_to_g1(dpk, derivation_id);

        let tsig = ic_bls12_381::pairing(&pt, dpk.point()) * t;

        let c1 = G2Affine::from(G2Affine::generator() * t);
        let c2 = Self::mask_seed(seed, &tsig);
        let c3 = Self::mask_msg(msg, seed);

        Ok(Self { c1, c2, c3 })
    }

    /// Decrypt an IBE ciphertext
    ///
    /// The vetKey must be the one produced for the `derivation_id` and
    /// derived public key used at encryption time. Returns the plaintext, or
    /// an error if the internal consistency check fails; a single flipped bit
    /// anywhere in the ciphertext makes it fail with overwhelming
    /// probability.
    pub fn decrypt(&self, vetkey: &VetKey) -> Result<Vec<u8>> {
        if self.c3.len() > MAX_XMD_OUTPUT_BYTES {
            return Err(VetKdError::DecryptionFailed);
        }

        let tsig = ic_bls12_381::pairing(vetkey.point(), &self.c1);

        let seed: [u8; IBE_SEED_BYTES] = Self::mask_seed(&self.c2, &tsig);

        let msg = Self::mask_msg(&self.c3, &seed);

        let t = Self::hash_to_mask(&seed, &msg);

        let g_t = G2Affine::from(G2Affine::generator() * t);

        if self.c1 == g_t {
            Ok(msg)
        } else {
            Err(VetKdError::DecryptionFailed)
        }
    }

    /// Serialize this IBE ciphertext
    ///
    /// The encoding is `c1 (96B) ‖ c2 (32B) ‖ c3 (message length)`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(IBE_OVERHEAD + self.c3.len());

        output.extend_from_slice(&self.c1.to_compressed());
        output.extend_from_slice(&self.c2);
        output.extend_from_slice(&self.c3);

        output
    }

    /// Deserialize an IBE ciphertext
    ///
    /// Inputs shorter than the fixed 128-byte overhead cannot be a
    /// ciphertext at all and are rejected as such; a `c1` component that is
    /// not a valid G2 encoding is rejected as a deserialization failure.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < IBE_OVERHEAD {
            return Err(VetKdError::InvalidInputLength("IBE ciphertext too short"));
        }

        let c1_bytes: &[u8; G2AFFINE_BYTES] = bytes[0..G2AFFINE_BYTES]
            .try_into()
            .expect("Length already checked");
        let c1 = option_from_ctoption(G2Affine::from_compressed(c1_bytes))
            .ok_or(VetKdError::Deserialization("invalid G2 point"))?;

        let mut c2 = [0u8; IBE_SEED_BYTES];
        c2.copy_from_slice(&bytes[G2AFFINE_BYTES..IBE_OVERHEAD]);

        let c3 = bytes[IBE_OVERHEAD..].to_vec();

        Ok(Self { c1, c2, c3 })
    }

    /// Size of the ciphertext for a plaintext of the given size
    pub fn ciphertext_size(plaintext_size: usize) -> usize {
        plaintext_size + IBE_OVERHEAD
    }

    /// Size of the plaintext inside a ciphertext of the given size
    ///
    /// Returns None if the indicated length is too short to be a valid
    /// ciphertext.
    pub fn plaintext_size(ciphertext_size: usize) -> Option<usize> {
        ciphertext_size.checked_sub(IBE_OVERHEAD)
    }

    fn hash_to_mask(seed: &[u8; IBE_SEED_BYTES], msg: &[u8]) -> Scalar {
        let mut ro_input = Vec::with_capacity(seed.len() + msg.len());
        ro_input.extend_from_slice(seed);
        ro_input.extend_from_slice(msg);

        hash_to_scalar(&ro_input, IBE_MASK_SEED_DST)
    }

    fn mask_seed(seed: &[u8; IBE_SEED_BYTES], t: &Gt) -> [u8; IBE_SEED_BYTES] {
        let mask = derive_symmetric_key(&t.to_bytes(), IBE_MASK_SEED_DST, IBE_SEED_BYTES);

        let mut masked_seed = [0u8; IBE_SEED_BYTES];
        masked_seed.copy_from_slice(&xor_buf(&mask, seed));
        masked_seed
    }

    fn mask_msg(msg: &[u8], seed: &[u8; IBE_SEED_BYTES]) -> Vec<u8> {
        let mask = derive_symmetric_key(seed, IBE_MASK_MSG_DST, msg.len());

        xor_buf(&mask, msg)
    }
}
