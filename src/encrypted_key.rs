//! The transport-encrypted vetKey wire format and its verification.
//!
//! This is the correctness gate of the whole protocol: the only way to obtain
//! a [`VetKey`] is to run an [`EncryptedVetKey`] through
//! [`EncryptedVetKey::decrypt_and_verify`], which strips the transport
//! encryption and accepts the result only if it is a valid BLS signature
//! under the derived public key. A misbehaving service cannot get a forged
//! key past this check.

use ic_bls12_381::{G1Affine, G1Projective, G2Affine, G2Prepared, Gt};
use std::ops::Neg;

use crate::derived::DerivedPublicKey;
use crate::error::{Result, VetKdError};
use crate::hash::{augmented_hash_to_g1, option_from_ctoption, G1AFFINE_BYTES, G2AFFINE_BYTES};
use crate::transport::TransportSecretKey;
use crate::vetkey::VetKey;

lazy_static::lazy_static! {
    static ref G2PREPARED_NEG_G: G2Prepared = G2Affine::generator().neg().into();
}

/// An encrypted vetKey
///
/// The ciphertext delivered by the service: an ElGamal-style encryption of
/// the derived key under the requester's transport public key. Nothing about
/// it is trusted until [`EncryptedVetKey::decrypt_and_verify`] succeeds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedVetKey {
    c1: G1Affine,
    c2: G2Affine,
    c3: G1Affine,
}

impl EncryptedVetKey {
    /// The length of the serialized encoding of this type
    pub const BYTES: usize = 2 * G1AFFINE_BYTES + G2AFFINE_BYTES;

    const C2_OFFSET: usize = G1AFFINE_BYTES;
    const C3_OFFSET: usize = G1AFFINE_BYTES + G2AFFINE_BYTES;

    /// Deserialize an encrypted vetKey
    ///
    /// The encoding is the three compressed points `c1 (48B) ‖ c2 (96B) ‖
    /// c3 (48B)`, 192 bytes in total. Short, long or non-decodable inputs
    /// are rejected here, before any algebra runs.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let ek_bytes: &[u8; Self::BYTES] = bytes
            .try_into()
            .map_err(|_| VetKdError::Deserialization("encrypted key must be 192 bytes"))?;

        let c1_bytes: &[u8; G1AFFINE_BYTES] = ek_bytes[..Self::C2_OFFSET]
            .try_into()
            .expect("Length already checked");
        let c2_bytes: &[u8; G2AFFINE_BYTES] = ek_bytes[Self::C2_OFFSET..Self::C3_OFFSET]
            .try_into()
            .expect("Length already checked");
        let c3_bytes: &[u8; G1AFFINE_BYTES] = ek_bytes[Self::C3_OFFSET..]
            .try_into()
            .expect("Length already checked");

        let c1 = option_from_ctoption(G1Affine::from_compressed(c1_bytes));
        let c2 = option_from_ctoption(G2Affine::from_compressed(c2_bytes));
        let c3 = option_from_ctoption(G1Affine::from_compressed(c3_bytes));

        match (c1, c2, c3) {
            (Some(c1), Some(c2), Some(c3)) => Ok(Self { c1, c2, c3 }),
            (_, _, _) => Err(VetKdError::Deserialization("invalid curve point")),
        }
    }

    /// Serialize the encrypted vetKey
    pub fn serialize(&self) -> [u8; Self::BYTES] {
        let mut output = [0u8; Self::BYTES];

        output[..Self::C2_OFFSET].copy_from_slice(&self.c1.to_compressed());
        output[Self::C2_OFFSET..Self::C3_OFFSET].copy_from_slice(&self.c2.to_compressed());
        output[Self::C3_OFFSET..].copy_from_slice(&self.c3.to_compressed());

        output
    }

    /// Decrypt the transport encryption and verify the result
    ///
    /// Removes the transport mask with `tsk`, then accepts the candidate key
    /// only if it is a valid augmented BLS signature on `derivation_id` under
    /// `derived_public_key`. On success the returned [`VetKey`] is fully
    /// verified; on failure the candidate is discarded and never exposed,
    /// even partially.
    pub fn decrypt_and_verify(
        &self,
        tsk: &TransportSecretKey,
        derived_public_key: &DerivedPublicKey,
        derivation_id: &[u8],
    ) -> Result<VetKey> {
        use pairing::group::Group;

        // Check that c1 and c2 have the same discrete logarithm

        let c2_prep = G2Prepared::from(self.c2);

        let c1_c2 = gt_multipairing(&[
            (&self.c1, &G2PREPARED_NEG_G),
            (&G1Affine::generator(), &c2_prep),
        ]);

        if !bool::from(c1_c2.is_identity()) {
            return Err(VetKdError::InvalidVetKey);
        }

        // Recover the purported vetKey
        let k = G1Affine::from(G1Projective::from(&self.c3) - self.c1 * tsk.secret());

        // Accept only if the key is a valid BLS signature
        if verify_bls_signature_pt(derived_public_key, derivation_id, &k) {
            Ok(VetKey::new(k))
        } else {
            Err(VetKdError::InvalidVetKey)
        }
    }
}

/// Verify an augmented BLS signature
///
/// A vetKey is, under the hood, an augmented BLS signature: the derived
/// public key is part of the signed input. This function allows verifying
/// such a signature from its serialized form, for example when a vetKey is
/// used as a VRF output or a threshold BLS signature.
///
/// See <https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature#name-message-augmentation>
/// for details on BLS message augmentation.
///
/// Returns true if and only if `signature` is valid with respect to
/// `derived_public_key` and `input`.
pub fn verify_bls_signature(
    derived_public_key: &DerivedPublicKey,
    input: &[u8],
    signature: &[u8],
) -> bool {
    let signature: G1Affine = match <[u8; G1AFFINE_BYTES]>::try_from(signature) {
        Ok(bytes) => match option_from_ctoption(G1Affine::from_compressed(&bytes)) {
            Some(pt) => pt,
            None => return false,
        },
        Err(_) => return false,
    };

    verify_bls_signature_pt(derived_public_key, input, &signature)
}

fn verify_bls_signature_pt(dpk: &DerivedPublicKey, input: &[u8], signature: &G1Affine) -> bool {
    if dpk.point().is_identity().into() {
        return false;
    }

    let msg = augmented_hash_to_g1(dpk, input);
    let dpk_prep = G2Prepared::from(*dpk.point());

    // Check that `e(sig, g2) == e(msg, dpk)` using a multipairing

    use pairing::group::Group;
    let is_valid =
        gt_multipairing(&[(signature, &G2PREPARED_NEG_G), (&msg, &dpk_prep)]).is_identity();
    bool::from(is_valid)
}

fn gt_multipairing(terms: &[(&G1Affine, &G2Prepared)]) -> Gt {
    ic_bls12_381::multi_miller_loop(terms).final_exponentiation()
}
