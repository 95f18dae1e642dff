//! Domain-separated hashing and key derivation primitives.
//!
//! Everything in this crate that turns bytes into scalars, curve points or
//! symmetric keys goes through this module. The domain separation tags are a
//! fixed wire-compatibility contract: changing any of them breaks
//! interoperability with already-issued ciphertexts and deployed derived
//! public keys.

use ic_bls12_381::hash_to_curve::{
    ExpandMessageState, ExpandMsgXmd, HashToCurve, HashToField, InitExpandMessage,
};
use ic_bls12_381::{G1Affine, G1Projective, Scalar};

use crate::derived::DerivedPublicKey;

pub(crate) const G1AFFINE_BYTES: usize = 48; // Size of compressed form
pub(crate) const G2AFFINE_BYTES: usize = 96; // Size of compressed form
pub(crate) const SCALAR_BYTES: usize = 32;

/// The standard augmented-BLS hash-to-G1 suite identifier.
const AUGMENTED_HASH_TO_G1_DST: &[u8; 43] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_AUG_";

/// Largest output `expand_message_xmd` with SHA-256 can produce (255 blocks).
pub(crate) const MAX_XMD_OUTPUT_BYTES: usize = 255 * 32;

/// Derive a key of the requested length using an expanding hash
///
/// The output is `expand_message_xmd` (RFC 9380) with SHA-256 over `input`,
/// domain separated by `domain_sep`. The construction is deterministic, so
/// the same `(input, domain_sep, len)` always yields the same bytes, and
/// outputs for distinct domain separators are independent.
///
/// The `input` should be a sufficiently long random value generated in a
/// secure way; 256 bits (32 bytes) or longer is preferable.
///
/// # Panics
///
/// The XMD expander cannot produce more than 8160 bytes; larger `len`
/// arguments panic. Callers inside this crate check the bound beforehand.
pub fn derive_symmetric_key(input: &[u8], domain_sep: &str, len: usize) -> Vec<u8> {
    if len == 0 {
        return Vec::new();
    }
    let mut okm = vec![0u8; len];
    let mut expander =
        ExpandMsgXmd::<sha2::Sha256>::init_expand(input, domain_sep.as_bytes(), len);
    expander.read_into(&mut okm);
    okm
}

/// Hash arbitrary bytes to a BLS12-381 scalar
///
/// Uses the RFC 9380 hash-to-field construction on the scalar field, with
/// `domain_sep` as the domain separation tag. The result is uniform in the
/// scalar field and as collision resistant as the underlying SHA-256.
pub fn hash_to_scalar(input: &[u8], domain_sep: &str) -> Scalar {
    let mut s = [Scalar::zero()];
    <Scalar as HashToField>::hash_to_field::<ExpandMsgXmd<sha2::Sha256>>(
        input,
        domain_sep.as_bytes(),
        &mut s,
    );
    s[0]
}

/// Hash two length-prefixed inputs to a scalar.
///
/// Each input is framed with its length as a big-endian u64 so that the pair
/// `(a, b)` cannot collide with any other split of the concatenation.
pub(crate) fn hash_to_scalar_two_inputs(
    input1: &[u8],
    input2: &[u8],
    domain_sep: &str,
) -> Scalar {
    let combined_input = {
        let mut c = Vec::with_capacity(2 * 8 + input1.len() + input2.len());
        c.extend_from_slice(&(input1.len() as u64).to_be_bytes());
        c.extend_from_slice(input1);
        c.extend_from_slice(&(input2.len() as u64).to_be_bytes());
        c.extend_from_slice(input2);
        c
    };

    hash_to_scalar(&combined_input, domain_sep)
}

/// Hash a message to G1, prefixed by the public key it will be verified under
///
/// This is the message-augmentation variant of BLS hashing: the compressed
/// public key is prepended to the message before hashing to the curve, so a
/// signature under one derived public key cannot be related to a signature
/// under another. Both vetKey verification and IBE use this digest.
pub fn augmented_hash_to_g1(pk: &DerivedPublicKey, message: &[u8]) -> G1Affine {
    let mut signature_input = Vec::with_capacity(G2AFFINE_BYTES + message.len());
    signature_input.extend_from_slice(&pk.serialize());
    signature_input.extend_from_slice(message);

    let pt = <G1Projective as HashToCurve<ExpandMsgXmd<sha2::Sha256>>>::hash_to_curve(
        signature_input,
        AUGMENTED_HASH_TO_G1_DST,
    );
    G1Affine::from(pt)
}

/// Scalars cross the wire in big-endian order; the curve library is
/// little-endian internally.
pub(crate) fn scalar_to_bytes_be(s: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut bytes = s.to_bytes();
    bytes.reverse();
    bytes
}

pub(crate) fn scalar_from_bytes_be(bytes: &[u8; SCALAR_BYTES]) -> Option<Scalar> {
    let mut le = *bytes;
    le.reverse();
    option_from_ctoption(Scalar::from_bytes(&le))
}

pub(crate) fn option_from_ctoption<T>(ctoption: subtle::CtOption<T>) -> Option<T> {
    if bool::from(ctoption.is_some()) {
        Some(ctoption.unwrap())
    } else {
        None
    }
}

pub(crate) fn xor_buf(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}
