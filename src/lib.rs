//! Client-side utilities for Verifiably Encrypted Threshold Key Derivation (vetKD)
//!
//! A vetKD service holds a threshold master secret and, on request, returns a
//! key derived for a caller-chosen input, encrypted under an ephemeral
//! transport key so that nobody observing the wire learns it. Because the
//! derived key is also a valid BLS signature, the requester can check the
//! pairing equation locally and accept the key without trusting the service.
//!
//! This crate implements everything the *client* needs for that exchange:
//!
//! * [`TransportSecretKey`]: the ephemeral key pair the derived key is
//!   encrypted to in transit.
//! * [`DerivedPublicKey`]: the public key of a derivation context, including
//!   offline sub-derivation for further contexts.
//! * [`EncryptedVetKey`]: the wire format delivered by the service, and the
//!   combined decryption/verification that yields a [`VetKey`].
//! * [`VetKey`]: the verified key itself, with helpers to turn it into
//!   symmetric keys, BLS12-381 secret scalars, or authenticated ciphertexts.
//! * [`IbeCiphertext`]: identity based encryption to a derivation input whose
//!   vetKey need not exist yet.
//!
//! All operations are synchronous, allocation-light pure functions over
//! immutable values; fetching the service's responses and caching derived
//! keys are the caller's concern.
//!
//! See the ePrint paper <https://eprint.iacr.org/2023/616> for protocol
//! details

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![forbid(missing_docs)]

pub use ic_bls12_381::{G1Affine, G2Affine, Scalar};

mod derived;
mod encrypted_key;
mod error;
mod hash;
mod ibe;
mod transport;
mod vetkey;

pub use derived::DerivedPublicKey;
pub use encrypted_key::{verify_bls_signature, EncryptedVetKey};
pub use error::{Result, VetKdError};
pub use hash::{augmented_hash_to_g1, derive_symmetric_key, hash_to_scalar};
pub use ibe::{IbeCiphertext, IBE_SEED_BYTES};
pub use transport::TransportSecretKey;
pub use vetkey::VetKey;
