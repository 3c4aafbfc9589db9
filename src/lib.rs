#![allow(non_snake_case)]
#![doc = include_str!("../README.md")]

pub mod codec;
pub mod composition;
pub mod duplex_sponge;
pub mod errors;
pub mod fiat_shamir;
pub mod linear_relation;
pub mod schnorr_protocol;
pub mod serialization;
pub mod test_utils;
pub mod traits;

pub use codec::{ByteSchnorrCodec, Codec, KeccakByteSchnorrCodec, ShakeCodec};
pub use composition::{ComposedRelation, ComposedWitness};
pub use errors::Error;
pub use fiat_shamir::Nizk;
pub use linear_relation::LinearRelation;
pub use schnorr_protocol::SchnorrProof;
pub use traits::{SigmaProtocol, SigmaProtocolSimulator};
