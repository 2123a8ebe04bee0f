//! Property checks for the HMAC family and the algorithm-name mapping

use cryypt_jwa::{
    Algorithm, HashFunction, JwtKey, RustCryptoEngine, SignatureCodec, key_matches_algorithm,
    resolve,
};
use proptest::prelude::*;

fn hmac_algorithm() -> impl Strategy<Value = (Algorithm, HashFunction)> {
    prop_oneof![
        Just((Algorithm::HS256, HashFunction::Sha256)),
        Just((Algorithm::HS384, HashFunction::Sha384)),
        Just((Algorithm::HS512, HashFunction::Sha512)),
    ]
}

proptest! {
    #[test]
    fn hmac_sign_then_verify(
        (alg, hash) in hmac_algorithm(),
        secret in prop::collection::vec(any::<u8>(), 64..128),
        input in "[A-Za-z0-9_-]{0,64}\\.[A-Za-z0-9_-]{0,64}",
    ) {
        let codec = SignatureCodec::new(RustCryptoEngine::new());
        let key = JwtKey::hmac(hash, &secret).unwrap();
        let signature = codec.sign(alg, Some(&key), &input).unwrap();
        prop_assert_eq!(signature.len(), hash.output_len());
        prop_assert!(codec.verify(&signature, Some(&key), alg, &input).unwrap());
    }

    #[test]
    fn any_flipped_bit_fails(
        (alg, hash) in hmac_algorithm(),
        secret in prop::collection::vec(any::<u8>(), 64..128),
        input in "[A-Za-z0-9_-]{1,64}\\.[A-Za-z0-9_-]{1,64}",
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let codec = SignatureCodec::new(RustCryptoEngine::new());
        let key = JwtKey::hmac(hash, &secret).unwrap();
        let mut signature = codec.sign(alg, Some(&key), &input).unwrap();
        let at = position.index(signature.len());
        signature[at] ^= 1 << bit;
        prop_assert!(!codec.verify(&signature, Some(&key), alg, &input).unwrap());
    }

    #[test]
    fn hmac_keys_only_match_their_own_hash(
        (alg, hash) in hmac_algorithm(),
        (other_alg, _) in hmac_algorithm(),
    ) {
        let key = JwtKey::generate_hmac(hash);
        prop_assert_eq!(key_matches_algorithm(other_alg, Some(&key)).unwrap(), alg == other_alg);
    }

    #[test]
    fn unknown_names_never_resolve(name in "[A-Za-z0-9]{1,8}") {
        let known = Algorithm::ALL.iter().any(|alg| alg.as_str() == name);
        prop_assert_eq!(name.parse::<Algorithm>().is_ok(), known);
        if let Ok(alg) = name.parse::<Algorithm>() {
            prop_assert_eq!(resolve(alg).is_ok(), !alg.is_none());
        }
    }
}
