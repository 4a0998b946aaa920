//! End-to-end generate / encode / decode / verify coverage.

use arc_zkpop::{
    generate_keypair, generate_proof, generate_proof_with_matrix, verify_proof,
    verify_proof_with_matrix, Proof, PublicMatrix, SecurityLevel,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn honest_proofs_verify_at_every_level() {
    let mut rng = ChaCha20Rng::seed_from_u64(1001);
    for level in [SecurityLevel::Level1, SecurityLevel::Level3, SecurityLevel::Level5] {
        let (pk, sk) = generate_keypair(&mut rng, level).expect("keygen");
        let proof = generate_proof(&mut rng, &pk, &sk, b"enrollment").expect("prove");
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), level.params().proof_bytes());

        let verdict = verify_proof(&pk, b"enrollment", &bytes).expect("well-formed");
        assert!(verdict.is_accept(), "honest proof rejected at {:?}", level);
    }
}

#[test]
fn verification_is_idempotent() {
    let mut rng = ChaCha20Rng::seed_from_u64(1002);
    let (pk, sk) = generate_keypair(&mut rng, SecurityLevel::Level1).expect("keygen");
    let bytes = generate_proof(&mut rng, &pk, &sk, b"ctx").expect("prove").to_bytes();

    let first = verify_proof(&pk, b"ctx", &bytes).expect("well-formed");
    let second = verify_proof(&pk, b"ctx", &bytes).expect("well-formed");
    assert_eq!(first, second);
    assert!(first.is_accept());
}

#[test]
fn decode_reencode_is_byte_identical() {
    let mut rng = ChaCha20Rng::seed_from_u64(1003);
    let (pk, sk) = generate_keypair(&mut rng, SecurityLevel::Level3).expect("keygen");
    let bytes = generate_proof(&mut rng, &pk, &sk, b"ctx").expect("prove").to_bytes();

    let decoded = Proof::from_bytes(&bytes).expect("decode");
    assert_eq!(decoded.to_bytes(), bytes);
}

#[test]
fn level1_concrete_shape() {
    let mut rng = ChaCha20Rng::seed_from_u64(1004);
    let (pk, sk) = generate_keypair(&mut rng, SecurityLevel::Level1).expect("keygen");
    assert_eq!(pk.to_bytes().len(), 800);

    let proof = generate_proof(&mut rng, &pk, &sk, b"ctx").expect("prove");
    assert_eq!(proof.commitments().len(), 16);
    assert_eq!(proof.responses().len(), 16);
    assert_eq!(proof.to_bytes().len(), 2 + 16 * (768 + 2304));
}

#[test]
fn cached_matrix_agrees_with_internal_expansion() {
    let mut rng = ChaCha20Rng::seed_from_u64(1005);
    let level = SecurityLevel::Level3;
    let (pk, sk) = generate_keypair(&mut rng, level).expect("keygen");
    let matrix = PublicMatrix::expand(pk.rho(), level.params());

    let proof =
        generate_proof_with_matrix(&mut rng, &pk, &sk, b"ctx", &matrix).expect("prove");
    let bytes = proof.to_bytes();

    let with_cache = verify_proof_with_matrix(&pk, b"ctx", &bytes, &matrix).expect("well-formed");
    let without = verify_proof(&pk, b"ctx", &bytes).expect("well-formed");
    assert_eq!(with_cache, without);
    assert!(with_cache.is_accept());
}

#[test]
fn custom_config_produces_verifiable_proofs() {
    use arc_zkpop::{generate_with_config, ProverConfig};

    let mut rng = ChaCha20Rng::seed_from_u64(1007);
    let level = SecurityLevel::Level1;
    let (pk, sk) = generate_keypair(&mut rng, level).expect("keygen");
    let matrix = PublicMatrix::expand(pk.rho(), level.params());

    let config = ProverConfig { max_resample_iterations: 4096 };
    let proof =
        generate_with_config(&mut rng, &pk, &sk, b"ctx", &matrix, config).expect("prove");
    assert!(verify_proof(&pk, b"ctx", &proof.to_bytes()).expect("well-formed").is_accept());
}

#[test]
fn serialized_keys_still_prove_and_verify() {
    use arc_zkpop::{PublicKey, SecretKey};

    let mut rng = ChaCha20Rng::seed_from_u64(1006);
    let level = SecurityLevel::Level1;
    let (pk, sk) = generate_keypair(&mut rng, level).expect("keygen");

    let pk2 = PublicKey::from_bytes(&pk.to_bytes(), level).expect("pk decode");
    let sk2 = SecretKey::from_bytes(&sk.to_bytes(), level).expect("sk decode");

    let proof = generate_proof(&mut rng, &pk2, &sk2, b"ctx").expect("prove");
    assert!(verify_proof(&pk, b"ctx", &proof.to_bytes()).expect("well-formed").is_accept());
}
