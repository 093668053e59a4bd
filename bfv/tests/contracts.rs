use bfv::{
    Ciphertext, Decryptor, Encoder, Encryptor, Error, Evaluator, KeyGenerator, Parameters, ParametersLiteral, Plaintext,
    PublicKey, RelinearizationKey, RotationKeySet, SecretKey,
};
use sampling::source::Source;
use std::sync::Arc;

fn literal() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 6,
        t: 257,
        log_q: vec![50, 50],
        sigma: 3.2,
        log_base: 20,
    }
}

#[test]
fn key_mismatch() {
    let params: Arc<Parameters> = Parameters::new(&literal()).unwrap();
    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([0u8; 32]));
    let sk1: SecretKey = kgen.gen_secret_key();
    let sk2: SecretKey = kgen.gen_secret_key();
    assert_ne!(sk1.key_id(), sk2.key_id());
    let rlk2: RelinearizationKey = kgen.gen_relinearization_key(&sk2, 2).unwrap();
    let rtks2: RotationKeySet = kgen.gen_rotation_keys_pow2(&sk2, true).unwrap();

    let mut enc1: Encryptor<SecretKey> = Encryptor::new(&params, &sk1, Source::new([1u8; 32])).unwrap();
    let mut enc2: Encryptor<SecretKey> = Encryptor::new(&params, &sk2, Source::new([2u8; 32])).unwrap();
    let evaluator: Evaluator = Evaluator::new(&params);
    let ct1: Ciphertext = enc1.encrypt_zero_new().unwrap();
    let ct2: Ciphertext = enc2.encrypt_zero_new().unwrap();

    sub_test("operands under different keys", || {
        assert!(matches!(evaluator.add_new(&ct1, &ct2), Err(Error::KeyMismatch { .. })));
        assert!(matches!(evaluator.mul_new(&ct1, &ct2), Err(Error::KeyMismatch { .. })));
    });

    sub_test("evaluation keys under a different secret", || {
        let deg2: Ciphertext = evaluator.square_new(&ct1).unwrap();
        let mut out: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        let before: Ciphertext = out.clone();
        assert!(matches!(
            evaluator.relinearize(&deg2, &rlk2, &mut out),
            Err(Error::KeyMismatch { .. })
        ));
        assert!(matches!(
            evaluator.rotate_rows(&ct1, 1, &rtks2, &mut out),
            Err(Error::KeyMismatch { .. })
        ));
        assert_eq!(out, before);
    });

    sub_test("decryption under a different secret", || {
        let decryptor: Decryptor = Decryptor::new(&params, &sk2).unwrap();
        assert!(matches!(decryptor.decrypt_new(&ct1), Err(Error::KeyMismatch { .. })));
    });

    sub_test("keys from other parameters", || {
        let other: Arc<Parameters> = Parameters::new(&ParametersLiteral { log_base: 25, ..literal() }).unwrap();
        let mut kgen_other: KeyGenerator = KeyGenerator::new(&other, Source::new([3u8; 32]));
        let (sk_other, pk_other) = kgen_other.gen_key_pair().unwrap();
        let rlk_other: RelinearizationKey = kgen_other.gen_relinearization_key(&sk_other, 2).unwrap();

        assert!(matches!(
            Encryptor::new(&params, &pk_other, Source::new([4u8; 32])),
            Err(Error::KeyMismatch { .. })
        ));
        assert!(matches!(Decryptor::new(&params, &sk_other), Err(Error::KeyMismatch { .. })));
        assert!(matches!(kgen.gen_public_key(&sk_other), Err(Error::KeyMismatch { .. })));

        let deg2: Ciphertext = evaluator.square_new(&ct1).unwrap();
        assert!(matches!(
            evaluator.relinearize_new(&deg2, &rlk_other),
            Err(Error::KeyMismatch { .. })
        ));

        let rtks_other: RotationKeySet = kgen_other.gen_rotation_keys_pow2(&sk_other, true).unwrap();
        let mut out: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        let before: Ciphertext = out.clone();
        assert!(matches!(
            evaluator.rotate_rows(&ct1, 1, &rtks_other, &mut out),
            Err(Error::KeyMismatch { .. })
        ));
        assert!(matches!(
            evaluator.rotate_columns(&ct1, &rtks_other, &mut out),
            Err(Error::KeyMismatch { .. })
        ));
        assert_eq!(out, before);

        let foreign: Ciphertext = Ciphertext::new(&other, 1).unwrap();
        assert!(matches!(
            evaluator.add_new(&ct1, &foreign),
            Err(Error::ParametersMismatch { .. })
        ));
        let mut out: Ciphertext = Ciphertext::new(&other, 1).unwrap();
        assert!(matches!(
            evaluator.add(&ct1, &ct1, &mut out),
            Err(Error::ParametersMismatch { .. })
        ));
    });
}

#[test]
fn degree_contract() {
    let params: Arc<Parameters> = Parameters::new(&literal()).unwrap();
    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([5u8; 32]));
    let (sk, pk) = kgen.gen_key_pair().unwrap();
    let rlk: RelinearizationKey = kgen.gen_relinearization_key(&sk, 2).unwrap();
    let encoder: Encoder = Encoder::new(&params).unwrap();
    let mut encryptor: Encryptor<PublicKey> = Encryptor::new(&params, &pk, Source::new([6u8; 32])).unwrap();
    let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
    let evaluator: Evaluator = Evaluator::new(&params);
    let t: u64 = params.t();

    let a: Vec<u64> = (0..params.n() as u64).map(|i| i % t).collect();
    let b: Vec<u64> = (0..params.n() as u64).map(|i| (5 * i + 1) % t).collect();
    let ct_a: Ciphertext = encryptor.encrypt_new(&encoder.encode_new(&a).unwrap()).unwrap();
    let ct_b: Ciphertext = encryptor.encrypt_new(&encoder.encode_new(&b).unwrap()).unwrap();
    let deg2_a: Ciphertext = evaluator.mul_new(&ct_a, &ct_b).unwrap();
    let deg2_b: Ciphertext = evaluator.square_new(&ct_b).unwrap();

    sub_test("degree 2 addition stays degree 2", || {
        let sum: Ciphertext = evaluator.add_new(&deg2_a, &deg2_b).unwrap();
        assert_eq!(sum.degree(), 2);
        let pt: Plaintext = decryptor.decrypt_new(&sum).unwrap();
        let want: Vec<u64> = a.iter().zip(b.iter()).map(|(x, y)| (x * y + y * y) % t).collect();
        assert_eq!(encoder.decode(&pt).unwrap(), want);
    });

    sub_test("mixed degrees", || {
        assert_eq!(
            evaluator.add_new(&ct_a, &deg2_a),
            Err(Error::DegreeMismatch { expected: 1, actual: 2 })
        );
        assert_eq!(
            evaluator.mul_new(&deg2_a, &deg2_b),
            Err(Error::DegreeMismatch { expected: 1, actual: 2 })
        );
        assert_eq!(
            evaluator.relinearize_new(&ct_a, &rlk),
            Err(Error::DegreeMismatch { expected: 2, actual: 1 })
        );
        assert!(matches!(
            evaluator.rotate_rows_new(&deg2_a, 1, &kgen.gen_rotation_keys_pow2(&sk, false).unwrap()),
            Err(Error::DegreeMismatch { expected: 1, actual: 2 })
        ));
    });

    sub_test("degree above the relinearization key", || {
        let deg3: Ciphertext = Ciphertext::new(&params, 3).unwrap();
        assert_eq!(
            evaluator.relinearize_new(&deg3, &rlk),
            Err(Error::UnsupportedDegree { degree: 3, max: 2 })
        );
        assert_eq!(
            Ciphertext::new(&params, 0),
            Err(Error::DegreeMismatch { expected: 1, actual: 0 })
        );
    });

    sub_test("output buffers are validated before writing", || {
        let mut out: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        let before: Ciphertext = out.clone();
        assert_eq!(
            evaluator.mul(&ct_a, &ct_b, &mut out),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            evaluator.add(&deg2_a, &deg2_b, &mut out),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(out, before);
    });
}

#[test]
fn thread_sharing() {
    let params: Arc<Parameters> = Parameters::new(&literal()).unwrap();
    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([7u8; 32]));
    let (sk, pk) = kgen.gen_key_pair().unwrap();
    let rlk: RelinearizationKey = kgen.gen_relinearization_key(&sk, 2).unwrap();
    let encoder: Encoder = Encoder::new(&params).unwrap();
    let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
    let evaluator: Evaluator = Evaluator::new(&params);
    let t: u64 = params.t();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u8)
            .map(|k| {
                let (params, pk, rlk, encoder, decryptor, evaluator) =
                    (&params, &pk, &rlk, &encoder, &decryptor, &evaluator);
                scope.spawn(move || {
                    let encryptor: Encryptor<PublicKey> = Encryptor::new(params, pk, Source::new([k; 32])).unwrap();
                    let mut source: Source = Source::new([k + 100; 32]);
                    let values: Vec<u64> = (0..params.n() as u64).map(|i| (i + k as u64) % t).collect();
                    let pt: Plaintext = encoder.encode_new(&values).unwrap();
                    let mut ct: Ciphertext = Ciphertext::new(params, 1).unwrap();
                    encryptor.encrypt_with_source(&pt, &mut ct, &mut source).unwrap();
                    let sq: Ciphertext = evaluator.square_new(&ct).unwrap();
                    let ct: Ciphertext = evaluator.relinearize_new(&sq, rlk).unwrap();
                    let have: Vec<u64> = encoder.decode(&decryptor.decrypt_new(&ct).unwrap()).unwrap();
                    let want: Vec<u64> = values.iter().map(|x| x * x % t).collect();
                    have == want
                })
            })
            .collect();
        handles
            .into_iter()
            .for_each(|h| assert!(h.join().unwrap()));
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}
