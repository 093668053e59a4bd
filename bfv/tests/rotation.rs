use bfv::{
    Ciphertext, Decryptor, Encoder, Encryptor, Error, Evaluator, KeyGenerator, Parameters, ParametersLiteral, Plaintext,
    Rotation, RotationKeySet, SecretKey,
};
use sampling::source::Source;
use std::sync::Arc;

/// N = 8: two rows of four slots.
fn params() -> Arc<Parameters> {
    Parameters::new(&ParametersLiteral {
        log_n: 3,
        t: 17,
        log_q: vec![50, 50],
        sigma: 3.2,
        log_base: 20,
    })
    .unwrap()
}

#[test]
fn rotation() {
    let params: Arc<Parameters> = params();
    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([0u8; 32]));
    let sk: SecretKey = kgen.gen_secret_key();
    let rtks: RotationKeySet = kgen.gen_rotation_keys_pow2(&sk, true).unwrap();
    let encoder: Encoder = Encoder::new(&params).unwrap();
    let mut encryptor: Encryptor<SecretKey> = Encryptor::new(&params, &sk, Source::new([1u8; 32])).unwrap();
    let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
    let evaluator: Evaluator = Evaluator::new(&params);

    let pt: Plaintext = encoder.encode_new(&[1, 2, 3, 4, 0, 0, 0, 0]).unwrap();
    let ct: Ciphertext = encryptor.encrypt_new(&pt).unwrap();
    let decrypt = |ct: &Ciphertext| -> Vec<u64> { encoder.decode(&decryptor.decrypt_new(ct).unwrap()).unwrap() };

    sub_test("rotate_rows", || {
        let ct: Ciphertext = evaluator.rotate_rows_new(&ct, 1, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![2, 3, 4, 1, 0, 0, 0, 0]);
    });

    sub_test("rotate_rows negative", || {
        let ct: Ciphertext = evaluator.rotate_rows_new(&ct, -1, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![4, 1, 2, 3, 0, 0, 0, 0]);
    });

    sub_test("rotate_rows composed", || {
        // 3 = 1 + 2, no direct key for 3
        assert!(!rtks.contains(Rotation::Rows(3).galois_element(params.n())));
        let ct: Ciphertext = evaluator.rotate_rows_new(&ct, 3, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![4, 1, 2, 3, 0, 0, 0, 0]);
    });

    sub_test("rotate_rows identity", || {
        let ct: Ciphertext = evaluator.rotate_rows_new(&ct, 4, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![1, 2, 3, 4, 0, 0, 0, 0]);
    });

    sub_test("rotate_columns", || {
        let ct: Ciphertext = evaluator.rotate_columns_new(&ct, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![0, 0, 0, 0, 1, 2, 3, 4]);
        let ct: Ciphertext = evaluator.rotate_columns_new(&ct, &rtks).unwrap();
        assert_eq!(decrypt(&ct), vec![1, 2, 3, 4, 0, 0, 0, 0]);
    });

    sub_test("rotations commute", || {
        let mut ab: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        let mut ba: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        let tmp: Ciphertext = evaluator.rotate_rows_new(&ct, 2, &rtks).unwrap();
        evaluator.rotate_columns(&tmp, &rtks, &mut ab).unwrap();
        let tmp: Ciphertext = evaluator.rotate_columns_new(&ct, &rtks).unwrap();
        evaluator.rotate_rows(&tmp, 2, &rtks, &mut ba).unwrap();
        assert_eq!(decrypt(&ab), decrypt(&ba));
        assert_eq!(decrypt(&ab), vec![0, 0, 0, 0, 3, 4, 1, 2]);
    });
}

#[test]
fn missing_rotation_keys() {
    let params: Arc<Parameters> = params();
    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([2u8; 32]));
    let sk: SecretKey = kgen.gen_secret_key();
    let rtks: RotationKeySet = kgen.gen_rotation_keys(&sk, &[Rotation::Rows(1), Rotation::Rows(0)]).unwrap();
    assert_eq!(rtks.galois_elements(), vec![5]);

    let encoder: Encoder = Encoder::new(&params).unwrap();
    let mut encryptor: Encryptor<SecretKey> = Encryptor::new(&params, &sk, Source::new([3u8; 32])).unwrap();
    let evaluator: Evaluator = Evaluator::new(&params);
    let ct: Ciphertext = encryptor
        .encrypt_new(&encoder.encode_new(&[5, 6, 7, 8]).unwrap())
        .unwrap();

    let mut out: Ciphertext = Ciphertext::new(&params, 1).unwrap();
    let before: Ciphertext = out.clone();
    assert_eq!(
        evaluator.rotate_rows(&ct, 2, &rtks, &mut out),
        Err(Error::UnsupportedRotation {
            rotation: "rows(2)".to_string()
        })
    );
    assert!(matches!(
        evaluator.rotate_columns(&ct, &rtks, &mut out),
        Err(Error::UnsupportedRotation { .. })
    ));
    assert_eq!(out, before);
    assert!(evaluator.rotate_rows(&ct, 1, &rtks, &mut out).is_ok());
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}
