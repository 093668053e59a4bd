use bfv::{
    Ciphertext, Decryptor, Encoder, Encryptor, Evaluator, KeyGenerator, Parameters, ParametersLiteral, Plaintext,
    PublicKey, RelinearizationKey, Result, RotationKeySet,
};
use sampling::source::Source;
use std::sync::Arc;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let params: Arc<Parameters> = Parameters::new(&ParametersLiteral {
        log_n: 10,
        t: 65537,
        log_q: vec![50, 50],
        sigma: 3.2,
        log_base: 25,
    })?;

    let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([0; 32]));
    let (sk, pk) = kgen.gen_key_pair()?;
    let rlk: RelinearizationKey = kgen.gen_relinearization_key(&sk, 2)?;
    let rtks: RotationKeySet = kgen.gen_rotation_keys_pow2(&sk, true)?;

    let encoder: Encoder = Encoder::new(&params)?;
    let mut encryptor: Encryptor<PublicKey> = Encryptor::new(&params, &pk, Source::new([1; 32]))?;
    let decryptor: Decryptor = Decryptor::new(&params, &sk)?;
    let evaluator: Evaluator = Evaluator::new(&params);

    let a: Vec<u64> = (0..params.n() as u64).collect();
    let b: Vec<u64> = (0..params.n() as u64).map(|i| 3 * i + 1).collect();

    let ct_a: Ciphertext = encryptor.encrypt_new(&encoder.encode_new(&a)?)?;
    let ct_b: Ciphertext = encryptor.encrypt_new(&encoder.encode_new(&b)?)?;

    let prod: Ciphertext = evaluator.relinearize_new(&evaluator.mul_new(&ct_a, &ct_b)?, &rlk)?;
    let rotated: Ciphertext = evaluator.rotate_rows_new(&prod, 3, &rtks)?;

    let pt: Plaintext = decryptor.decrypt_new(&rotated)?;
    let have: Vec<u64> = encoder.decode(&pt)?;
    let want: Vec<u64> = (0..params.n() / 2)
        .map(|j| {
            let k: usize = (j + 3) % (params.n() / 2);
            a[k] * b[k] % params.t()
        })
        .collect();

    println!("noise budget: {:.2} bits", decryptor.noise_budget(&rotated)?);
    println!("want: {:?}", &want[..8]);
    println!("have: {:?}", &have[..8]);
    Ok(())
}
