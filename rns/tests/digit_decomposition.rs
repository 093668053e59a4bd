use rns::poly::{Poly, PolyRNS};
use rns::ring::RingRNS;
use sampling::source::Source;

#[test]
fn digit_decomposition_u64() {
    let n: usize = 1 << 6;
    let moduli: Vec<u64> = vec![0x1fffffffffe00001u64, 0x1fffffffffc80001u64, 65537];
    let ring: RingRNS<u64> = RingRNS::new(n, &moduli);

    sub_test("test_digits_recompose_limb", || test_digits_recompose_limb(&ring, 17));
    sub_test("test_digits_reduced_into_every_limb", || {
        test_digits_reduced_into_every_limb(&ring, 20)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn test_digits_recompose_limb(ring: &RingRNS<u64>, base_log: usize) {
    let mut source: Source = Source::new([0u8; 32]);
    let mut a: PolyRNS<u64> = ring.new_polyrns();
    ring.fill_uniform(&mut source, &mut a);

    let digits: usize = ring.digits(base_log);
    assert_eq!(digits, 61usize.div_ceil(base_log));

    let mut digit: Poly<u64> = ring.new_poly();
    let mut acc: Vec<u64> = vec![0; ring.n()];
    (0..digits).for_each(|i| {
        ring.0[0].a_ith_digit_unsigned_base_scalar_b_into_c(i, a.at(0), base_log, &mut digit);
        digit.0.iter().zip(acc.iter_mut()).for_each(|(d, acc)| {
            assert!(*d < 1 << base_log);
            *acc += d << (i * base_log)
        });
    });
    assert_eq!(acc, a.at(0).0);
}

fn test_digits_reduced_into_every_limb(ring: &RingRNS<u64>, base_log: usize) {
    let mut source: Source = Source::new([1u8; 32]);
    let mut a: PolyRNS<u64> = ring.new_polyrns();
    ring.fill_uniform(&mut source, &mut a);

    let mut buf: Poly<u64> = ring.new_poly();
    let mut b: PolyRNS<u64> = ring.new_polyrns();
    ring.a_ith_digit_of_limb_into_b(1, 2, base_log, &a, &mut buf, &mut b);
    (0..ring.n()).for_each(|k| {
        let d: u64 = (a.at(1).0[k] >> (2 * base_log)) & ((1 << base_log) - 1);
        assert_eq!(buf.0[k], d);
        ring.0.iter().enumerate().for_each(|(i, r)| assert_eq!(b.at(i).0[k], d % r.modulus.q));
    });
}
