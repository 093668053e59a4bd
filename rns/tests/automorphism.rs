use itertools::izip;
use rns::automorphism::{AutoPerm, galois_element};
use rns::poly::Poly;
use rns::ring::Ring;

#[test]
fn automorphism_u64() {
    let n: usize = 1 << 4;
    let q: u64 = 65537u64;
    let ring: Ring<u64> = Ring::new(n, q);

    sub_test("test_automorphism_native_u64::<NTT:false>", || {
        test_automorphism_native_u64::<false>(&ring)
    });
    sub_test("test_automorphism_native_u64::<NTT:true>", || {
        test_automorphism_native_u64::<true>(&ring)
    });
    sub_test("test_automorphism_from_perm_u64::<NTT:false>", || {
        test_automorphism_from_perm_u64::<false>(&ring)
    });
    sub_test("test_automorphism_from_perm_u64::<NTT:true>", || {
        test_automorphism_from_perm_u64::<true>(&ring)
    });
    sub_test("test_automorphism_composition_u64", || {
        test_automorphism_composition_u64(&ring)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn ramp(ring: &Ring<u64>) -> Poly<u64> {
    let mut p: Poly<u64> = ring.new_poly();
    (0..p.n()).for_each(|i| p.0[i] = i as u64);
    p
}

/// a(X^-1) for a = sum i X^i is -sum (n-j) X^j.
fn conjugate_of_ramp(ring: &Ring<u64>) -> Poly<u64> {
    let n: usize = ring.n();
    let q: u64 = ring.modulus.q;
    let mut p: Poly<u64> = ring.new_poly();
    (1..n).for_each(|j| p.0[j] = q - (n - j) as u64);
    p
}

fn test_automorphism_native_u64<const NTT: bool>(ring: &Ring<u64>) {
    let mut p0: Poly<u64> = ramp(ring);
    let mut p1: Poly<u64> = ring.new_poly();

    if NTT {
        ring.ntt_inplace::<false>(&mut p0);
    }

    let gal_el: usize = galois_element(ring.n(), 0, true);
    ring.a_apply_automorphism_native_into_b::<NTT>(&p0, gal_el, &mut p1);

    if NTT {
        ring.intt_inplace::<false>(&mut p1);
    }

    izip!(conjugate_of_ramp(ring).0, p1.0).for_each(|(a, b)| assert_eq!(a, b));
}

fn test_automorphism_from_perm_u64<const NTT: bool>(ring: &Ring<u64>) {
    let mut p0: Poly<u64> = ramp(ring);
    let mut p1: Poly<u64> = ring.new_poly();

    if NTT {
        ring.ntt_inplace::<false>(&mut p0);
    }

    let auto_perm: AutoPerm = AutoPerm::new::<NTT>(ring.n(), galois_element(ring.n(), 0, true));
    ring.a_apply_automorphism_from_perm_into_b::<NTT>(&p0, &auto_perm, &mut p1);

    if NTT {
        ring.intt_inplace::<false>(&mut p1);
    }

    izip!(conjugate_of_ramp(ring).0, p1.0).for_each(|(a, b)| assert_eq!(a, b));
}

fn test_automorphism_composition_u64(ring: &Ring<u64>) {
    let n: usize = ring.n();
    let p0: Poly<u64> = ramp(ring);
    let mut p1: Poly<u64> = ring.new_poly();
    let mut p2: Poly<u64> = ring.new_poly();
    let mut p3: Poly<u64> = ring.new_poly();

    ring.a_apply_automorphism_native_into_b::<false>(&p0, galois_element(n, 1, false), &mut p1);
    ring.a_apply_automorphism_native_into_b::<false>(&p1, galois_element(n, 2, false), &mut p2);
    ring.a_apply_automorphism_native_into_b::<false>(&p0, galois_element(n, 3, false), &mut p3);
    assert_eq!(p2, p3);

    // NTT and coefficient domains agree for a non-trivial element.
    let mut p0_ntt: Poly<u64> = p0.clone();
    ring.ntt_inplace::<false>(&mut p0_ntt);
    let perm: AutoPerm = AutoPerm::new::<true>(n, galois_element(n, 3, false));
    ring.a_apply_automorphism_from_perm_into_b::<true>(&p0_ntt, &perm, &mut p1);
    ring.intt_inplace::<false>(&mut p1);
    assert_eq!(p1, p3);
}
