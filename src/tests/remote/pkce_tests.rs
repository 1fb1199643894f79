use super::*;

#[test]
fn challenge_matches_rfc7636_example() {
    // Appendix B of RFC 7636.
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string();
    let pair = PkcePair::from_verifier(verifier);
    assert_eq!(pair.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn generated_verifiers_differ_and_are_url_safe() {
    let a = PkcePair::generate().unwrap();
    let b = PkcePair::generate().unwrap();
    assert_ne!(a.verifier, b.verifier);
    assert_eq!(a.verifier.len(), 43);
    assert!(
        a.verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert_eq!(challenge_for(&a.verifier), a.challenge);
}
