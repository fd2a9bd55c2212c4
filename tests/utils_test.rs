use spotproxy::error::ProxyError;
use spotproxy::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should be deterministic - same input produces same output
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 is 32 bytes, 43 characters in unpadded base64
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(id, generate_session_id());
}

#[test]
fn test_normalize_name_folds_case_and_diacritics() {
    assert_eq!(normalize_name("Beyoncé"), "beyonce");
    assert_eq!(normalize_name("BEYONCE"), "beyonce");
    assert_eq!(normalize_name("beyonce\u{0301}"), "beyonce");
    assert_eq!(normalize_name("Björk"), "bjork");
    assert_eq!(normalize_name("Måns Zelmerlöw"), "manszelmerlow");
}

#[test]
fn test_normalize_name_drops_punctuation_and_whitespace() {
    assert_eq!(normalize_name("Jay-Z"), "jayz");
    assert_eq!(normalize_name("  The  Weeknd "), "theweeknd");
    assert_eq!(normalize_name("AC/DC"), "acdc");
    assert_eq!(normalize_name("P!nk"), "pnk");
    assert_eq!(normalize_name("!!!"), "");
    assert_eq!(normalize_name(""), "");
}

#[test]
fn test_normalize_name_keeps_digits_and_non_latin_letters() {
    assert_eq!(normalize_name("Blink-182"), "blink182");
    assert_eq!(normalize_name("Ｍａｄｏｎｎａ"), "madonna");
    assert_eq!(normalize_name("Сплин"), "сплин");
}

#[test]
fn test_normalize_name_is_idempotent() {
    let names = [
        "Beyoncé",
        "Jay-Z",
        "Sigur Rós",
        "İbrahim Tatlıses",
        "Ｍａｄｏｎｎａ",
        "Straße",
        "Mötley Crüe",
        "",
    ];

    for name in names {
        let once = normalize_name(name);
        assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", name);
    }
}

#[test]
fn test_variants_of_same_artist_normalize_equal() {
    let variants = ["Sigur Rós", "sigur ros", "SIGUR RÓS", "Sigur-Ros"];
    let expected = normalize_name(variants[0]);
    for v in variants {
        assert_eq!(normalize_name(v), expected);
    }
}

#[test]
fn test_parse_limit_accepts_range() {
    assert_eq!(parse_limit("0").unwrap(), 0);
    assert_eq!(parse_limit("10").unwrap(), 10);
    assert_eq!(parse_limit("50").unwrap(), MAX_PLAYLIST_LIMIT);
}

#[test]
fn test_parse_limit_rejects_out_of_range_and_garbage() {
    for raw in ["51", "-1", "ten", "", "1.5"] {
        assert!(
            matches!(parse_limit(raw), Err(ProxyError::InvalidParameter(_))),
            "accepted {:?}",
            raw
        );
    }
}
