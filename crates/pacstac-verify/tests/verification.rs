use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use pacstac_canonical::canonical_bytes;
use pacstac_verify::{
    offline_verify, verify, Jwk, JwkSet, VerificationReport, Verified, VerifyError, VerifyMode,
};
use serde_json::{json, Value};

fn make_signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

fn make_jwks(kid: &str, key: &SigningKey) -> Value {
    serde_json::to_value(JwkSet {
        keys: vec![Jwk::ed25519(kid, &key.verifying_key())],
    })
    .unwrap()
}

fn sign(key: &SigningKey, value: &Value) -> [u8; 64] {
    key.sign(&canonical_bytes(value).unwrap()).to_bytes()
}

fn with_signature(mut attestation: Value, kid: &str, sig: String) -> Value {
    attestation["signature"] = json!({ "kid": kid, "sig": sig });
    attestation
}

fn make_payload_attestation(key: &SigningKey) -> Value {
    let payload = json!({ "sub": "alice" });
    let sig = STANDARD.encode(sign(key, &payload));
    with_signature(
        json!({
            "id": "att_01",
            "issuedAt": "2025-01-01T00:00:00Z",
            "payload": payload
        }),
        "k1",
        sig,
    )
}

fn make_envelope_attestation(key: &SigningKey) -> Value {
    let unsigned = json!({
        "id": "att_02",
        "wallet": { "chain": "eip155:1", "address": "0xabc" },
        "asset": { "type": "domain", "ref": { "domain": "example.com" } },
        "issuedAt": "2025-01-01T00:00:00Z"
    });
    let sig = STANDARD.encode(sign(key, &unsigned));
    with_signature(unsigned, "k1", sig)
}

fn assert_mismatch(attestation: &Value, jwks: &Value) {
    assert_eq!(verify(attestation, jwks), Err(VerifyError::SignatureMismatch));
    match offline_verify(attestation, jwks) {
        VerificationReport::Invalid { error } => {
            assert!(error.starts_with("Signature did not verify"), "{}", error)
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn canonical_payload_message() {
    assert_eq!(
        canonical_bytes(&json!({ "sub": "alice" })).unwrap(),
        br#"{"sub":"alice"}"#.to_vec()
    );
}

#[test]
fn payload_mode_end_to_end() {
    let key = make_signing_key();
    let attestation = make_payload_attestation(&key);
    let jwks = make_jwks("k1", &key);

    let report = offline_verify(&attestation, &jwks);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({ "ok": true, "kid": "k1", "mode": "payload" })
    );
}

#[test]
fn envelope_mode_end_to_end() {
    let key = make_signing_key();
    let attestation = make_envelope_attestation(&key);
    let jwks = make_jwks("k1", &key);

    assert_eq!(
        verify(&attestation, &jwks).unwrap(),
        Verified {
            kid: "k1".into(),
            mode: VerifyMode::AttestationWithoutSignature
        }
    );
}

#[test]
fn envelope_mode_used_when_payload_does_not_match() {
    let key = make_signing_key();
    let unsigned = json!({
        "id": "att_03",
        "payload": { "sub": "bob" }
    });
    let sig = STANDARD.encode(sign(&key, &unsigned));
    let attestation = with_signature(unsigned, "k1", sig);

    let verified = verify(&attestation, &make_jwks("k1", &key)).unwrap();
    assert_eq!(verified.mode, VerifyMode::AttestationWithoutSignature);
}

#[test]
fn envelope_signature_ignores_key_order() {
    let key = make_signing_key();
    let signed = json!({ "a": 1, "b": { "y": 2, "x": 3 } });
    let sig = STANDARD.encode(sign(&key, &signed));
    let reordered: Value =
        serde_json::from_str(&format!(
            r#"{{"signature":{{"sig":"{}","kid":"k1"}},"b":{{"x":3,"y":2}},"a":1}}"#,
            sig
        ))
        .unwrap();

    let verified = verify(&reordered, &make_jwks("k1", &key)).unwrap();
    assert_eq!(verified.mode, VerifyMode::AttestationWithoutSignature);
}

#[test]
fn flipped_signature_bit_is_detected() {
    let key = make_signing_key();
    let payload = json!({ "sub": "alice" });
    let mut sig = sign(&key, &payload);
    sig[10] ^= 0x01;
    let attestation = with_signature(json!({ "payload": payload }), "k1", STANDARD.encode(sig));

    assert_mismatch(&attestation, &make_jwks("k1", &key));
}

#[test]
fn tampered_payload_is_detected() {
    let key = make_signing_key();
    let mut attestation = make_payload_attestation(&key);
    attestation["payload"]["sub"] = json!("mallory");

    assert_mismatch(&attestation, &make_jwks("k1", &key));
}

#[test]
fn tampered_envelope_field_is_detected() {
    let key = make_signing_key();
    let mut attestation = make_envelope_attestation(&key);
    attestation["asset"]["ref"]["domain"] = json!("evil.example");

    assert_mismatch(&attestation, &make_jwks("k1", &key));
}

#[test]
fn added_envelope_field_is_detected() {
    let key = make_signing_key();
    let mut attestation = make_envelope_attestation(&key);
    attestation["extra"] = json!(null);

    assert_mismatch(&attestation, &make_jwks("k1", &key));
}

#[test]
fn wrong_key_is_a_mismatch() {
    let key = make_signing_key();
    let other = SigningKey::from_bytes(&[8u8; 32]);
    let attestation = make_payload_attestation(&key);

    assert_mismatch(&attestation, &make_jwks("k1", &other));
}

#[test]
fn unknown_kid_is_reported() {
    let key = make_signing_key();
    let attestation = make_payload_attestation(&key);
    let jwks = make_jwks("k2", &key);

    let err = verify(&attestation, &jwks).unwrap_err();
    assert_eq!(err, VerifyError::KeyNotFound { kid: "k1".into() });
    assert_eq!(
        offline_verify(&attestation, &jwks),
        VerificationReport::Invalid {
            error: "No Ed25519 JWKS key found for kid=k1".into()
        }
    );
}

#[test]
fn hex_and_base64_signatures_agree() {
    let key = make_signing_key();
    let payload = json!({ "sub": "alice" });
    let sig = sign(&key, &payload);
    let jwks = make_jwks("k1", &key);

    let encodings = [
        STANDARD.encode(sig),
        URL_SAFE_NO_PAD.encode(sig),
        format!("0x{}", hex::encode(sig)),
        format!("0X{}", hex::encode_upper(sig)),
    ];
    for encoded in encodings {
        let attestation = with_signature(json!({ "payload": payload }), "k1", encoded);
        assert_eq!(
            verify(&attestation, &jwks).unwrap().mode,
            VerifyMode::Payload
        );
    }

    let mut flipped = sig;
    flipped[0] ^= 0x80;
    for encoded in [STANDARD.encode(flipped), format!("0x{}", hex::encode(flipped))] {
        let attestation = with_signature(json!({ "payload": payload }), "k1", encoded);
        assert_mismatch(&attestation, &jwks);
    }
}

#[test]
fn inputs_are_not_mutated() {
    let key = make_signing_key();
    let attestation = make_envelope_attestation(&key);
    let jwks = make_jwks("k1", &key);
    let attestation_before = attestation.clone();
    let jwks_before = jwks.clone();

    assert!(offline_verify(&attestation, &jwks).is_ok());
    assert_eq!(attestation, attestation_before);
    assert_eq!(jwks, jwks_before);
}

#[test]
fn malformed_attestations() {
    let jwks = make_jwks("k1", &make_signing_key());

    for attestation in [json!(null), json!("text"), json!([1, 2]), json!(42)] {
        assert_eq!(
            offline_verify(&attestation, &jwks),
            VerificationReport::Invalid {
                error: "Attestation must be a JSON object".into()
            }
        );
    }

    for attestation in [
        json!({}),
        json!({ "signature": null }),
        json!({ "signature": { "kid": "k1" } }),
        json!({ "signature": { "sig": "AAAA" } }),
        json!({ "signature": { "kid": 1, "sig": "AAAA" } }),
    ] {
        assert_eq!(
            offline_verify(&attestation, &jwks),
            VerificationReport::Invalid {
                error: "Expected attestation.signature.kid and attestation.signature.sig".into()
            }
        );
    }
}

#[test]
fn invalid_jwks_mentions_kid() {
    let attestation = make_payload_attestation(&make_signing_key());
    let err = verify(&attestation, &json!({ "keys": "nope" })).unwrap_err();
    assert_eq!(err, VerifyError::InvalidJwks { kid: "k1".into() });
    assert!(err.to_string().contains("keys[]"));
    assert!(err.to_string().contains("k1"));
}

#[test]
fn undecodable_signature_is_an_encoding_error() {
    let key = make_signing_key();
    let jwks = make_jwks("k1", &key);

    for sig in ["0xabc", "0xzz", "a"] {
        let attestation = with_signature(json!({ "payload": {} }), "k1", sig.to_string());
        assert!(matches!(
            verify(&attestation, &jwks),
            Err(VerifyError::InvalidEncoding(_))
        ));
    }
}

#[test]
fn short_signature_is_rejected() {
    let key = make_signing_key();
    let attestation = with_signature(json!({ "payload": {} }), "k1", "0xdeadbeef".into());
    assert_eq!(
        verify(&attestation, &make_jwks("k1", &key)),
        Err(VerifyError::InvalidSignature(4))
    );
}

#[test]
fn short_public_key_is_rejected() {
    let key = make_signing_key();
    let attestation = make_payload_attestation(&key);
    let jwks = json!({
        "keys": [{ "kty": "OKP", "crv": "Ed25519", "kid": "k1", "x": URL_SAFE_NO_PAD.encode([1u8; 16]) }]
    });
    assert!(matches!(
        verify(&attestation, &jwks),
        Err(VerifyError::InvalidPublicKey { ref kid, .. }) if kid == "k1"
    ));
}

#[test]
fn first_matching_key_wins_even_if_wrong() {
    let key = make_signing_key();
    let other = SigningKey::from_bytes(&[9u8; 32]);
    let attestation = make_payload_attestation(&key);
    let jwks = serde_json::to_value(JwkSet {
        keys: vec![
            Jwk::ed25519("k1", &other.verifying_key()),
            Jwk::ed25519("k1", &key.verifying_key()),
        ],
    })
    .unwrap();

    assert_mismatch(&attestation, &jwks);
}

#[test]
fn key_algorithm_field_is_not_consulted() {
    let key = make_signing_key();
    let attestation = make_payload_attestation(&key);
    let mut jwks = make_jwks("k1", &key);
    jwks["keys"][0]["alg"] = json!("ES256");

    assert!(offline_verify(&attestation, &jwks).is_ok());
}

#[test]
fn report_display_matches_ui_message() {
    let key = make_signing_key();
    let report = offline_verify(&make_payload_attestation(&key), &make_jwks("k1", &key));
    assert_eq!(report.to_string(), "Valid (kid=k1, mode=payload)");
}

fn attestation_signed_over(key: &SigningKey, signed: &[u8], payload: &str) -> Value {
    let sig = STANDARD.encode(key.sign(signed).to_bytes());
    serde_json::from_str(&format!(
        r#"{{"payload":{},"signature":{{"kid":"k1","sig":"{}"}}}}"#,
        payload, sig
    ))
    .unwrap()
}

#[test]
fn large_integer_payload_matches_browser_signer() {
    let key = make_signing_key();
    let attestation = attestation_signed_over(
        &key,
        br#"{"amount":12345678901234567000,"sub":"alice"}"#,
        r#"{"sub":"alice","amount":12345678901234567890}"#,
    );

    let verified = verify(&attestation, &make_jwks("k1", &key)).unwrap();
    assert_eq!(verified.mode, VerifyMode::Payload);
}

#[test]
fn astral_key_order_matches_browser_signer() {
    let key = make_signing_key();
    let attestation = attestation_signed_over(
        &key,
        r#"{"😀":2,"｡":1}"#.as_bytes(),
        r#"{"｡":1,"😀":2}"#,
    );

    let verified = verify(&attestation, &make_jwks("k1", &key)).unwrap();
    assert_eq!(verified.mode, VerifyMode::Payload);
}
