//! End-to-end verification of every supported event.
//!
//! Each golden fixture is signed the way the sender signs it, delivered in
//! both encodings, and must come out of the middleware accepted with the
//! exact canonical text that was signed.

use paddle_webhook::{
    Encoding, Event, EventKind, Outcome, SignedPayload, VerificationMiddleware, WebhookConfig,
    WebhookError,
};
use paddle_webhook::webhook_core::{TextBool, VerificationError};
use paddle_webhook_testkit::generators::{amount_text, consent_text};
use paddle_webhook_testkit::{all_fixtures, fixture, TestSigner};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn middleware() -> VerificationMiddleware {
    VerificationMiddleware::new(TestSigner::new().verifier(), WebhookConfig::default())
}

fn deliver(mw: &VerificationMiddleware, encoding: Encoding, body: &str) -> Outcome {
    mw.run(encoding.media_type(), body.as_bytes()).outcome
}

#[test]
fn test_every_fixture_verifies_in_both_encodings() {
    init_tracing();
    let mw = middleware();
    let signer = TestSigner::new();

    for fixture in all_fixtures() {
        let signed = signer.sign(fixture.fields);

        for (encoding, body) in [
            (Encoding::Form, signed.form_body()),
            (Encoding::Json, signed.json_body()),
        ] {
            let event = match deliver(&mw, encoding, &body) {
                Outcome::Accepted(event) => event,
                Outcome::Rejected(e) => panic!("{} via {encoding}: {e}", fixture.kind),
            };
            assert_eq!(event.kind(), fixture.kind);
            assert_eq!(event.signature(), signed.signature);
            assert_eq!(
                String::from_utf8(event.canonical_bytes().unwrap()).unwrap(),
                signed.php,
                "{} via {encoding}",
                fixture.kind
            );
        }
    }
}

#[test]
fn test_omitted_blank_fields_still_verify() {
    let mw = middleware();
    let signer = TestSigner::new();

    for fixture in all_fixtures() {
        let signed = signer.sign(fixture.fields);
        let body = signed.form_body_with(|_, value| !value.is_empty());
        let outcome = deliver(&mw, Encoding::Form, &body);
        assert!(outcome.is_accepted(), "{}: {:?}", fixture.kind, outcome.error());
    }
}

#[test]
fn test_tampered_field_is_rejected() {
    let signer = TestSigner::new();
    let transfer = fixture(EventKind::TransferPaid);
    let genuine = signer.sign(transfer.fields);

    let mut forged = signer.sign(&transfer.with("currency", "EUR"));
    forged.signature = genuine.signature.clone();

    let outcome = deliver(&middleware(), Encoding::Form, &forged.form_body());
    assert!(matches!(
        outcome,
        Outcome::Rejected(WebhookError::Verification(VerificationError::SignatureMismatch))
    ));
}

#[test]
fn test_foreign_key_is_rejected() {
    let mw = middleware();
    let impostor = TestSigner::with_seed(7);

    for fixture in all_fixtures() {
        let body = impostor.sign(fixture.fields).json_body();
        let outcome = deliver(&mw, Encoding::Json, &body);
        assert!(
            outcome.error().is_some_and(WebhookError::is_verification),
            "{}",
            fixture.kind
        );
    }
}

#[test]
fn test_missing_signature_is_rejected() {
    let signed = TestSigner::new().sign(fixture(EventKind::PaymentRefunded).fields);
    let body = signed
        .form_body()
        .split('&')
        .filter(|pair| !pair.starts_with("p_signature="))
        .collect::<Vec<_>>()
        .join("&");

    let outcome = deliver(&middleware(), Encoding::Form, &body);
    assert!(matches!(
        outcome,
        Outcome::Rejected(WebhookError::Verification(VerificationError::EmptySignature))
    ));
}

#[test]
fn test_price_override_flag_signed_as_words() {
    let mw = middleware();
    let signer = TestSigner::new();
    let payment = fixture(EventKind::PaymentSucceeded);

    for (flag, expected) in [("true", true), ("false", false)] {
        let signed = signer.sign(&payment.with("used_price_override", flag));
        for (encoding, body) in [
            (Encoding::Form, signed.form_body()),
            (Encoding::Json, signed.json_body()),
        ] {
            let event = deliver(&mw, encoding, &body)
                .into_result()
                .unwrap_or_else(|e| panic!("{flag} via {encoding}: {e}"));
            let Event::PaymentSucceeded(record) = event else {
                panic!("wrong record for {flag}");
            };
            assert_eq!(record.used_price_override, Some(TextBool(expected)));
        }
    }
}

#[test]
fn test_unreproducible_amount_is_a_decode_error() {
    let mw = middleware();
    let signer = TestSigner::new();
    let transfer = fixture(EventKind::TransferPaid);

    for amount in ["-0.00", "0.00000000000000000000000000001"] {
        let body = signer.sign(&transfer.with("amount", amount)).form_body();
        let outcome = deliver(&mw, Encoding::Form, &body);
        assert!(
            matches!(outcome, Outcome::Rejected(WebhookError::Decode(_))),
            "{amount}: {:?}",
            outcome.error()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_amount_precision_survives_verification(amount in amount_text()) {
        let transfer = fixture(EventKind::TransferPaid);
        let fields: Vec<(&str, &str)> = transfer
            .fields
            .iter()
            .map(|&(name, value)| (name, if name == "amount" { amount.as_str() } else { value }))
            .collect();
        let signed = TestSigner::new().sign(&fields);

        let outcome = deliver(&middleware(), Encoding::Form, &signed.form_body());
        prop_assert!(outcome.is_accepted(), "{amount}: {:?}", outcome.error());
    }

    #[test]
    fn prop_consent_state_survives_verification(consent in consent_text()) {
        let member = fixture(EventKind::NewAudienceMember);
        let signed = TestSigner::new().sign(&member.with("marketing_consent", consent));

        let outcome = deliver(&middleware(), Encoding::Json, &signed.json_body());
        prop_assert!(outcome.is_accepted(), "{consent:?}: {:?}", outcome.error());
    }
}
