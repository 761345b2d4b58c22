use jwt_codec::{
    current_timestamp, Algorithm, RegisteredClaims, Token, TokenBuilder, VerificationOptions,
};

fn main() {
    let key = b"my-secret-key-for-hmac";
    let now = current_timestamp();

    let fresh = TokenBuilder::new()
        .algorithm(Algorithm::HS256)
        .registered_claims(
            RegisteredClaims::new()
                .with_issuer("example-issuer")
                .with_audience("example-audience")
                .with_subject("user-123"),
        )
        .valid_for_secs(3600)
        .sign(key)
        .expect("Failed to sign token");

    let expired = TokenBuilder::new()
        .algorithm(Algorithm::HS256)
        .registered_claims(
            RegisteredClaims::new()
                .with_issuer("example-issuer")
                .with_issued_at(now - 7200)
                .with_expiration(now - 3600),
        )
        .sign(key)
        .expect("Failed to sign token");

    let options = VerificationOptions::new()
        .expected_issuer("example-issuer")
        .expected_audience("example-audience")
        .leeway(30);

    validate("fresh", &fresh.to_string(), key, &options);
    validate("expired", &expired.to_string(), key, &options);
}

fn validate(label: &str, compact: &str, key: &[u8], options: &VerificationOptions) {
    let token: Token = match compact.parse() {
        Ok(token) => token,
        Err(err) => {
            println!("{label}: malformed token: {err}");
            return;
        }
    };

    match token.verify(key) {
        Ok(result) if result.valid => {}
        Ok(_) => {
            println!("{label}: invalid signature");
            return;
        }
        Err(err) => {
            println!("{label}: {err}");
            return;
        }
    }

    match token.verify_claims(options) {
        Ok(()) => println!(
            "{label}: valid token for {}",
            token.subject().unwrap_or("<no subject>")
        ),
        Err(err) => println!("{label}: claims rejected: {err}"),
    }
}
