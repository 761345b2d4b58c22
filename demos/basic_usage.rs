use jwt_codec::{decode, encode, serde_json, verify, Algorithm, Claims, Header, TokenBuilder};

fn main() {
    // Secret shared between issuer and verifier
    let key = b"my-secret-key-for-hmac";

    // Header and payload as a user would type them
    let header = Header::from_json("{\n  \"alg\": \"HS256\",\n  \"typ\": \"JWT\"\n}")
        .expect("Failed to parse header");
    let payload = Claims::from_json(
        "{\n  \"sub\": \"1234567890\",\n  \"name\": \"John Doe\",\n  \"iat\": 1516239022\n}",
    )
    .expect("Failed to parse payload");

    let token = encode(&header, &payload, key).expect("Failed to encode token");
    println!("Encoded token: {token}");

    inspect(&token);
    check(&token, key);
    check(&token, b"some-other-secret");
    check("not.a.jwt!!", key);

    // One token per supported algorithm
    for alg in Algorithm::ALL {
        let token = TokenBuilder::new()
            .algorithm(alg)
            .key_id(format!("{}-key", alg.name().to_lowercase()))
            .issued_now()
            .claim("sub", "example-subject")
            .sign(key)
            .expect("Failed to sign token");
        println!(
            "{alg}: {} byte signature, token length {}",
            token.signature.len(),
            token.to_compact().len()
        );
    }
}

/// Print a token's contents without verifying it
fn inspect(token: &str) {
    match decode(token) {
        Ok(decoded) => {
            println!("Header: {}", serde_json::to_string_pretty(&decoded.header).unwrap_or_default());
            println!("Payload: {}", serde_json::to_string_pretty(&decoded.payload).unwrap_or_default());
        }
        Err(err) => println!("Failed to decode token: {err}"),
    }
}

/// Report whether a token is authentic, malformed, or signed with another secret
fn check(token: &str, key: &[u8]) {
    match verify(token, key) {
        Ok(result) if result.valid => println!("Signature verified"),
        Ok(_) => println!("Invalid signature"),
        Err(err) => println!("Malformed token: {err}"),
    }
}
