use std::borrow::Cow;

use crate::service::Service;

pub const NO_NAME: &str = "Error: no name provided";
pub const DECODE_FAILED: &str = "Error: could not decode the name";

/// Greets the name carried by a `key=value` payload.
///
/// The payload is usually the whole request target, e.g.
/// `/app/hello?name=Jane%20Doe`. The payload is split on `=` with trailing
/// empty pieces dropped; the second piece is the URL-decoded value.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelloService;

impl Service for HelloService {
    fn respond(&self, payload: &str) -> String {
        let mut pieces: Vec<&str> = payload.split('=').collect();
        while pieces.last().is_some_and(|piece| piece.is_empty()) {
            pieces.pop();
        }

        let Some(&raw) = pieces.get(1) else {
            return NO_NAME.to_string();
        };

        match decode_form_value(raw) {
            Some(name) => {
                let greeting = format!("Hola, {}", name);
                tracing::debug!(response = %greeting, "hello service");
                greeting
            }
            None => DECODE_FAILED.to_string(),
        }
    }
}

/// Form-style URL decoding: `+` is a space, `%XX` a byte.
///
/// Rejects truncated or non-hex escapes and byte sequences that are not
/// UTF-8.
pub fn decode_form_value(raw: &str) -> Option<String> {
    if !escapes_well_formed(raw) {
        return None;
    }

    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

fn escapes_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
