use uuid::Uuid;

const TOKEN_PREFIX: &str = "[[doctor:";
const TOKEN_SUFFIX: &str = "]]";

/// Render the stable deep-link reference for a doctor. One token per id,
/// and the double-bracket fencing cannot occur in ordinary prose, so the
/// UI can resolve a clicked mention without re-running the match.
pub fn doctor_token(id: &Uuid) -> String {
    format!("{}{}{}", TOKEN_PREFIX, id, TOKEN_SUFFIX)
}

/// Extract every doctor reference embedded in a block of text, in order
/// of appearance. Malformed fragments are skipped.
pub fn parse_tokens(text: &str) -> Vec<Uuid> {
    let mut ids = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(TOKEN_PREFIX) {
        rest = &rest[start + TOKEN_PREFIX.len()..];
        match rest.find(TOKEN_SUFFIX) {
            Some(end) => {
                if let Ok(id) = rest[..end].parse::<Uuid>() {
                    ids.push(id);
                }
                rest = &rest[end + TOKEN_SUFFIX.len()..];
            }
            None => break,
        }
    }

    ids
}
