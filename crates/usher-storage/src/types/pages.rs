//! Paged-read plumbing: pages and continuation tokens.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::Invitation;
use crate::StoreError;

/// Default number of items per page for paged reads.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Opaque continuation token for paged reads.
///
/// Backends encode the last-seen key of the page they returned; callers hand
/// the token back verbatim to resume. The payload is backend-defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    /// Encode a backend key as a token.
    pub fn encode<K: Serialize>(key: &K) -> Result<Self, StoreError> {
        serde_json::to_string(key)
            .map(PageToken)
            .map_err(|e| StoreError::Backend(format!("encode page token: {e}")))
    }

    /// Decode the token back into a backend key.
    pub fn decode<K: DeserializeOwned>(&self) -> Result<K, StoreError> {
        serde_json::from_str(&self.0)
            .map_err(|e| StoreError::Backend(format!("invalid page token: {e}")))
    }
}

/// One page of a paged read, plus the token to fetch the next.
#[derive(Clone, Debug)]
pub struct InvitationPage {
    pub items: Vec<Invitation>,
    pub next: Option<PageToken>,
}

impl InvitationPage {
    /// Terminal page with no continuation.
    pub fn last(items: Vec<Invitation>) -> Self {
        Self { items, next: None }
    }
}

/// Assemble a page from an ordered item source.
///
/// Probes one item past `page_size` so the final page reports no
/// continuation; otherwise the token encodes the last returned item's key.
pub fn paginate<I, K>(
    items: I,
    page_size: usize,
    token_of: impl Fn(&Invitation) -> K,
) -> Result<InvitationPage, StoreError>
where
    I: IntoIterator<Item = Invitation>,
    K: Serialize,
{
    let mut items: Vec<Invitation> = items.into_iter().take(page_size + 1).collect();
    if items.len() > page_size {
        items.truncate(page_size);
        let next = match items.last() {
            Some(last) => Some(PageToken::encode(&token_of(last))?),
            None => None,
        };
        Ok(InvitationPage { items, next })
    } else {
        Ok(InvitationPage::last(items))
    }
}

/// Last-seen primary key, for scan and primary-query continuations.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub email: String,
    pub code: String,
}

/// Last-seen index key, for status-index continuations. The expiry rides in
/// canonical string form so the token orders the same way the index does.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusIndexKey {
    pub expiry_date: String,
    pub email: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_token_round_trips() {
        let token = PageToken::encode(&PrimaryKey {
            email: "abc@gmail.com".into(),
            code: "ABCD1234".into(),
        })
        .unwrap();
        let key: PrimaryKey = token.decode().unwrap();
        assert_eq!(key.email, "abc@gmail.com");
        assert_eq!(key.code, "ABCD1234");
    }

    #[test]
    fn decoding_into_the_wrong_key_shape_is_a_backend_error() {
        let token = PageToken::encode(&PrimaryKey {
            email: "abc@gmail.com".into(),
            code: "ABCD1234".into(),
        })
        .unwrap();
        let err = token.decode::<StatusIndexKey>().unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn last_page_has_no_continuation() {
        let page = InvitationPage::last(vec![]);
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn paginate_probes_one_past_the_page() {
        let items: Vec<Invitation> = (0..3)
            .map(|n| {
                Invitation::issue(format!("user{n}@x.com"), format!("CODE000{n}"), 7)
            })
            .collect();

        let token_of = |inv: &Invitation| PrimaryKey {
            email: inv.email.clone(),
            code: inv.code.clone(),
        };

        let full = paginate(items.clone(), 2, token_of).unwrap();
        assert_eq!(full.items.len(), 2);
        assert!(full.next.is_some());

        let terminal = paginate(items, 3, token_of).unwrap();
        assert_eq!(terminal.items.len(), 3);
        assert!(terminal.next.is_none());
    }
}
