//! Links that open a saved search.
//!
//! A link such as `https://host/app?searchId=<id>` names a saved search. The
//! id is handed out exactly once, and the link is rewritten without it so
//! reloading the cleaned link does not re-apply the search.

/// Query parameter carrying the saved search id.
pub const SEARCH_ID_PARAM: &str = "searchId";

/// A parsed deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    search_id: Option<String>,
    cleaned_url: String,
}

impl DeepLink {
    /// Splits the saved search id out of `url`.
    ///
    /// Other query parameters and the fragment are kept in the cleaned URL.
    /// An empty `searchId` value is treated as absent.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let (before_fragment, fragment) = match url.split_once('#') {
            Some((head, fragment)) => (head, Some(fragment)),
            None => (url, None),
        };
        let (base, query) = before_fragment
            .split_once('?')
            .unwrap_or((before_fragment, ""));

        let mut search_id = None;
        let mut kept = Vec::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key == SEARCH_ID_PARAM {
                let value = percent_decode(value);
                if search_id.is_none() && !value.is_empty() {
                    search_id = Some(value);
                }
            } else {
                kept.push(pair);
            }
        }

        let mut cleaned_url = base.to_string();
        if !kept.is_empty() {
            cleaned_url.push('?');
            cleaned_url.push_str(&kept.join("&"));
        }
        if let Some(fragment) = fragment {
            cleaned_url.push('#');
            cleaned_url.push_str(fragment);
        }

        Self {
            search_id,
            cleaned_url,
        }
    }

    /// The saved search id, if it has not been taken yet.
    #[must_use]
    pub fn search_id(&self) -> Option<&str> {
        self.search_id.as_deref()
    }

    /// Takes the saved search id. Later calls return `None`.
    pub const fn take(&mut self) -> Option<String> {
        self.search_id.take()
    }

    /// The URL without the `searchId` parameter.
    #[must_use]
    pub fn cleaned_url(&self) -> &str {
        &self.cleaned_url
    }
}

/// Builds a link that opens the saved search `search_id`.
///
/// Any `searchId` already present in `base_url` is replaced.
#[must_use]
pub fn link_to(base_url: &str, search_id: &str) -> String {
    let base = DeepLink::from_url(base_url);
    let (head, fragment) = match base.cleaned_url().split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base.cleaned_url(), None),
    };
    let separator = if head.contains('?') { '&' } else { '?' };
    let mut url = format!("{head}{separator}{SEARCH_ID_PARAM}={}", percent_encode(search_id));
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                char::from(byte).to_string()
            }
            _ => format!("%{byte:02X}"),
        })
        .collect()
}

/// Decodes `%XX` escapes and `+`. Malformed escapes are kept verbatim.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' => {
                let escape = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escape {
                    decoded.push(byte);
                    i += 2;
                } else {
                    decoded.push(b'%');
                }
            }
            byte => decoded.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
