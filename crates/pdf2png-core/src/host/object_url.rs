use std::fmt;

use super::Host;

/// An object URL that is revoked when dropped.
///
/// Call [`ObjectUrl::into_string`] to take over the URL's lifetime; the
/// caller is then responsible for revoking it.
pub struct ObjectUrl<H: Host> {
    url: Option<String>,
    host: H,
}

impl<H: Host> ObjectUrl<H> {
    pub(crate) fn new(url: String, host: H) -> Self {
        Self { url: Some(url), host }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Detach the URL. It stays valid until revoked through the host.
    pub fn into_string(mut self) -> String {
        self.url.take().unwrap_or_default()
    }

    /// Revoke the URL now.
    pub fn revoke(self) {
        drop(self)
    }
}

impl<H: Host> Drop for ObjectUrl<H> {
    fn drop(&mut self) {
        if let Some(url) = self.url.take() {
            self.host.revoke_object_url(&url);
        }
    }
}

impl<H: Host> AsRef<str> for ObjectUrl<H> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<H: Host> fmt::Debug for ObjectUrl<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.as_str()).finish()
    }
}

impl<H: Host> fmt::Display for ObjectUrl<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
