use std::fmt;

/// Browser UA sent with every probe. Several providers serve a different
/// error page to default or bot user agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:60.0) Gecko/20100101 Firefox/60.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn from_force_https(force_https: bool) -> Self {
        if force_https { Scheme::Https } else { Scheme::Http }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `scheme://host/`
pub fn root_url(scheme: Scheme, host: &str) -> String {
    format!("{}://{}/", scheme, host)
}
