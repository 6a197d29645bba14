use std::convert::From;
use std::fmt;


/// Enum representing HTTP request methods.
///
/// ```rust,ignore
/// match req.method() {
///     &Method::Get => {},   // handle GET
///     &Method::Post => {},  // handle POST requests
///     &Method::Other(ref m) => { println!("Custom method {}", m); },
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Options,
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Trace,
    Connect,
    Other(String),
}

impl<'a> From<&'a str> for Method {

    fn from(s: &'a str) -> Method {
        match s {
            "OPTIONS"   => Method::Options,
            "GET"       => Method::Get,
            "HEAD"      => Method::Head,
            "POST"      => Method::Post,
            "PUT"       => Method::Put,
            "PATCH"     => Method::Patch,
            "DELETE"    => Method::Delete,
            "TRACE"     => Method::Trace,
            "CONNECT"   => Method::Connect,
            s => Method::Other(s.to_string()),
        }
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        use self::Method::*;
        match *self {
            Options => "OPTIONS",
            Get => "GET",
            Head => "HEAD",
            Post => "POST",
            Put => "PUT",
            Patch => "PATCH",
            Delete => "DELETE",
            Trace => "TRACE",
            Connect => "CONNECT",
            Other(ref x) => x,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::Method;

    #[test]
    fn standard_names_round_trip() {
        for name in ["OPTIONS", "GET", "HEAD", "POST", "PUT", "PATCH",
                     "DELETE", "TRACE", "CONNECT"].iter() {
            assert_eq!(Method::from(*name).as_ref(), *name);
        }
    }

    #[test]
    fn custom_method() {
        assert_eq!(Method::from("PROPFIND"),
                   Method::Other("PROPFIND".to_string()));
        assert_eq!(Method::from("PROPFIND").as_ref(), "PROPFIND");
    }
}
