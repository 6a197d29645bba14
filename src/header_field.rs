//! The catalog of standard HTTP header fields and the formatters for
//! the stock headers a server or client emits on nearly every message.

use character::CRLF;

/// The server identifier used by `server_header`.
pub const SERVER_NAME: &'static str = "tk-http1";

/// The media type of a TRACE echo body.
pub const MESSAGE_HTTP: &'static str = "message/http";

/// The value used for the chunked transfer encoding header.
pub const CHUNKED: &'static str = "Chunked";

/// Ids for the standard header fields defined in RFC 2616 and updated
/// by RFC 7230/7232.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    // General header fields, RFC 2616 sec 4.5
    CacheControl,
    Connection,
    Date,
    Pragma,
    Trailer,
    TransferEncoding,
    Upgrade,
    Via,
    Warning,

    // Request header fields, RFC 2616 sec 5.3
    Accept,
    AcceptCharset,
    AcceptEncoding,
    AcceptLanguage,
    Authorization,
    Expect,
    From,
    Host,
    IfMatch,
    IfModifiedSince,
    IfNoneMatch,
    IfRange,
    IfUnmodifiedSince,
    MaxForwards,
    ProxyAuthorization,
    Range,
    Referer,
    Te,
    UserAgent,

    // Response header fields, RFC 2616 sec 6.2
    AcceptRanges,
    Age,
    ETag,
    Location,
    ProxyAuthenticate,
    RetryAfter,
    Server,
    Vary,
    WwwAuthenticate,

    // Entity header fields, RFC 2616 sec 7.1
    Allow,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentLocation,
    ContentMd5,
    ContentRange,
    ContentType,
    Expires,
    LastModified,
    ExtensionHeader,
}

impl Id {
    /// The canonical (mixed case) field name from RFC 2616.
    pub fn name(&self) -> &'static str {
        use self::Id::*;
        match *self {
            CacheControl       => "Cache-Control",
            Connection         => "Connection",
            Date               => "Date",
            Pragma             => "Pragma",
            Trailer            => "Trailer",
            TransferEncoding   => "Transfer-Encoding",
            Upgrade            => "Upgrade",
            Via                => "Via",
            Warning            => "Warning",
            Accept             => "Accept",
            AcceptCharset      => "Accept-Charset",
            AcceptEncoding     => "Accept-Encoding",
            AcceptLanguage     => "Accept-Language",
            Authorization      => "Authorization",
            Expect             => "Expect",
            From               => "From",
            Host               => "Host",
            IfMatch            => "If-Match",
            IfModifiedSince    => "If-Modified-Since",
            IfNoneMatch        => "If-None-Match",
            IfRange            => "If-Range",
            IfUnmodifiedSince  => "If-Unmodified-Since",
            MaxForwards        => "Max-Forwards",
            ProxyAuthorization => "Proxy-Authorization",
            Range              => "Range",
            Referer            => "Referer",
            Te                 => "TE",
            UserAgent          => "User-Agent",
            AcceptRanges       => "Accept-Ranges",
            Age                => "Age",
            ETag               => "ETag",
            Location           => "Location",
            ProxyAuthenticate  => "Proxy-Authenticate",
            RetryAfter         => "Retry-After",
            Server             => "Server",
            Vary               => "Vary",
            WwwAuthenticate    => "WWW-Authenticate",
            Allow              => "Allow",
            ContentEncoding    => "Content-Encoding",
            ContentLanguage    => "Content-Language",
            ContentLength      => "Content-Length",
            ContentLocation    => "Content-Location",
            ContentMd5         => "Content-MD5",
            ContentRange       => "Content-Range",
            ContentType        => "Content-Type",
            Expires            => "Expires",
            LastModified       => "Last-Modified",
            ExtensionHeader    => "extension-header",
        }
    }

    /// The lowercase field name, the form used as a key by the header
    /// block parser.
    pub fn lowercase_name(&self) -> &'static str {
        use self::Id::*;
        match *self {
            CacheControl       => "cache-control",
            Connection         => "connection",
            Date               => "date",
            Pragma             => "pragma",
            Trailer            => "trailer",
            TransferEncoding   => "transfer-encoding",
            Upgrade            => "upgrade",
            Via                => "via",
            Warning            => "warning",
            Accept             => "accept",
            AcceptCharset      => "accept-charset",
            AcceptEncoding     => "accept-encoding",
            AcceptLanguage     => "accept-language",
            Authorization      => "authorization",
            Expect             => "expect",
            From               => "from",
            Host               => "host",
            IfMatch            => "if-match",
            IfModifiedSince    => "if-modified-since",
            IfNoneMatch        => "if-none-match",
            IfRange            => "if-range",
            IfUnmodifiedSince  => "if-unmodified-since",
            MaxForwards        => "max-forwards",
            ProxyAuthorization => "proxy-authorization",
            Range              => "range",
            Referer            => "referer",
            Te                 => "te",
            UserAgent          => "user-agent",
            AcceptRanges       => "accept-ranges",
            Age                => "age",
            ETag               => "etag",
            Location           => "location",
            ProxyAuthenticate  => "proxy-authenticate",
            RetryAfter         => "retry-after",
            Server             => "server",
            Vary               => "vary",
            WwwAuthenticate    => "www-authenticate",
            Allow              => "allow",
            ContentEncoding    => "content-encoding",
            ContentLanguage    => "content-language",
            ContentLength      => "content-length",
            ContentLocation    => "content-location",
            ContentMd5         => "content-md5",
            ContentRange       => "content-range",
            ContentType        => "content-type",
            Expires            => "expires",
            LastModified       => "last-modified",
            ExtensionHeader    => "extension-header",
        }
    }
}

/// Format one `Name: value CRLF` field line.
pub fn to_header(name: &str, value: &str) -> String {
    let mut output = String::with_capacity(name.len() + value.len() + 4);
    output.push_str(name);
    output.push_str(": ");
    output.push_str(value);
    output.push_str(CRLF);
    output
}

/// A `Date:` header with the current UTC time in RFC 1123 format.
#[cfg(feature="date_header")]
pub fn date_header() -> String {
    use std::time::SystemTime;
    use httpdate::HttpDate;
    to_header(Id::Date.name(), &HttpDate::from(SystemTime::now()).to_string())
}

/// The stock `Server:` header.
pub fn server_header() -> String {
    to_header(Id::Server.name(), SERVER_NAME)
}

/// A `Content-Length:` header for the given size.
pub fn content_length(size: u64) -> String {
    to_header(Id::ContentLength.name(), &size.to_string())
}

/// The `Transfer-Encoding: Chunked` header.
pub fn chunked_encoding() -> String {
    to_header(Id::TransferEncoding.name(), CHUNKED)
}

/// The `Content-Type: message/http` header used on TRACE responses.
pub fn content_http_header() -> String {
    to_header(Id::ContentType.name(), MESSAGE_HTTP)
}
