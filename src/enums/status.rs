/// Enum with the HTTP response status codes a server or client is
/// likely to produce, plus a `Raw` escape hatch for everything else.
///
/// The canonical reason phrase is available via `reason()` and the
/// numeric code via `code()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    // custom http code
    Raw(u16, String),
    //  1xx status codes
    Continue,                       // 100
    SwitchingProtocol,              // 101
    //  2xx status codes
    Ok,                             // 200
    Created,                        // 201
    Accepted,                       // 202
    NonAuthoritativeInformation,    // 203
    NoContent,                      // 204
    ResetContent,                   // 205
    PartialContent,                 // 206
    //  3xx status codes
    MultipleChoices,                // 300
    MovedPermanently,               // 301
    Found,                          // 302
    SeeOther,                       // 303
    NotModified,                    // 304
    UseProxy,                       // 305
    TemporaryRedirect,              // 307
    PermanentRedirect,              // 308
    //  4xx status codes
    BadRequest,                     // 400
    Unauthorized,                   // 401
    PaymentRequired,                // 402
    Forbidden,                      // 403
    NotFound,                       // 404
    MethodNotAllowed,               // 405
    NotAcceptable,                  // 406
    ProxyAuthenticationRequired,    // 407
    RequestTimeout,                 // 408
    Conflict,                       // 409
    Gone,                           // 410
    LengthRequired,                 // 411
    PreconditionFailed,             // 412
    PayloadTooLarge,                // 413
    RequestURITooLong,              // 414
    UnsupportedMediaType,           // 415
    RequestRangeNotSatisfiable,     // 416
    ExpectationFailed,              // 417
    UpgradeRequired,                // 426
    PreconditionRequired,           // 428
    TooManyRequests,                // 429
    RequestHeaderFieldsTooLarge,    // 431
    //  5xx status codes
    InternalServerError,            // 500
    NotImplemented,                 // 501
    BadGateway,                     // 502
    ServiceUnavailable,             // 503
    GatewayTimeout,                 // 504
    VersionNotSupported,            // 505
    NetworkAuthenticationRequired,  // 511
}

impl Status {
    /// The numeric status code.
    pub fn code(&self) -> u16 {
        use self::Status::*;
        match *self {
            Continue                      => 100,
            SwitchingProtocol             => 101,
            Ok                            => 200,
            Created                       => 201,
            Accepted                      => 202,
            NonAuthoritativeInformation   => 203,
            NoContent                     => 204,
            ResetContent                  => 205,
            PartialContent                => 206,
            MultipleChoices               => 300,
            MovedPermanently              => 301,
            Found                         => 302,
            SeeOther                      => 303,
            NotModified                   => 304,
            UseProxy                      => 305,
            TemporaryRedirect             => 307,
            PermanentRedirect             => 308,
            BadRequest                    => 400,
            Unauthorized                  => 401,
            PaymentRequired               => 402,
            Forbidden                     => 403,
            NotFound                      => 404,
            MethodNotAllowed              => 405,
            NotAcceptable                 => 406,
            ProxyAuthenticationRequired   => 407,
            RequestTimeout                => 408,
            Conflict                      => 409,
            Gone                          => 410,
            LengthRequired                => 411,
            PreconditionFailed            => 412,
            PayloadTooLarge               => 413,
            RequestURITooLong             => 414,
            UnsupportedMediaType          => 415,
            RequestRangeNotSatisfiable    => 416,
            ExpectationFailed             => 417,
            UpgradeRequired               => 426,
            PreconditionRequired          => 428,
            TooManyRequests               => 429,
            RequestHeaderFieldsTooLarge   => 431,
            InternalServerError           => 500,
            NotImplemented                => 501,
            BadGateway                    => 502,
            ServiceUnavailable            => 503,
            GatewayTimeout                => 504,
            VersionNotSupported           => 505,
            NetworkAuthenticationRequired => 511,
            Raw(code, _) => code,
        }
    }

    /// The canonical reason phrase, RFC 2616 section 6.1.1.
    pub fn reason(&self) -> &str {
        use self::Status::*;
        match *self {
            Continue                      => "Continue",
            SwitchingProtocol             => "Switching Protocols",
            Ok                            => "OK",
            Created                       => "Created",
            Accepted                      => "Accepted",
            NonAuthoritativeInformation   => "Non-Authoritative Information",
            NoContent                     => "No Content",
            ResetContent                  => "Reset Content",
            PartialContent                => "Partial Content",
            MultipleChoices               => "Multiple Choices",
            MovedPermanently              => "Moved Permanently",
            Found                         => "Found",
            SeeOther                      => "See Other",
            NotModified                   => "Not Modified",
            UseProxy                      => "Use Proxy",
            TemporaryRedirect             => "Temporary Redirect",
            PermanentRedirect             => "Permanent Redirect",
            BadRequest                    => "Bad Request",
            Unauthorized                  => "Unauthorized",
            PaymentRequired               => "Payment Required",
            Forbidden                     => "Forbidden",
            NotFound                      => "Not Found",
            MethodNotAllowed              => "Method Not Allowed",
            NotAcceptable                 => "Not Acceptable",
            ProxyAuthenticationRequired   => "Proxy Authentication Required",
            RequestTimeout                => "Request Time-out",
            Conflict                      => "Conflict",
            Gone                          => "Gone",
            LengthRequired                => "Length Required",
            PreconditionFailed            => "Precondition Failed",
            PayloadTooLarge               => "Payload Too Large",
            RequestURITooLong             => "Request-URI Too Long",
            UnsupportedMediaType          => "Unsupported Media Type",
            RequestRangeNotSatisfiable    => "Requested range not satisfiable",
            ExpectationFailed             => "Expectation Failed",
            UpgradeRequired               => "Upgrade Required",
            PreconditionRequired          => "Precondition Required",
            TooManyRequests               => "Too Many Requests",
            RequestHeaderFieldsTooLarge   => "Request Header Fields Too Large",
            InternalServerError           => "Internal Server Error",
            NotImplemented                => "Not Implemented",
            BadGateway                    => "Bad Gateway",
            ServiceUnavailable            => "Service Unavailable",
            GatewayTimeout                => "Gateway Time-out",
            VersionNotSupported           => "HTTP Version not supported",
            NetworkAuthenticationRequired => "Network Authentication Required",
            Raw(_, ref reason) => reason,
        }
    }

    /// Whether a response with this status may carry a message body,
    /// RFC 7230 section 3.3.
    ///
    /// Returns `false` for 1xx, 204 (No Content) and 304 (Not Modified).
    pub fn content_permitted(&self) -> bool {
        let code = self.code();
        code >= 200 && code != 204 && code != 304
    }

    /// Look up the standard status for a numeric code.
    ///
    /// Unknown codes yield `None`; use `Status::Raw` for those.
    pub fn from_code(code: u16) -> Option<Status> {
        use self::Status::*;
        let status = match code {
            100 => Continue,
            101 => SwitchingProtocol,
            200 => Ok,
            201 => Created,
            202 => Accepted,
            203 => NonAuthoritativeInformation,
            204 => NoContent,
            205 => ResetContent,
            206 => PartialContent,
            300 => MultipleChoices,
            301 => MovedPermanently,
            302 => Found,
            303 => SeeOther,
            304 => NotModified,
            305 => UseProxy,
            307 => TemporaryRedirect,
            308 => PermanentRedirect,
            400 => BadRequest,
            401 => Unauthorized,
            402 => PaymentRequired,
            403 => Forbidden,
            404 => NotFound,
            405 => MethodNotAllowed,
            406 => NotAcceptable,
            407 => ProxyAuthenticationRequired,
            408 => RequestTimeout,
            409 => Conflict,
            410 => Gone,
            411 => LengthRequired,
            412 => PreconditionFailed,
            413 => PayloadTooLarge,
            414 => RequestURITooLong,
            415 => UnsupportedMediaType,
            416 => RequestRangeNotSatisfiable,
            417 => ExpectationFailed,
            426 => UpgradeRequired,
            428 => PreconditionRequired,
            429 => TooManyRequests,
            431 => RequestHeaderFieldsTooLarge,
            500 => InternalServerError,
            501 => NotImplemented,
            502 => BadGateway,
            503 => ServiceUnavailable,
            504 => GatewayTimeout,
            505 => VersionNotSupported,
            511 => NetworkAuthenticationRequired,
            _ => return None,
        };
        Some(status)
    }
}
