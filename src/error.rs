use std::io;


quick_error! {
    /// Errors surfaced by the connection state machines.
    ///
    /// Wire-level parse failures are not errors in this sense: they
    /// are reported as `Recv::Invalid` outcomes carrying an HTTP
    /// status, and the connection keeps running unless configured to
    /// disconnect.
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        SplitHeaders {
            description("message refused: header string contains an \
                embedded blank line")
        }
        PrematureResponse {
            description("response received with no outstanding request")
        }
        ResetOnMessageBody {
            description("peer closed the connection inside a message body")
        }
        Closed {
            description("operation on a closed connection")
        }
    }
}
